mod engine;
mod simulator;
mod types;

pub use engine::{compute, round2};
pub use simulator::simulate;
pub use types::{
    BusinessType, RecommendedAction, SimulationResult, SimulationScenario, SimulationSummary,
    TaxBreakdown, TaxInput, TaxLine, TaxLines, YearProjection,
};
