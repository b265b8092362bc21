use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusinessType {
    #[default]
    Sme,
    Large,
}

/// Financial facts for one period. `profit` may be negative (a loss).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInput {
    pub revenue: f64,
    pub profit: f64,
    pub capital_gains: f64,
    pub digital_assets: f64,
    pub turnover: f64,
    pub business_type: BusinessType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLine {
    pub amount: f64,
    pub rate: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLines {
    pub cit: TaxLine,
    pub cgt: TaxLine,
    pub development_levy: TaxLine,
    pub digital_assets_tax: TaxLine,
    pub vat: TaxLine,
}

impl TaxLines {
    pub fn iter(&self) -> impl Iterator<Item = &TaxLine> {
        [
            &self.cit,
            &self.cgt,
            &self.development_levy,
            &self.digital_assets_tax,
            &self.vat,
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub breakdown: TaxLines,
    pub total_tax: f64,
    pub net_profit: f64,
    pub effective_tax_rate: f64,
    pub inputs: TaxInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationScenario {
    pub base: TaxInput,
    pub initial_investment: f64,
    pub growth_rate: f64,
    pub inflation_rate: f64,
    pub years: u32,
}

impl Default for SimulationScenario {
    fn default() -> Self {
        Self {
            base: TaxInput::default(),
            initial_investment: 0.0,
            growth_rate: 0.10,
            inflation_rate: 0.15,
            years: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearProjection {
    pub year: u32,
    pub revenue: f64,
    pub gross_profit: f64,
    pub taxes: TaxBreakdown,
    pub total_tax: f64,
    pub net_profit: f64,
    pub real_net_profit: f64,
    pub cumulative_net_profit: f64,
    pub real_cumulative_profit: f64,
    pub roi: f64,
    pub break_even: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendedAction {
    Invest,
    Reconsider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_net_profit: f64,
    #[serde(rename = "finalROI")]
    pub final_roi: f64,
    pub break_even_year: Option<u32>,
    pub recommended_action: RecommendedAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub initial_investment: f64,
    /// Percent, e.g. `10.0` for a 0.10 growth rate.
    pub growth_rate: f64,
    /// Percent, e.g. `15.0` for a 0.15 inflation rate.
    pub inflation_rate: f64,
    pub years: u32,
    pub projections: Vec<YearProjection>,
    pub summary: SimulationSummary,
}
