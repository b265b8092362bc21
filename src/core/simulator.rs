use super::engine::{compute, round2};
use super::types::{
    RecommendedAction, SimulationResult, SimulationScenario, SimulationSummary, TaxInput,
    YearProjection,
};

/// Projects a base-year scenario forward `scenario.years` years.
///
/// Each year's flows are the base flows scaled by `(1 + growth)^year`, taxed independently, and
/// accumulated into a running net position that starts at `-initial_investment`. Real figures
/// deflate by `(1 + inflation)^year`. A zero-year scenario yields no rows and a summary built from
/// the opening position.
pub fn simulate(scenario: &SimulationScenario) -> SimulationResult {
    let base = &scenario.base;
    let mut projections = Vec::with_capacity(scenario.years as usize);
    let mut cumulative_net_profit = -scenario.initial_investment;

    for year in 1..=scenario.years {
        let growth = (1.0 + scenario.growth_rate).powi(year as i32);
        let deflator = (1.0 + scenario.inflation_rate).powi(year as i32);

        let grown = grow(base, growth);
        let taxes = compute(&grown);

        cumulative_net_profit += taxes.net_profit;

        let roi = if scenario.initial_investment > 0.0 {
            cumulative_net_profit / scenario.initial_investment * 100.0
        } else {
            0.0
        };

        projections.push(YearProjection {
            year,
            revenue: round2(grown.revenue),
            gross_profit: round2(grown.profit + grown.capital_gains + grown.digital_assets),
            total_tax: taxes.total_tax,
            net_profit: taxes.net_profit,
            real_net_profit: round2(taxes.net_profit / deflator),
            cumulative_net_profit: round2(cumulative_net_profit),
            real_cumulative_profit: round2(cumulative_net_profit / deflator),
            roi: round2(roi),
            break_even: cumulative_net_profit >= 0.0,
            taxes,
        });
    }

    let summary = SimulationSummary {
        total_net_profit: round2(cumulative_net_profit),
        final_roi: projections.last().map_or(0.0, |p| p.roi),
        break_even_year: projections.iter().find(|p| p.break_even).map(|p| p.year),
        recommended_action: if cumulative_net_profit > 0.0 {
            RecommendedAction::Invest
        } else {
            RecommendedAction::Reconsider
        },
    };

    SimulationResult {
        initial_investment: scenario.initial_investment,
        growth_rate: scenario.growth_rate * 100.0,
        inflation_rate: scenario.inflation_rate * 100.0,
        years: scenario.years,
        projections,
        summary,
    }
}

// Compounds from the base year, never from the previous projected year.
fn grow(base: &TaxInput, factor: f64) -> TaxInput {
    TaxInput {
        revenue: base.revenue * factor,
        profit: base.profit * factor,
        capital_gains: base.capital_gains * factor,
        digital_assets: base.digital_assets * factor,
        turnover: base.turnover * factor,
        business_type: base.business_type,
    }
}
