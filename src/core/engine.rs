use super::types::{BusinessType, TaxBreakdown, TaxInput, TaxLine, TaxLines};

const CIT_RATE: f64 = 0.30;
const LARGE_MIN_EFFECTIVE_RATE: f64 = 0.15;
const CGT_RATE: f64 = 0.30;
const DEVELOPMENT_LEVY_RATE: f64 = 0.04;
const DIGITAL_ASSETS_RATE: f64 = 0.30;
const VAT_RATE: f64 = 0.075;

/// Rounds a monetary amount to 2 decimal places, half away from zero.
///
/// Amounts at or above 1e15 are returned unchanged: an f64 has no cents left at that magnitude,
/// and scaling by 100 could overflow to infinity.
pub fn round2(value: f64) -> f64 {
    if value.abs() >= 1e15 {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// Computes the itemized 2025 tax position for a single period.
///
/// Total for every finite input. Large companies pay the greater of 30% of profit or 15% of
/// revenue as CIT, so a loss-making large company with high revenue still carries CIT. The
/// development levy follows the sign of `profit` and is negative for a loss.
pub fn compute(input: &TaxInput) -> TaxBreakdown {
    let (cit, cit_rate) = company_income_tax(input);

    let breakdown = TaxLines {
        cit: line(cit, cit_rate, "Company Income Tax"),
        cgt: line(
            input.capital_gains * CGT_RATE,
            percent_label(CGT_RATE),
            "Capital Gains Tax",
        ),
        development_levy: line(
            input.profit * DEVELOPMENT_LEVY_RATE,
            percent_label(DEVELOPMENT_LEVY_RATE),
            "Development Levy",
        ),
        digital_assets_tax: line(
            input.digital_assets * DIGITAL_ASSETS_RATE,
            percent_label(DIGITAL_ASSETS_RATE),
            "Digital Assets Tax",
        ),
        vat: line(
            input.turnover * VAT_RATE,
            percent_label(VAT_RATE),
            "Value Added Tax",
        ),
    };

    let total_tax = round2(breakdown.iter().map(|l| l.amount).sum());
    let net_profit = round2(input.profit + input.capital_gains + input.digital_assets - total_tax);
    let effective_tax_rate = if input.revenue > 0.0 {
        round2(total_tax / input.revenue * 100.0)
    } else {
        0.0
    };

    TaxBreakdown {
        breakdown,
        total_tax,
        net_profit,
        effective_tax_rate,
        inputs: *input,
    }
}

fn company_income_tax(input: &TaxInput) -> (f64, String) {
    match input.business_type {
        BusinessType::Large => {
            let cit = (input.profit * CIT_RATE).max(input.revenue * LARGE_MIN_EFFECTIVE_RATE);
            (
                cit,
                format!("{} effective", percent_label(LARGE_MIN_EFFECTIVE_RATE)),
            )
        }
        BusinessType::Sme => (input.profit * CIT_RATE, percent_label(CIT_RATE)),
    }
}

fn line(amount: f64, rate: String, description: &'static str) -> TaxLine {
    TaxLine {
        amount: round2(amount),
        rate,
        description,
    }
}

fn percent_label(rate: f64) -> String {
    // 0.075 * 100 is 7.499999... in binary; round before printing.
    let pct = (rate * 1000.0).round() / 10.0;
    format!("{pct}%")
}
