use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::core::{BusinessType, TaxInput, compute};
use crate::explain::format_naira;

const MAIN_MENU: &str = "CON Welcome to NgTax
1. Calculate Simple Tax
2. Get Tax Help (English)
3. Get Tax Help (Pidgin)
4. Check Tax Deadlines
0. Exit";

const ASK_REVENUE: &str = "CON Enter your monthly revenue in Naira:
Example: 50000";

const ASK_EXPENSES: &str = "CON Enter your monthly expenses:
Example: 20000";

const HELP_ENGLISH: &str = "END Nigerian 2025 Tax Guide:

- Pay 30% tax on profits (CIT)
- Pay 7.5% VAT on sales
- 4% development levy
- File quarterly by 21st of month
- Annual filing by June 30

Need help? Visit www.ngtax.ng";

const HELP_PIDGIN: &str = "END Naija Tax Guide 2025:

- Pay 30% tax for your profit (CIT)
- Pay 7.5% VAT for wetin you sell
- Pay 4% development levy
- File every 3 months before 21st
- Year end filing na June 30

Need help? Visit www.ngtax.ng";

const GOODBYE: &str = "END Thank you for using NgTax.

Visit www.ngtax.ng for full features.
Stay compliant, avoid penalties!";

const INVALID: &str = "CON Invalid input. Please try again.
1. Calculate Tax
2. Tax Help (English)
3. Tax Help (Pidgin)
4. Check Deadlines
0. Exit";

/// How an input path is matched: the first `*`-separated segment and the total segment count.
#[derive(Debug, Clone, Copy)]
struct Pattern {
    head: &'static str,
    segments: usize,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Reply(&'static str),
    Calculate,
    Deadlines,
}

struct Transition {
    pattern: Pattern,
    action: Action,
}

const fn on(head: &'static str, segments: usize, action: Action) -> Transition {
    Transition {
        pattern: Pattern { head, segments },
        action,
    }
}

const TRANSITIONS: &[Transition] = &[
    on("", 1, Action::Reply(MAIN_MENU)),
    on("1", 1, Action::Reply(ASK_REVENUE)),
    on("1", 2, Action::Reply(ASK_EXPENSES)),
    on("1", 3, Action::Calculate),
    on("2", 1, Action::Reply(HELP_ENGLISH)),
    on("3", 1, Action::Reply(HELP_PIDGIN)),
    on("4", 1, Action::Deadlines),
    on("0", 1, Action::Reply(GOODBYE)),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UssdReply {
    pub session_id: String,
    pub phone_number: String,
    pub response: String,
}

/// Answers one step of a USSD session. `text` is the gateway's accumulated input,
/// e.g. `"1*50000*20000"`.
pub fn respond(session_id: &str, phone_number: &str, text: &str, today: NaiveDate) -> UssdReply {
    let segments: Vec<&str> = text.split('*').collect();
    let action = TRANSITIONS
        .iter()
        .find(|t| t.pattern.head == segments[0] && t.pattern.segments == segments.len())
        .map(|t| t.action);

    let response = match action {
        Some(Action::Reply(body)) => body.to_string(),
        Some(Action::Calculate) => annual_tax(segments[1], segments[2]),
        Some(Action::Deadlines) => deadlines(today),
        None => INVALID.to_string(),
    };

    UssdReply {
        session_id: session_id.to_string(),
        phone_number: phone_number.to_string(),
        response,
    }
}

fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn annual_tax(revenue: &str, expenses: &str) -> String {
    let monthly_revenue = parse_amount(revenue);
    let monthly_profit = monthly_revenue - parse_amount(expenses);
    let revenue = monthly_revenue * 12.0;
    let profit = monthly_profit * 12.0;

    let taxes = compute(&TaxInput {
        revenue,
        profit,
        turnover: revenue,
        business_type: BusinessType::Sme,
        ..TaxInput::default()
    });

    format!(
        "END Your Annual Tax:\n\
         Revenue: {}\n\
         Profit: {}\n\n\
         Taxes:\n\
         CIT: {}\n\
         VAT: {}\n\
         Total Tax: {}\n\n\
         Net Profit: {}\n\n\
         Visit www.ngtax.ng for details",
        format_naira(revenue),
        format_naira(profit),
        format_naira(taxes.breakdown.cit.amount),
        format_naira(taxes.breakdown.vat.amount),
        format_naira(taxes.total_tax),
        format_naira(taxes.net_profit),
    )
}

fn deadlines(today: NaiveDate) -> String {
    let quarter = today.month0() / 3 + 1;
    let year = today.year();
    format!(
        "END Tax Deadlines {year}:\n\n\
         Quarter {quarter} filing: 21st of next month\n\
         Annual filing: June 30, {year}\n\
         Payment: Within 60 days of assessment\n\n\
         Set reminder at www.ngtax.ng"
    )
}
