use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::TaxBreakdown;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Pidgin,
    Yoruba,
    Igbo,
    Hausa,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Pidgin,
        Language::Yoruba,
        Language::Igbo,
        Language::Hausa,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Pidgin => "pidgin",
            Language::Yoruba => "yoruba",
            Language::Igbo => "igbo",
            Language::Hausa => "hausa",
        }
    }

    fn prompt_phrase(self) -> &'static str {
        match self {
            Language::English => "in simple English",
            Language::Pidgin => "in Nigerian Pidgin English",
            Language::Yoruba => "in Yoruba language",
            Language::Igbo => "in Igbo language",
            Language::Hausa => "in Hausa language",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag() == wanted)
            .ok_or_else(|| {
                let tags: Vec<&str> = Language::ALL.iter().map(|l| l.tag()).collect();
                format!("Language must be one of: {}", tags.join(", "))
            })
    }
}

/// Formats an amount as naira with thousands separators and at most two decimals.
pub fn format_naira(value: f64) -> String {
    let abs = value.abs();
    // Past u64 cents there is no sub-naira precision left; print whole naira.
    let (whole, frac) = if abs * 100.0 < u64::MAX as f64 {
        let cents = (abs * 100.0).round() as u64;
        ((cents / 100).to_string(), cents % 100)
    } else {
        (format!("{abs:.0}"), 0)
    };

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let decimals = match frac {
        0 => String::new(),
        f if f % 10 == 0 => format!(".{}", f / 10),
        f => format!(".{f:02}"),
    };
    let sign = if value < 0.0 && (frac > 0 || whole != "0") { "-" } else { "" };

    format!("{sign}₦{grouped}{decimals}")
}

/// Renders a tax breakdown as prose in a given language.
pub trait Localizer: Send + Sync {
    fn render(&self, taxes: &TaxBreakdown, language: Language) -> String;
}

/// Built-in fixed templates. Languages without a template use English.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLocalizer;

impl TemplateLocalizer {
    fn english(taxes: &TaxBreakdown) -> String {
        let lines = &taxes.breakdown;
        format!(
            "Based on Nigerian 2025 tax reforms, here's your tax breakdown:\n\n\
             Company Income Tax (CIT): {cit} - This is {cit_rate} of your profits.\n\
             Capital Gains Tax: {cgt} - 30% tax on asset sales.\n\
             Development Levy: {levy} - 4% for national development.\n\
             Digital Assets Tax: {dat} - 30% on crypto/digital gains.\n\
             VAT: {vat} - 7.5% on sales.\n\n\
             Total Tax: {total}\n\
             Your Net Profit: {net}\n\n\
             Key Deadlines:\n\
             - File quarterly returns by the 21st of the month after each quarter\n\
             - Annual returns due by June 30th\n\
             - Pay taxes within 60 days of assessment\n\n\
             Stay compliant to avoid penalties!",
            cit = format_naira(lines.cit.amount),
            cit_rate = lines.cit.rate,
            cgt = format_naira(lines.cgt.amount),
            levy = format_naira(lines.development_levy.amount),
            dat = format_naira(lines.digital_assets_tax.amount),
            vat = format_naira(lines.vat.amount),
            total = format_naira(taxes.total_tax),
            net = format_naira(taxes.net_profit),
        )
    }

    fn pidgin(taxes: &TaxBreakdown) -> String {
        let lines = &taxes.breakdown;
        format!(
            "Based on 2025 Nigerian tax law, na so your tax be:\n\n\
             Company Tax (CIT): {cit} - Na {cit_rate} of your profit.\n\
             Capital Gains Tax: {cgt} - 30% tax wen you sell property.\n\
             Development Levy: {levy} - 4% for national development.\n\
             Digital Money Tax: {dat} - 30% for crypto gain.\n\
             VAT: {vat} - 7.5% on wetin you sell.\n\n\
             Total Tax Wey You Go Pay: {total}\n\
             Your Remaining Profit: {net}\n\n\
             Important Dates:\n\
             - File every 3 months before 21st\n\
             - Year end filing na June 30\n\
             - Pay within 60 days\n\n\
             Make sure say you comply, make dem no charge you extra!",
            cit = format_naira(lines.cit.amount),
            cit_rate = lines.cit.rate,
            cgt = format_naira(lines.cgt.amount),
            levy = format_naira(lines.development_levy.amount),
            dat = format_naira(lines.digital_assets_tax.amount),
            vat = format_naira(lines.vat.amount),
            total = format_naira(taxes.total_tax),
            net = format_naira(taxes.net_profit),
        )
    }
}

impl Localizer for TemplateLocalizer {
    fn render(&self, taxes: &TaxBreakdown, language: Language) -> String {
        match language {
            Language::Pidgin => Self::pidgin(taxes),
            _ => Self::english(taxes),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion response had no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Minimal client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, ExplainError> {
        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 500,
        };

        let response: ChatResponse = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ExplainError::EmptyResponse)
    }
}

fn explanation_prompt(taxes: &TaxBreakdown, language: Language) -> String {
    let lines = &taxes.breakdown;
    format!(
        "You are a Nigerian tax expert. Explain the following tax calculation {phrase} for a \
         business owner who may not understand complex tax terms. Be clear, friendly, and \
         actionable.\n\n\
         Tax Calculation:\n\
         - Total Revenue: {revenue}\n\
         - Total Profit: {profit}\n\
         - Company Income Tax (CIT): {cit}\n\
         - Capital Gains Tax (CGT): {cgt}\n\
         - Development Levy: {levy}\n\
         - Digital Assets Tax: {dat}\n\
         - VAT: {vat}\n\
         - Total Tax: {total}\n\
         - Net Profit After Tax: {net}\n\n\
         Provide:\n\
         1. What these taxes mean\n\
         2. Why they need to pay them\n\
         3. Any tips to stay compliant\n\
         4. Important deadlines to remember",
        phrase = language.prompt_phrase(),
        revenue = format_naira(taxes.inputs.revenue),
        profit = format_naira(taxes.inputs.profit),
        cit = format_naira(lines.cit.amount),
        cgt = format_naira(lines.cgt.amount),
        levy = format_naira(lines.development_levy.amount),
        dat = format_naira(lines.digital_assets_tax.amount),
        vat = format_naira(lines.vat.amount),
        total = format_naira(taxes.total_tax),
        net = format_naira(taxes.net_profit),
    )
}

/// Produces plain-language explanations, preferring the chat model when one is configured.
pub struct Explainer {
    client: Option<ChatClient>,
    localizer: Box<dyn Localizer>,
}

impl Explainer {
    pub fn new(client: Option<ChatClient>, localizer: Box<dyn Localizer>) -> Self {
        Self { client, localizer }
    }

    pub fn offline() -> Self {
        Self::new(None, Box::new(TemplateLocalizer))
    }

    pub fn from_config(config: &Config) -> Self {
        let client = config.openai_api_key.as_ref().map(|key| {
            ChatClient::new(
                config.openai_base_url.clone(),
                key.clone(),
                config.openai_model.clone(),
            )
        });
        Self::new(client, Box::new(TemplateLocalizer))
    }

    pub async fn explain(&self, taxes: &TaxBreakdown, language: Language) -> String {
        if let Some(client) = &self.client {
            match client.complete(&explanation_prompt(taxes, language)).await {
                Ok(text) => return text,
                Err(err) => {
                    tracing::warn!(error = %err, %language, "explanation model unavailable, using template");
                }
            }
        }
        self.localizer.render(taxes, language)
    }
}
