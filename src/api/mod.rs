mod error;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, FromRequest, Json, Path, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiError, ApiResult};

use crate::audit::{LedgerReceipt, publisher_from_config};
use crate::config::Config;
use crate::core::{
    BusinessType, SimulationResult, SimulationScenario, TaxBreakdown, TaxInput, compute, simulate,
};
use crate::explain::{Explainer, Language};
use crate::reports::{MemoryReportStore, ReportService};
use crate::ussd;

const DEFAULT_YEARS: u32 = 5;
const MAX_YEARS: u32 = 20;

#[derive(Clone)]
pub struct AppState {
    pub reports: ReportService,
    pub explainer: Arc<Explainer>,
}

impl AppState {
    pub fn new(reports: ReportService, explainer: Explainer) -> Self {
        Self {
            reports,
            explainer: Arc::new(explainer),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let reports = ReportService::new(
            Arc::new(MemoryReportStore::new()),
            publisher_from_config(config),
        );
        Self::new(reports, Explainer::from_config(config))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    revenue: Option<f64>,
    profit: Option<f64>,
    capital_gains: Option<f64>,
    digital_assets: Option<f64>,
    turnover: Option<f64>,
    business_type: Option<BusinessType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    revenue: Option<f64>,
    profit: Option<f64>,
    capital_gains: Option<f64>,
    digital_assets: Option<f64>,
    turnover: Option<f64>,
    business_type: Option<BusinessType>,
    initial_investment: Option<f64>,
    growth_rate: Option<f64>,
    inflation_rate: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UssdPayload {
    session_id: Option<String>,
    phone_number: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedResponse<T> {
    success: bool,
    data: T,
    report_id: String,
    blockchain: LedgerReceipt,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Explanation {
    tax_calculation: TaxBreakdown,
    explanation: String,
    language: Language,
}

#[derive(Debug, Serialize)]
struct ExplainResponse {
    success: bool,
    data: Explanation,
}

fn require_object(body: &Value) -> Result<(), Vec<String>> {
    if body.is_object() {
        Ok(())
    } else {
        Err(vec!["Request body must be a JSON object".to_string()])
    }
}

fn tax_errors(body: &Value) -> Vec<String> {
    if let Err(errors) = require_object(body) {
        return errors;
    }

    let mut errors = Vec::new();
    for (key, label) in [
        ("revenue", "Revenue"),
        ("capitalGains", "Capital gains"),
        ("digitalAssets", "Digital assets"),
        ("turnover", "Turnover"),
    ] {
        if let Some(v) = body.get(key) {
            if !v.as_f64().is_some_and(|n| n >= 0.0) {
                errors.push(format!("{label} must be a non-negative number"));
            }
        }
    }

    if body.get("profit").is_some_and(|v| !v.is_number()) {
        errors.push("Profit must be a number".to_string());
    }

    if let Some(v) = body.get("businessType").filter(|v| !is_blank(v)) {
        if !matches!(v.as_str(), Some("SME") | Some("LARGE")) {
            errors.push("Business type must be either SME or LARGE".to_string());
        }
    }

    errors
}

// Null and empty-string business types mean "not given" and fall back to SME.
fn is_blank(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some("")
}

fn without_blank_business_type(body: &Value) -> Value {
    let mut body = body.clone();
    if let Some(fields) = body.as_object_mut() {
        if fields.get("businessType").is_some_and(is_blank) {
            fields.remove("businessType");
        }
    }
    body
}

fn simulation_errors(body: &Value) -> Vec<String> {
    let mut errors = tax_errors(body);
    if require_object(body).is_err() {
        return errors;
    }

    if let Some(v) = body.get("years") {
        let valid = v
            .as_f64()
            .is_some_and(|n| n.fract() == 0.0 && (1.0..=MAX_YEARS as f64).contains(&n));
        if !valid {
            errors.push(format!("Years must be a number between 1 and {MAX_YEARS}"));
        }
    }

    if let Some(v) = body.get("initialInvestment") {
        if !v.as_f64().is_some_and(|n| n >= 0.0) {
            errors.push("Initial investment must be a non-negative number".to_string());
        }
    }

    for (key, label) in [("growthRate", "Growth rate"), ("inflationRate", "Inflation rate")] {
        if body.get(key).is_some_and(|v| !v.is_number()) {
            errors.push(format!("{label} must be a number"));
        }
    }

    errors
}

fn language_from_body(body: &Value) -> ApiResult<Language> {
    match body.get("language") {
        None | Some(Value::Null) => Ok(Language::default()),
        Some(Value::String(tag)) => tag.parse().map_err(ApiError::BadRequest),
        Some(_) => Err(ApiError::BadRequest(
            "Language must be a string".to_string(),
        )),
    }
}

fn parse_payload<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(format!("Invalid payload: {e}")))
}

fn tax_input_from_payload(payload: &TaxPayload) -> TaxInput {
    TaxInput {
        revenue: payload.revenue.unwrap_or(0.0),
        profit: payload.profit.unwrap_or(0.0),
        capital_gains: payload.capital_gains.unwrap_or(0.0),
        digital_assets: payload.digital_assets.unwrap_or(0.0),
        turnover: payload.turnover.unwrap_or(0.0),
        business_type: payload.business_type.unwrap_or_default(),
    }
}

fn scenario_from_payload(payload: &SimulatePayload) -> SimulationScenario {
    let defaults = SimulationScenario::default();
    SimulationScenario {
        base: TaxInput {
            revenue: payload.revenue.unwrap_or(0.0),
            profit: payload.profit.unwrap_or(0.0),
            capital_gains: payload.capital_gains.unwrap_or(0.0),
            digital_assets: payload.digital_assets.unwrap_or(0.0),
            turnover: payload.turnover.unwrap_or(0.0),
            business_type: payload.business_type.unwrap_or_default(),
        },
        initial_investment: payload
            .initial_investment
            .unwrap_or(defaults.initial_investment),
        growth_rate: payload.growth_rate.unwrap_or(defaults.growth_rate),
        inflation_rate: payload.inflation_rate.unwrap_or(defaults.inflation_rate),
        years: payload.years.map_or(DEFAULT_YEARS, |y| y as u32),
    }
}

fn tax_request_from_json(body: &Value) -> ApiResult<TaxInput> {
    let errors = tax_errors(body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let payload: TaxPayload = parse_payload(without_blank_business_type(body))?;
    Ok(tax_input_from_payload(&payload))
}

fn simulate_request_from_json(body: &Value) -> ApiResult<SimulationScenario> {
    let errors = simulation_errors(body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let payload: SimulatePayload = parse_payload(without_blank_business_type(body))?;
    Ok(scenario_from_payload(&payload))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/tax/calculate", post(calculate_handler))
        .route("/tax/simulate", post(simulate_handler))
        .route("/explain", post(explain_handler))
        .route("/ussd", post(ussd_handler))
        .route("/report", post(report_create_handler))
        .route("/report/:id", get(report_get_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: &Config) -> std::io::Result<()> {
    let app = router(AppState::from_config(config));
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "tax API listening");
    if config.ledger_relay_url.is_none() {
        tracing::info!("no LEDGER_RELAY_URL set, audit hashes use mock signatures");
    }
    if config.openai_api_key.is_none() {
        tracing::info!("no OPENAI_API_KEY set, explanations use built-in templates");
    }

    axum::serve(listener, app).await
}

async fn index_handler() -> Response {
    json_response(
        StatusCode::OK,
        json!({
            "success": true,
            "message": "Nigerian Tax Compliance API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "taxCalculation": "POST /tax/calculate",
                "investmentSimulation": "POST /tax/simulate",
                "explanation": "POST /explain",
                "reportCreate": "POST /report",
                "reportGet": "GET /report/:id",
                "ussd": "POST /ussd",
            },
        }),
    )
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        json!({ "success": false, "error": "Endpoint not found" }),
    )
}

async fn calculate_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let input = tax_request_from_json(&body)?;
    let result = compute(&input);

    let saved = state
        .reports
        .save(json!({ "type": "tax_calculation", "inputs": body, "result": result }))
        .await;

    Ok(json_response(
        StatusCode::OK,
        SavedResponse {
            success: true,
            data: result,
            report_id: saved.report.id,
            blockchain: saved.blockchain,
        },
    ))
}

async fn simulate_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let scenario = simulate_request_from_json(&body)?;
    let result: SimulationResult = simulate(&scenario);

    let saved = state
        .reports
        .save(json!({ "type": "investment_simulation", "inputs": body, "result": result }))
        .await;

    Ok(json_response(
        StatusCode::OK,
        SavedResponse {
            success: true,
            data: result,
            report_id: saved.report.id,
            blockchain: saved.blockchain,
        },
    ))
}

async fn explain_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Response> {
    let language = language_from_body(&body)?;
    let input = tax_request_from_json(&body)?;
    let taxes = compute(&input);
    let explanation = state.explainer.explain(&taxes, language).await;

    Ok(json_response(
        StatusCode::OK,
        ExplainResponse {
            success: true,
            data: Explanation {
                tax_calculation: taxes,
                explanation,
                language,
            },
        },
    ))
}

async fn ussd_handler(request: Request) -> Response {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let payload = if is_form {
        Form::<UssdPayload>::from_request(request, &())
            .await
            .map(|Form(p)| p)
            .map_err(|e| e.body_text())
    } else {
        Json::<UssdPayload>::from_request(request, &())
            .await
            .map(|Json(p)| p)
            .map_err(|e| e.body_text())
    };

    let payload = match payload {
        Ok(payload) => payload,
        Err(msg) => return ApiError::BadRequest(msg).into_response(),
    };

    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(session_id), Some(phone_number), Some(text)) = (
        non_empty(payload.session_id),
        non_empty(payload.phone_number),
        payload.text,
    ) else {
        return ApiError::BadRequest("sessionId, phoneNumber, and text are required".to_string())
            .into_response();
    };

    let reply = ussd::respond(&session_id, &phone_number, &text, Local::now().date_naive());
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        reply.response,
    )
        .into_response()
}

async fn report_create_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let saved = state.reports.save(body).await;
    json_response(StatusCode::OK, saved)
}

async fn report_get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let report = state
        .reports
        .find(&id)
        .await
        .ok_or(ApiError::NotFound("Report"))?;

    Ok(json_response(
        StatusCode::OK,
        json!({ "success": true, "report": report }),
    ))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::LocalPublisher;
    use axum::body::{Body, to_bytes};
    use axum::http::Request as HttpRequest;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn test_app() -> Router {
        let reports = ReportService::new(
            Arc::new(MemoryReportStore::new()),
            Arc::new(LocalPublisher::new("devnet")),
        );
        router(AppState::new(reports, Explainer::offline()))
    }

    fn post_json(uri: &str, body: Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    async fn send_raw(app: Router, request: HttpRequest<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    async fn send(app: Router, request: HttpRequest<Body>) -> (StatusCode, Value) {
        let (status, text) = send_raw(app, request).await;
        let json = serde_json::from_str(&text).expect("json body");
        (status, json)
    }

    #[test]
    fn tax_errors_accepts_empty_and_valid_bodies() {
        assert!(tax_errors(&json!({})).is_empty());
        assert!(
            tax_errors(&json!({
                "revenue": 1000, "profit": -50.5, "capitalGains": 0,
                "digitalAssets": 1.5, "turnover": 10, "businessType": "LARGE"
            }))
            .is_empty()
        );
    }

    #[test]
    fn blank_business_type_falls_back_to_sme() {
        for blank in [json!(null), json!("")] {
            let body = json!({ "profit": 1000, "businessType": blank });
            assert!(tax_errors(&body).is_empty());

            let input = tax_request_from_json(&body).expect("blank business type is accepted");
            assert_eq!(input.business_type, BusinessType::Sme);

            let scenario = simulate_request_from_json(&body).expect("blank business type is accepted");
            assert_eq!(scenario.base.business_type, BusinessType::Sme);
        }
    }

    #[test]
    fn tax_errors_reports_every_problem() {
        let errors = tax_errors(&json!({
            "revenue": -1,
            "profit": "lots",
            "capitalGains": "5",
            "businessType": "MEDIUM"
        }));

        assert_eq!(
            errors,
            vec![
                "Revenue must be a non-negative number",
                "Capital gains must be a non-negative number",
                "Profit must be a number",
                "Business type must be either SME or LARGE",
            ]
        );
    }

    #[test]
    fn tax_errors_rejects_non_object_body() {
        assert_eq!(
            tax_errors(&json!([1, 2])),
            vec!["Request body must be a JSON object"]
        );
    }

    #[test]
    fn simulation_errors_checks_years_bounds_and_integrality() {
        for years in [json!(0), json!(21), json!(2.5), json!("5")] {
            let errors = simulation_errors(&json!({ "years": years }));
            assert_eq!(errors, vec!["Years must be a number between 1 and 20"]);
        }
        for years in [1, 20] {
            assert!(simulation_errors(&json!({ "years": years })).is_empty());
        }
    }

    #[test]
    fn simulation_errors_checks_rates_and_investment() {
        let errors = simulation_errors(&json!({
            "initialInvestment": -5,
            "growthRate": "fast",
            "inflationRate": null
        }));
        assert_eq!(
            errors,
            vec![
                "Initial investment must be a non-negative number",
                "Growth rate must be a number",
                "Inflation rate must be a number",
            ]
        );
    }

    #[test]
    fn simulate_request_applies_defaults() {
        let scenario = simulate_request_from_json(&json!({ "profit": 1000 })).expect("valid");

        assert_eq!(scenario.years, 5);
        assert_approx(scenario.growth_rate, 0.10);
        assert_approx(scenario.inflation_rate, 0.15);
        assert_approx(scenario.initial_investment, 0.0);
        assert_approx(scenario.base.profit, 1000.0);
        assert_eq!(scenario.base.business_type, BusinessType::Sme);
    }

    #[test]
    fn simulate_request_parses_web_keys() {
        let scenario = simulate_request_from_json(&json!({
            "revenue": 5_000_000,
            "profit": 1_500_000,
            "capitalGains": 100_000,
            "digitalAssets": 50_000,
            "turnover": 4_000_000,
            "businessType": "LARGE",
            "initialInvestment": 2_000_000,
            "growthRate": 0.2,
            "inflationRate": 0.1,
            "years": 10
        }))
        .expect("valid");

        assert_eq!(scenario.years, 10);
        assert_eq!(scenario.base.business_type, BusinessType::Large);
        assert_approx(scenario.base.capital_gains, 100_000.0);
        assert_approx(scenario.base.digital_assets, 50_000.0);
        assert_approx(scenario.initial_investment, 2_000_000.0);
        assert_approx(scenario.growth_rate, 0.2);
        assert_approx(scenario.inflation_rate, 0.1);
    }

    #[test]
    fn language_defaults_to_english_and_rejects_unknown() {
        assert_eq!(language_from_body(&json!({})).ok(), Some(Language::English));
        assert_eq!(
            language_from_body(&json!({ "language": "Yoruba" })).ok(),
            Some(Language::Yoruba)
        );
        assert!(language_from_body(&json!({ "language": "french" })).is_err());
        assert!(language_from_body(&json!({ "language": 3 })).is_err());
    }

    #[tokio::test]
    async fn calculate_returns_breakdown_and_report_reference() {
        let (status, body) = send(
            test_app(),
            post_json("/tax/calculate", json!({ "profit": 100_000 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_approx(body["data"]["totalTax"].as_f64().expect("number"), 34_000.0);
        assert_approx(body["data"]["netProfit"].as_f64().expect("number"), 66_000.0);
        assert!(body["reportId"].is_string());
        assert_eq!(body["blockchain"]["success"], true);
    }

    #[tokio::test]
    async fn calculate_rejects_invalid_fields() {
        let (status, body) = send(
            test_app(),
            post_json("/tax/calculate", json!({ "revenue": -10, "businessType": "X" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn simulate_returns_projection_rows() {
        let (status, body) = send(
            test_app(),
            post_json(
                "/tax/simulate",
                json!({ "profit": 1_000_000, "initialInvestment": 2_000_000,
                        "growthRate": 0, "inflationRate": 0, "years": 5 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["projections"].as_array().map(Vec::len), Some(5));
        assert_eq!(data["summary"]["breakEvenYear"], 4);
        assert_eq!(data["summary"]["recommendedAction"], "INVEST");
        assert_approx(data["summary"]["finalROI"].as_f64().expect("number"), 65.0);
    }

    #[tokio::test]
    async fn simulate_rejects_out_of_range_years() {
        let (status, body) = send(
            test_app(),
            post_json("/tax/simulate", json!({ "years": 25 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "Years must be a number between 1 and 20");
    }

    #[tokio::test]
    async fn explain_uses_requested_language() {
        let (status, body) = send(
            test_app(),
            post_json("/explain", json!({ "profit": 100_000, "language": "PIDGIN" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["language"], "pidgin");
        let text = body["data"]["explanation"].as_str().expect("string");
        assert!(text.contains("na so your tax be"));
        assert_approx(
            body["data"]["taxCalculation"]["totalTax"].as_f64().expect("number"),
            34_000.0,
        );
    }

    #[tokio::test]
    async fn explain_rejects_unknown_language() {
        let (status, body) = send(
            test_app(),
            post_json("/explain", json!({ "language": "klingon" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|e| e.contains("english, pidgin, yoruba, igbo, hausa"))
        );
    }

    #[tokio::test]
    async fn ussd_accepts_json_and_replies_in_plain_text() {
        let request = post_json(
            "/ussd",
            json!({ "sessionId": "s1", "phoneNumber": "+2348000000000", "text": "" }),
        );
        let response = test_app().oneshot(request).await.expect("router is infallible");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert!(content_type.is_some_and(|ct| ct.starts_with("text/plain")));

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        assert!(bytes.starts_with(b"CON Welcome"));
    }

    #[tokio::test]
    async fn ussd_accepts_gateway_form_posts() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/ussd")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "sessionId=s2&phoneNumber=%2B234&text=1%2A50000%2A20000",
            ))
            .expect("valid request");
        let (status, text) = send_raw(test_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(text.starts_with("END Your Annual Tax:"));
        assert!(text.contains("Total Tax: ₦167,400"));
    }

    #[tokio::test]
    async fn ussd_requires_session_fields() {
        let (status, body) = send(
            test_app(),
            post_json("/ussd", json!({ "sessionId": "s1", "text": "1" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "sessionId, phoneNumber, and text are required");
    }

    #[tokio::test]
    async fn report_can_be_fetched_by_id_or_hash() {
        let app = test_app();
        let (status, created) = send(
            app.clone(),
            post_json("/report", json!({ "type": "manual", "note": "q3 filing" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let id = created["report"]["id"].as_str().expect("id").to_string();
        let hash = created["report"]["hash"].as_str().expect("hash").to_string();

        for key in [&id, &hash] {
            let (status, fetched) = send(app.clone(), get(&format!("/report/{key}"))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(fetched["report"]["id"], id.as_str());
            assert_eq!(fetched["report"]["data"]["note"], "q3 filing");
        }
    }

    #[tokio::test]
    async fn calculation_reports_are_retrievable() {
        let app = test_app();
        let (_, body) = send(
            app.clone(),
            post_json("/tax/calculate", json!({ "profit": 10 })),
        )
        .await;
        let id = body["reportId"].as_str().expect("report id").to_string();

        let (status, fetched) = send(app, get(&format!("/report/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["report"]["data"]["type"], "tax_calculation");
        assert_eq!(fetched["report"]["data"]["inputs"]["profit"], 10);
    }

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let (status, body) = send(test_app(), get("/report/nope")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Report not found");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, body) = send(test_app(), get("/nowhere")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn index_lists_endpoints() {
        let (status, body) = send(test_app(), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"]["ussd"], "POST /ussd");
    }
}
