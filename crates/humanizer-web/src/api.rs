//! REST API endpoint handlers.
//!
//! The page loads `/api/catalog` once to fill its pickers, then posts each
//! submission to `/api/humanize`. Both variants are returned together or
//! not at all.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use humanizer::api::CompletionClient;
use humanizer::catalog::{
    Catalog, Length, ModelInfo, ModifierOption, Modifiers, Person, SUPPORTED_MODELS, Strategy,
    Tone, modifier_options, parse_modifier,
};
use humanizer::config::HumanizerConfig;
use humanizer::variants::{
    HumanizeRequest, Presentation, RequestError, Variant, VariantOutcome, humanize_pair,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

/// Message shown when either variant fails.
pub const FAILURE_MESSAGE: &str = "Failed to humanize the text. Please try again.";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub client: CompletionClient,
    pub catalog: Arc<Catalog>,
    pub default_model: String,
    pub default_temperature: f32,
}

impl AppState {
    /// State using `config`'s model and temperature as the page defaults.
    pub fn new(client: CompletionClient, catalog: Catalog, config: &HumanizerConfig) -> Self {
        Self {
            client,
            catalog: Arc::new(catalog),
            default_model: config.model.clone(),
            default_temperature: config.temperature,
        }
    }
}

// ── GET /api/catalog ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ModifierCatalog {
    pub tone: Vec<ModifierOption>,
    pub length: Vec<ModifierOption>,
    pub person: Vec<ModifierOption>,
}

/// Everything the page needs to build its pickers.
#[derive(Serialize)]
pub struct CatalogResponse<'a> {
    pub strategies: &'a [Strategy],
    pub modifiers: ModifierCatalog,
    pub models: &'static [ModelInfo],
    pub default_model: &'a str,
    pub default_temperature: f32,
}

/// GET /api/catalog: strategies, modifier options, models and defaults.
pub async fn get_catalog(State(app): State<AppState>) -> Response {
    let body = CatalogResponse {
        strategies: app.catalog.strategies(),
        modifiers: ModifierCatalog {
            tone: modifier_options::<Tone>(),
            length: modifier_options::<Length>(),
            person: modifier_options::<Person>(),
        },
        models: SUPPORTED_MODELS,
        default_model: &app.default_model,
        default_temperature: app.default_temperature,
    };
    Json(body).into_response()
}

// ── POST /api/humanize ──────────────────────────────────────────────

/// Request body for POST /api/humanize.
#[derive(Deserialize, Debug, Default)]
pub struct HumanizeBody {
    pub text: String,
    pub strategies: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
}

/// Per-variant status in a failure response.
#[derive(Serialize, Debug, PartialEq)]
pub struct VariantStatus {
    pub strategy: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&VariantOutcome> for VariantStatus {
    fn from(outcome: &VariantOutcome) -> Self {
        Self {
            strategy: outcome.strategy.id.clone(),
            ok: outcome.is_ok(),
            error: outcome.result.as_ref().err().map(ToString::to_string),
        }
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    let message: String = message.into();
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn parse_modifiers(body: &HumanizeBody) -> Result<Modifiers, String> {
    Ok(Modifiers {
        tone: parse_modifier::<Tone>(body.tone.as_deref())?,
        length: parse_modifier::<Length>(body.length.as_deref())?,
        person: parse_modifier::<Person>(body.person.as_deref())?,
    })
}

/// Validate the body against the catalog and build the submission.
///
/// Returns a ready-to-send error response on refusal.
fn build_request(app: &AppState, body: HumanizeBody) -> Result<HumanizeRequest, Response> {
    let ids = match body.strategies.as_slice() {
        [a, b] => [a.as_str(), b.as_str()],
        other => {
            return Err(bad_request(format!(
                "expected exactly two strategies, got {}",
                other.len()
            )));
        }
    };

    let modifiers = parse_modifiers(&body).map_err(bad_request)?;

    let model = body.model.as_deref().unwrap_or(&app.default_model);
    let temperature = body.temperature.unwrap_or(app.default_temperature);

    HumanizeRequest::from_ids(&app.catalog, &body.text, ids, model)
        .and_then(|r| r.with_temperature(temperature))
        .map(|r| r.with_modifiers(modifiers))
        .map_err(|e| match e {
            RequestError::EmptyInput => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "warning": e.to_string() })),
            )
                .into_response(),
            other => bad_request(other.to_string()),
        })
}

/// POST /api/humanize: rewrite the text with two strategies.
///
/// Returns 200 with both variants, 422 for blank text, 400 for unknown ids,
/// an out-of-range temperature or a malformed body, and 502 when either
/// variant fails.
pub async fn post_humanize(
    State(app): State<AppState>,
    payload: Result<Json<HumanizeBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let request = match build_request(&app, body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let [a, b] = request.strategies();
    info!(
        "Humanizing {} chars with '{}' and '{}'",
        request.text().len(),
        a.id,
        b.id
    );

    let pair = humanize_pair(&app.client, &request).await;
    let statuses = [VariantStatus::from(&pair.a), VariantStatus::from(&pair.b)];

    match pair.presentation() {
        Presentation::Ready(variants) => {
            let variants: Vec<Variant> = variants.into();
            Json(json!({ "variants": variants })).into_response()
        }
        Presentation::Failed { errors } => {
            warn!("Submission failed: {} variant(s) errored", errors.len());
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": FAILURE_MESSAGE, "variants": statuses })),
            )
                .into_response()
        }
    }
}
