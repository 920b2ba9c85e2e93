use axum::{
    extract::{Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, Theme};
use crate::models::ModelError;
use crate::page::{self, PageView};
use crate::patient::{FeatureVector, FormSubmission, RawInputs};
use crate::predictor::{Outcome, PredictionService};

// --- Error responses for the JSON API ---
pub struct ServerError {
    status: StatusCode,
    error: anyhow::Error,
}

impl ServerError {
    fn unavailable(reason: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            error: anyhow::anyhow!("prediction unavailable: {}", reason),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.error.to_string() }))).into_response()
    }
}

impl<E> From<E> for ServerError where E: Into<anyhow::Error> {
    fn from(err: E) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, error: err.into() }
    }
}

/// Whether the classifier made it through startup.
pub enum ModelStatus {
    Ready(PredictionService),
    /// Load failed; holds the message shown to the user.
    Unavailable(String),
}

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelStatus>,
    pub theme: Theme,
}

impl AppState {
    pub fn ready(service: PredictionService, theme: Theme) -> Self {
        Self { model: Arc::new(ModelStatus::Ready(service)), theme }
    }

    pub fn unavailable(reason: impl Into<String>, theme: Theme) -> Self {
        Self { model: Arc::new(ModelStatus::Unavailable(reason.into())), theme }
    }

    /// A failed load still yields a serving state: the page explains the problem and refuses input.
    pub fn from_load(result: Result<PredictionService, ModelError>, theme: Theme) -> Self {
        match result {
            Ok(service) => {
                info!("Model '{}' ready ({})", service.name(), service.kind());
                Self::ready(service, theme)
            }
            Err(e) => {
                error!("Model failed to load, predictions disabled: {}", e);
                Self::unavailable(e.to_string(), theme)
            }
        }
    }
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub id: Uuid,
    pub model: String,
    pub outcome: Outcome,
    pub raw: u8,
    pub features: FeatureVector,
    pub predicted_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: &AppConfig, state: AppState) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Form ready: http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let unavailable = match state.model.as_ref() {
        ModelStatus::Unavailable(reason) => Some(reason.as_str()),
        ModelStatus::Ready(_) => None,
    };
    Html(page::render(&PageView {
        theme: state.theme,
        unavailable,
        ..Default::default()
    }))
}

async fn predict_form(
    State(state): State<AppState>,
    Form(form): Form<FormSubmission>,
) -> Response {
    let service = match state.model.as_ref() {
        ModelStatus::Ready(service) => service,
        ModelStatus::Unavailable(reason) => {
            warn!("Rejected form submission: model unavailable");
            let html = page::render(&PageView {
                theme: state.theme,
                form: Some(&form),
                unavailable: Some(reason.as_str()),
                ..Default::default()
            });
            return (StatusCode::SERVICE_UNAVAILABLE, Html(html)).into_response();
        }
    };

    let raw = match form.parse() {
        Ok(raw) => raw,
        Err(e) => {
            let message = e.to_string();
            let html = page::render(&PageView {
                theme: state.theme,
                form: Some(&form),
                validation_error: Some(message.as_str()),
                ..Default::default()
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response();
        }
    };

    let id = Uuid::new_v4();
    let prediction = service.run(&raw);
    info!(request_id = %id, outcome = %prediction.outcome, "Form prediction");

    Html(page::render(&PageView {
        theme: state.theme,
        form: Some(&form),
        prediction: Some(&prediction),
        ..Default::default()
    }))
    .into_response()
}

async fn predict_json(
    State(state): State<AppState>,
    Json(raw): Json<RawInputs>,
) -> Result<Json<PredictResponse>, ServerError> {
    let service = match state.model.as_ref() {
        ModelStatus::Ready(service) => service,
        ModelStatus::Unavailable(reason) => return Err(ServerError::unavailable(reason)),
    };

    let id = Uuid::new_v4();
    let prediction = service.run(&raw);
    info!(request_id = %id, outcome = %prediction.outcome, "API prediction");

    Ok(Json(PredictResponse {
        id,
        model: service.name().to_string(),
        outcome: prediction.outcome,
        raw: prediction.raw,
        features: prediction.features,
        predicted_at: Utc::now(),
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.model.as_ref() {
        ModelStatus::Ready(service) => HealthResponse { status: "ok", model: Some(service.name().to_string()) },
        ModelStatus::Unavailable(_) => HealthResponse { status: "unavailable", model: None },
    };
    (StatusCode::OK, Json(body))
}
