use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use ndarray::ArrayView2;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use hf_survival::config::Theme;
use hf_survival::models::{Classifier, ModelError};
use hf_survival::predictor::PredictionService;
use hf_survival::server::{router, AppState};

/// Stub classifier: returns a fixed label and keeps the rows it saw.
struct StubClassifier {
    label: u8,
    rows: Mutex<Vec<Vec<f64>>>,
}

impl Classifier for StubClassifier {
    fn kind(&self) -> &'static str {
        "stub"
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Vec<u8> {
        let mut seen = self.rows.lock().unwrap();
        for row in rows.rows() {
            seen.push(row.to_vec());
        }
        vec![self.label; rows.nrows()]
    }
}

fn stub_state(label: u8) -> (AppState, Arc<StubClassifier>) {
    let stub = Arc::new(StubClassifier { label, rows: Mutex::new(Vec::new()) });
    let service = PredictionService::new("stub", stub.clone());
    (AppState::ready(service, Theme::Classic), stub)
}

const SCENARIO_FORM: &str = "age=50&sex=Laki-laki&anaemia=Tidak&diabetes=Tidak&smoking=Tidak&high_blood_pressure=Tidak\
&creatinine_phosphokinase=500&ejection_fraction=40&platelets=250000&serum_creatinine=1.5&serum_sodium=137&time=100";

async fn body_text(response: axum::response::Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn form_post(body: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn test_index_renders_form() -> Result<()> {
    let (state, _) = stub_state(0);
    let response = router(state)
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await?;
    assert!(html.contains("Prediksi Kematian Pasien Gagal Jantung"));
    assert!(html.contains(r#"action="/predict""#));
    assert!(!html.contains("disabled"));
    Ok(())
}

#[tokio::test]
async fn test_form_submit_shows_death_message() -> Result<()> {
    let (state, stub) = stub_state(1);
    let response = router(state).oneshot(form_post(SCENARIO_FORM)?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await?;
    assert!(html.contains(r#"data-outcome="DIE""#));
    assert!(html.contains("MENINGGAL"));
    assert!(html.contains("bukan diagnosis medis"));
    // Submitted values stay in the form
    assert!(html.contains(r#"name="platelets" min="0" step="any" value="250000""#));

    let rows = stub.rows.lock().unwrap();
    assert_eq!(
        rows.as_slice(),
        &[vec![50.0, 0.0, 500.0, 0.0, 40.0, 0.0, 250000.0, 1.5, 137.0, 1.0, 0.0, 100.0]]
    );
    Ok(())
}

#[tokio::test]
async fn test_form_submit_shows_survival_message() -> Result<()> {
    let (state, _) = stub_state(0);
    let response = router(state).oneshot(form_post(SCENARIO_FORM)?).await?;
    let html = body_text(response).await?;
    assert!(html.contains(r#"data-outcome="SURVIVE""#));
    assert!(html.contains("BERTAHAN HIDUP"));
    Ok(())
}

#[tokio::test]
async fn test_form_clamps_out_of_range_values() -> Result<()> {
    let (state, stub) = stub_state(0);
    let body = "age=500&ejection_fraction=150&platelets=-10&sex=unknown&anaemia=yes";
    let response = router(state).oneshot(form_post(body)?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = stub.rows.lock().unwrap();
    assert_eq!(
        rows[0],
        vec![120.0, 0.0, 0.0, 0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
    Ok(())
}

#[tokio::test]
async fn test_form_rejects_non_numeric_input() -> Result<()> {
    let (state, stub) = stub_state(1);
    let response = router(state).oneshot(form_post("age=tua")?).await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await?;
    assert!(html.contains("Input tidak valid"));
    assert!(!html.contains("Hasil Prediksi"));
    assert!(stub.rows.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_json_api() -> Result<()> {
    let (state, _) = stub_state(1);
    let payload = serde_json::json!({
        "age": 50, "anaemia": "Tidak", "creatinine_phosphokinase": 500,
        "diabetes": "Tidak", "ejection_fraction": 40, "high_blood_pressure": "Tidak",
        "platelets": 250000, "serum_creatinine": 1.5, "serum_sodium": 137,
        "sex": "Laki-laki", "smoking": "Tidak", "time": 100
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))?;
    let response = router(state).oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert_eq!(json["outcome"], "DIE");
    assert_eq!(json["raw"], 1);
    assert_eq!(json["model"], "stub");
    assert_eq!(
        json["features"],
        serde_json::json!([50.0, 0.0, 500.0, 0.0, 40.0, 0.0, 250000.0, 1.5, 137.0, 1.0, 0.0, 100.0])
    );
    Ok(())
}

fn unavailable_state() -> AppState {
    let err = PredictionService::load("no/such/DeathEventPrediction.json").unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    AppState::from_load(Err(err), Theme::Modern)
}

#[tokio::test]
async fn test_missing_model_locks_the_page() -> Result<()> {
    let app = router(unavailable_state());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await?;
    assert!(html.contains("Model prediksi tidak dapat dimuat"));
    assert!(html.contains("<fieldset disabled"));
    assert!(!html.contains("<button"));

    let response = app.clone().oneshot(form_post(SCENARIO_FORM)?).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"age":50,"anaemia":"Tidak","creatinine_phosphokinase":500,"diabetes":"Tidak","ejection_fraction":40,"high_blood_pressure":"Tidak","platelets":250000,"serum_creatinine":1.5,"serum_sodium":137,"sex":"Laki-laki","smoking":"Tidak","time":100}"#,
        ))?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert!(json["error"].as_str().unwrap().contains("not found"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert_eq!(json["status"], "unavailable");
    assert!(json["model"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_health_reports_model() -> Result<()> {
    let (state, _) = stub_state(0);
    let response = router(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await?)?;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "stub");
    Ok(())
}
