//! # API REST
//!
//! REST layer for the triage intake workflow.
//!
//! Handles:
//! - HTTP endpoints with axum (blank form, submission, prefilled form)
//! - Query and form-payload extraction
//! - Mapping workflow errors to HTTP status codes
//! - HTML rendering of the intake form via the renderer seam
//!
//! Uses `triage-core` for the business logic.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use triage_core::{
    CoreConfig, IntakeWorkflow, TriageError, TriageFormData, TriageFormView, VitalSign,
};

/// Renders the intake form view model to an HTML page body.
///
/// The template engine proper is an external collaborator; implementations
/// receive the complete view model and return the page markup.
pub trait FormRenderer: Send + Sync {
    fn render_intake_form(&self, view: &TriageFormView) -> String;
}

/// Application state for the triage REST server.
///
/// Contains shared state that needs to be accessible to all request
/// handlers: the intake workflow and the form renderer.
#[derive(Clone)]
pub struct AppState {
    workflow: Arc<IntakeWorkflow>,
    renderer: Arc<dyn FormRenderer>,
}

impl AppState {
    pub fn new(workflow: Arc<IntakeWorkflow>, renderer: Arc<dyn FormRenderer>) -> Self {
        Self { workflow, renderer }
    }
}

/// Builds the triage router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/triage/create", get(create_get))
        .route("/triage/create", post(create_post))
        .route("/triage/createPopulated", get(create_populated_get))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct SubmitParams {
    /// 0 registers a new patient; a positive id reuses an existing one.
    id: i32,
}

#[derive(Deserialize, Default)]
struct PrefillParams {
    id: Option<String>,
}

/// Blank intake form.
#[axum::debug_handler]
async fn create_get(State(state): State<AppState>) -> Response {
    match state.workflow.blank_form() {
        Ok(view) => Html(state.renderer.render_intake_form(&view)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Intake submission; redirects to the patient detail view on success.
#[axum::debug_handler]
async fn create_post(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
    Form(form): Form<TriageFormData>,
) -> Response {
    match state.workflow.submit(params.id, &form) {
        Ok(outcome) => Redirect::to(&outcome.redirect_to).into_response(),
        Err(e) => error_response(e),
    }
}

/// Intake form prefilled from an existing patient.
#[axum::debug_handler]
async fn create_populated_get(
    State(state): State<AppState>,
    Query(params): Query<PrefillParams>,
) -> Response {
    match state.workflow.prefilled_form(params.id.as_deref()) {
        Ok(view) => Html(state.renderer.render_intake_form(&view)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: TriageError) -> Response {
    let (status, body) = match &err {
        TriageError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        TriageError::Session(_) => (StatusCode::UNAUTHORIZED, "No authenticated user"),
        TriageError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "Patient not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    };
    tracing::error!("triage request failed: {err}");
    (status, body).into_response()
}

// ============================================================================
// BUILT-IN RENDERER
// ============================================================================

/// Minimal built-in HTML renderer for the intake form.
///
/// Produces a plain, unstyled page: enough for the workflow to be exercised
/// end to end and for a clinic to replace with its own templates.
pub struct BasicFormRenderer {
    cfg: Arc<CoreConfig>,
}

impl BasicFormRenderer {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }
}

impl FormRenderer for BasicFormRenderer {
    fn render_intake_form(&self, view: &TriageFormView) -> String {
        let prefill = view.prefill.as_ref();
        let mut page = String::with_capacity(2048);
        page.push_str("<!doctype html>\n<html>\n<head><title>Triage Intake</title></head>\n<body>\n");
        page.push_str(&format!(
            "<h1>{} Triage Intake</h1>\n",
            escape(self.cfg.clinic_name().as_str())
        ));
        page.push_str(&format!(
            "<p>Signed in as {}</p>\n",
            escape(&view.current_user.display_name())
        ));
        if view.error {
            page.push_str(
                "<p class=\"error\">Some intake data could not be loaded. \
                 Please review the form before submitting.</p>\n",
            );
        }

        page.push_str(&format!(
            "<form method=\"post\" action=\"/triage/create?id={}\">\n",
            view.patient.id
        ));

        page.push_str("<fieldset><legend>Patient</legend>\n");
        push_text_input(
            &mut page,
            "first_name",
            "First name",
            prefill.map(|p| p.first_name.as_str()).unwrap_or_default(),
        );
        push_text_input(
            &mut page,
            "last_name",
            "Last name",
            prefill.map(|p| p.last_name.as_str()).unwrap_or_default(),
        );
        push_text_input(
            &mut page,
            "birth_date",
            "Birth date",
            &prefill
                .and_then(|p| p.birth_date)
                .map(|d| d.to_string())
                .unwrap_or_default(),
        );
        if let Some(age) = prefill.and_then(|p| p.age_years) {
            page.push_str(&format!("<p>Age: {age}</p>\n"));
        }
        push_text_input(
            &mut page,
            "sex",
            "Sex",
            prefill
                .and_then(|p| p.sex)
                .map(|s| s.to_wire())
                .unwrap_or_default(),
        );
        push_text_input(
            &mut page,
            "address",
            "Address",
            prefill.and_then(|p| p.address.as_deref()).unwrap_or_default(),
        );
        push_text_input(
            &mut page,
            "city",
            "City",
            prefill.and_then(|p| p.city.as_deref()).unwrap_or_default(),
        );
        push_text_input(&mut page, "chief_complaint", "Chief complaint", "");
        page.push_str("</fieldset>\n");

        page.push_str("<fieldset><legend>Vitals</legend>\n");
        for vital in &view.vitals {
            // Catalog entries map back onto the fixed enumeration; unknown
            // ids are skipped rather than rendered without a form field.
            if let Some(sign) = VitalSign::from_vital_id(vital.id) {
                page.push_str(&format!(
                    "<label>{} ({})<input type=\"number\" step=\"any\" name=\"{}\"></label>\n",
                    escape(&vital.name),
                    escape(&vital.unit),
                    sign.field_name()
                ));
            }
        }
        page.push_str("</fieldset>\n");

        page.push_str("<button type=\"submit\">Record intake</button>\n</form>\n</body>\n</html>\n");
        page
    }
}

fn push_text_input(page: &mut String, name: &str, label: &str, value: &str) {
    page.push_str(&format!(
        "<label>{label}<input type=\"text\" name=\"{name}\" value=\"{}\"></label>\n",
        escape(value)
    ));
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
