//! Triage intake REST server binary.
//!
//! ## Purpose
//! Runs the triage intake REST server on its own, wired to the in-memory
//! reference store.
//!
//! ## Intended use
//! Development and demonstration. A deployment embeds the router from
//! `api_rest` and supplies real session and persistence collaborators in
//! place of the in-memory store.

use std::sync::Arc;

use api_rest::{router, AppState, BasicFormRenderer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::constants::{
    DEFAULT_CLINIC_NAME, DEFAULT_PATIENT_DETAIL_PATH, DEFAULT_REST_ADDR,
};
use triage_core::{CoreConfig, CurrentUser, InMemoryStore, IntakeWorkflow, NonEmptyText};

/// Main entry point for the triage intake REST server.
///
/// Starts the server on the configured address (default: 0.0.0.0:3000).
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `TRIAGE_CLINIC_NAME`: Clinic name shown on the intake form
/// - `TRIAGE_PATIENT_DETAIL_PATH`: Path of the detail view the submission
///   redirects to (default: "/show")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration values are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let clinic_name = NonEmptyText::new(
        std::env::var("TRIAGE_CLINIC_NAME").unwrap_or_else(|_| DEFAULT_CLINIC_NAME.into()),
    )?;
    let patient_detail_path = std::env::var("TRIAGE_PATIENT_DETAIL_PATH")
        .unwrap_or_else(|_| DEFAULT_PATIENT_DETAIL_PATH.into());

    let cfg = Arc::new(CoreConfig::new(clinic_name, patient_detail_path)?);

    tracing::info!("-- Starting triage intake REST API on {}", addr);

    // The acting user would normally come from the hosting application's
    // session store; the reference store carries a single seeded user.
    let store = Arc::new(InMemoryStore::new(CurrentUser {
        id: 1,
        first_name: "Triage".into(),
        last_name: "Nurse".into(),
    }));

    let workflow = Arc::new(IntakeWorkflow::new(
        cfg.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
    ));
    let renderer = Arc::new(BasicFormRenderer::new(cfg));
    let app = router(AppState::new(workflow, renderer));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
