use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use petclinic_core::{FormOutcome, VisitForm};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::service::{ApiError, AppState};

pub const HEALTH_PATH: &str = "/health";
pub const NEW_VISIT_PATH: &str = "/owners/:owner_id/pets/:pet_id/visits/new";
pub const EDIT_VISIT_PATH: &str = "/owners/:owner_id/pets/:pet_id/visits/:visit_id/edit";
pub const CANCEL_VISIT_PATH: &str = "/owners/:owner_id/pets/:pet_id/visits/:visit_id/cancel";

#[derive(Debug, Deserialize)]
pub struct PetPath {
    owner_id: i64,
    pet_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct VisitPath {
    owner_id: i64,
    pet_id: i64,
    visit_id: i64,
}

/// Full application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(visit_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route(HEALTH_PATH, get(health))
}

pub fn visit_routes() -> Router<AppState> {
    Router::new()
        .route(NEW_VISIT_PATH, get(init_new_visit).post(process_new_visit))
        .route(
            EDIT_VISIT_PATH,
            get(init_edit_visit).post(process_edit_visit),
        )
        .route(CANCEL_VISIT_PATH, get(cancel_visit))
}

async fn health() -> &'static str {
    "ok"
}

async fn init_new_visit(
    State(st): State<AppState>,
    Path(path): Path<PetPath>,
) -> Result<Response, ApiError> {
    let view = st
        .with_workflow(move |w| w.init_new_visit_form(path.owner_id, path.pet_id))
        .await?;
    Ok(Json(view).into_response())
}

async fn process_new_visit(
    State(st): State<AppState>,
    Path(path): Path<PetPath>,
    Form(form): Form<VisitForm>,
) -> Result<Response, ApiError> {
    debug!(
        owner_id = path.owner_id,
        pet_id = path.pet_id,
        "new visit submitted"
    );
    let outcome = st
        .with_workflow(move |w| w.process_new_visit_form(path.owner_id, path.pet_id, form))
        .await?;
    Ok(outcome_response(outcome))
}

async fn init_edit_visit(
    State(st): State<AppState>,
    Path(path): Path<VisitPath>,
) -> Result<Response, ApiError> {
    let view = st
        .with_workflow(move |w| w.init_edit_visit_form(path.owner_id, path.pet_id, path.visit_id))
        .await?;
    Ok(Json(view).into_response())
}

async fn process_edit_visit(
    State(st): State<AppState>,
    Path(path): Path<VisitPath>,
    Form(form): Form<VisitForm>,
) -> Result<Response, ApiError> {
    debug!(
        owner_id = path.owner_id,
        pet_id = path.pet_id,
        visit_id = path.visit_id,
        "visit edit submitted"
    );
    let outcome = st
        .with_workflow(move |w| {
            w.process_edit_visit_form(path.owner_id, path.pet_id, path.visit_id, form)
        })
        .await?;
    Ok(outcome_response(outcome))
}

async fn cancel_visit(
    State(st): State<AppState>,
    Path(path): Path<VisitPath>,
) -> Result<Redirect, ApiError> {
    let location = st
        .with_workflow(move |w| w.cancel_visit(path.owner_id, path.pet_id, path.visit_id))
        .await?;
    Ok(Redirect::to(&location))
}

/// Rejected forms come back as JSON; saved ones redirect with 303.
fn outcome_response(outcome: FormOutcome) -> Response {
    match outcome {
        FormOutcome::Render(view) => Json(view).into_response(),
        FormOutcome::Redirect(location) => Redirect::to(&location).into_response(),
    }
}
