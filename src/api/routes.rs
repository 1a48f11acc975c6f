//! API route configuration.

use axum::Router;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers;
use super::state::AppState;
use crate::store::Storer;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notes API",
        version = "0.1.0",
        description = "Create text notes and read them back by uuid",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::index,
        handlers::create_note,
        handlers::get_note,
    ),
    tags((name = "notes", description = "Note endpoints"))
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<S: Storer + 'static>(state: AppState<S>) -> Router {
    let api = ApiDoc::openapi();

    Router::new()
        .route("/", get(handlers::index).post(handlers::create_note::<S>))
        .route("/{note_id}", get(handlers::get_note::<S>))
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
