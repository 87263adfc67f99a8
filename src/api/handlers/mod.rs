//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod emotions;
pub mod public;
pub mod system;
pub mod verses;

use axum::Router;
use axum::middleware;

use crate::app_state::AppState;
use crate::auth::require_admin;

/// Composes all resource routes mounted under `/api`.
///
/// Admin CRUD and reporting routes are wrapped in the session gate; login,
/// logout, and registration stay outside it.
pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .merge(admin::gated_routes())
        .merge(verses::routes())
        .merge(emotions::routes())
        .layer(middleware::from_fn_with_state(state, require_admin));

    public::routes().merge(admin::session_routes()).merge(gated)
}
