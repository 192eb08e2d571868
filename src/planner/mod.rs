//! AI meal planning: prompt construction, strict decoding of model output,
//! and the `/ai/*` endpoints.

pub mod dto;
pub mod handlers;
pub mod prompts;
pub mod schema;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::planner_routes()
}
