use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub mod delivery;
pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::service_info))
        .route("/compress", post(handler::compress_video))
}
