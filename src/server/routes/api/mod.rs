use crate::server::router::VoeState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;
pub mod respond;

pub fn router() -> Router<VoeState> {
    Router::new()
        .route("/editors.json", get(handlers::editors_handler))
        .route("/votes.json", get(handlers::votes_handler))
        .route("/stats.json", get(handlers::stats_handler))
}
