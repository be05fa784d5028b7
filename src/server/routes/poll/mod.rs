use crate::server::router::VoeState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;

/// Private cookie carrying the one-shot confirmation shown after a vote.
pub(crate) const FLASH_COOKIE: &str = "voe_flash";

pub fn router() -> Router<VoeState> {
    Router::new()
        .route(
            "/",
            get(handlers::index_handler).post(handlers::submit_vote_handler),
        )
        .route("/votes", get(handlers::votes_page_handler))
}
