use crate::server::router::VoeState;
use axum::{Router, routing::get};

pub mod handlers;

/// Every public path, in the order the sitemap lists them.
pub const SITEMAP_PATHS: &[&str] = &[
    "/",
    "/votes",
    "/editors.json",
    "/votes.json",
    "/stats.json",
    "/robots.txt",
    "/sitemap.xml",
    "/manifest.json",
    "/favicon.ico",
];

pub fn router() -> Router<VoeState> {
    Router::new()
        .route(
            "/robots.txt",
            get(handlers::robots_handler).post(handlers::robots_handler),
        )
        .route(
            "/sitemap.xml",
            get(handlers::sitemap_handler).post(handlers::sitemap_handler),
        )
        .route(
            "/manifest.json",
            get(handlers::manifest_handler).post(handlers::manifest_handler),
        )
        .route(
            "/favicon.ico",
            get(handlers::favicon_handler).post(handlers::favicon_handler),
        )
}
