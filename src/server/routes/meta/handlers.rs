use super::SITEMAP_PATHS;
use crate::server::router::VoeState;
use axum::{
    Json,
    extract::State,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, LOCATION},
    },
    response::IntoResponse,
};
use serde_json::{Value, json};
use std::fmt::Write as _;
use url::Url;

/// GET|POST /robots.txt
pub(super) async fn robots_handler(State(state): State<VoeState>) -> impl IntoResponse {
    let sitemap = absolute(&state.site.public_url, "/sitemap.xml");
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("User-agent: *\nAllow: *\nSitemap: {sitemap}"),
    )
}

fn absolute(base: &Url, path: &str) -> String {
    base.join(path)
        .map_or_else(|_| format!("{base}{path}"), String::from)
}

pub(crate) fn sitemap_xml(base: &Url) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for path in SITEMAP_PATHS {
        let _ = write!(
            xml,
            "<url><loc>{}</loc><priority>1.0</priority></url>",
            absolute(base, path)
        );
    }
    xml.push_str("</urlset>");
    xml
}

/// GET|POST /sitemap.xml
pub(super) async fn sitemap_handler(State(state): State<VoeState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/xml")],
        sitemap_xml(&state.site.public_url),
    )
}

/// GET|POST /manifest.json
pub(super) async fn manifest_handler() -> Json<Value> {
    Json(json!({
        "$schema": "https://json.schemastore.org/web-manifest-combined.json",
        "short_name": "Vim or Emacs",
        "name": "Ari::web -> VimOrEmacs",
        "description": "Vim or GNU Emacs?",
        "icons": [{"src": "/favicon.ico", "sizes": "128x128", "type": "image/png"}],
        "start_url": ".",
        "display": "standalone",
        "theme_color": "#fbfbfb",
        "background_color": "#181818",
    }))
}

/// GET|POST /favicon.ico
pub(super) async fn favicon_handler(State(state): State<VoeState>) -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(LOCATION, state.site.favicon_url.to_string())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_lists_every_public_path() {
        let base = Url::parse("https://vim-or-emacs.example").unwrap();
        let xml = sitemap_xml(&base);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.ends_with("</urlset>"));
        assert!(xml.contains("<loc>https://vim-or-emacs.example/</loc>"));
        assert!(xml.contains("<loc>https://vim-or-emacs.example/stats.json</loc>"));
        assert_eq!(xml.matches("<url>").count(), SITEMAP_PATHS.len());
    }
}
