use crate::config::Config;
use crate::db::DbActorHandle;
use crate::error::VoeError;
use crate::server::guards::rate_limit::{ClientLimiter, global_rate_limit};
use crate::server::routes::{api, meta, poll};

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tracing::{error, info, warn};
use url::Url;

/// Global cookie signing/encryption key for PrivateCookieJar.
static COOKIE_KEY: LazyLock<Key> = LazyLock::new(Key::generate);

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

/// Settings the handlers read on every request.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub public_url: Url,
    pub favicon_url: Url,
    pub trust_forwarded_for: bool,
    pub insecure_cookie: bool,
}

#[derive(Clone)]
pub struct VoeState {
    pub db: DbActorHandle,
    pub limiter: Arc<ClientLimiter>,
    pub site: Arc<SiteSettings>,
}

impl VoeState {
    pub fn new(db: DbActorHandle, cfg: &Config) -> Result<Self, VoeError> {
        let limiter = ClientLimiter::new(&cfg.limits)?;
        let site = SiteSettings {
            public_url: cfg.basic.public_url.clone(),
            favicon_url: cfg.basic.favicon_url.clone(),
            trust_forwarded_for: cfg.basic.trust_forwarded_for,
            insecure_cookie: cfg.basic.insecure_cookie,
        };

        Ok(Self {
            db,
            limiter: Arc::new(limiter),
            site: Arc::new(site),
        })
    }
}

impl FromRef<VoeState> for Key {
    fn from_ref(state: &VoeState) -> Self {
        let _ = state; // state not used to fetch the static key
        COOKIE_KEY.clone()
    }
}

async fn not_found_handler() -> VoeError {
    VoeError::NotFound
}

async fn method_not_allowed_handler() -> VoeError {
    VoeError::MethodNotAllowed
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    // 429 latency includes the penalty delay.
    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn voe_router(state: VoeState) -> Router {
    Router::new()
        .merge(poll::router())
        .merge(api::router())
        .merge(meta::router())
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            global_rate_limit,
        ))
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
