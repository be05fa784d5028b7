use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use url::Url;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Default: `8080`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite.
    /// TOML: `basic.database_url`. Default: `sqlite://voe.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// Public origin used for the sitemap and robots.txt.
    /// TOML: `basic.public_url`. Default: `https://vim-or-emacs.ari.lt`.
    #[serde(default = "default_public_url")]
    pub public_url: Url,

    /// Where `/favicon.ico` redirects to.
    /// TOML: `basic.favicon_url`. Default: `https://ari.lt/favicon.ico`.
    #[serde(default = "default_favicon_url")]
    pub favicon_url: Url,

    /// Key clients by the first `X-Forwarded-For` entry instead of the peer address.
    /// Only enable behind a reverse proxy that overwrites the header.
    /// TOML: `basic.trust_forwarded_for`. Default: `false`.
    #[serde(default)]
    pub trust_forwarded_for: bool,

    /// Drop the `Secure` attribute from the flash cookie (plain-HTTP local runs).
    /// TOML: `basic.insecure_cookie`. Default: `false`.
    #[serde(default)]
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://voe.db".to_string(),
            loglevel: "info".to_string(),
            public_url: default_public_url(),
            favicon_url: default_favicon_url(),
            trust_forwarded_for: false,
            insecure_cookie: false,
        }
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    8080
}

fn default_public_url() -> Url {
    Url::parse("https://vim-or-emacs.ari.lt").expect("static url is valid")
}

fn default_favicon_url() -> Url {
    Url::parse("https://ari.lt/favicon.ico").expect("static url is valid")
}
