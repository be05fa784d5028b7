mod basic;
mod limits;

pub use basic::BasicConfig;
pub use limits::LimitsConfig;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Request and vote rate limits (see `limits` table in config.toml).
    #[serde(default)]
    pub limits: LimitsConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Builds a Figment that merges defaults and a config TOML file.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `config.toml` if present.
    pub fn from_optional_toml() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        })
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_deployment() {
        let cfg = Config::default();
        assert_eq!(cfg.basic.listen_port, 8080);
        assert_eq!(cfg.basic.database_url, "sqlite://voe.db");
        assert_eq!(cfg.limits.vote_period_secs, 24 * 60 * 60);
        assert_eq!(cfg.limits.requests_per_minute, 30);
        assert_eq!(cfg.limits.requests_per_second, 6);
        assert_eq!(cfg.limits.max_penalty_secs, 15);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                listen_port = 9000

                [limits]
                max_penalty_secs = 0
                "#,
            ))
            .extract()
            .expect("config extracts");

        assert_eq!(cfg.basic.listen_port, 9000);
        assert_eq!(cfg.basic.loglevel, "info");
        assert_eq!(cfg.limits.max_penalty_secs, 0);
        assert_eq!(cfg.limits.requests_per_second, 6);
    }
}
