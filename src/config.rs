//! Middleware configuration and log-level resolution.
//!
//! A [`Config`] is plain data. The host starts from [`create_config`], lays the
//! user's overrides on top (see [`mount`](crate::middleware::mount)) and hands
//! the finished value to the middleware. Resolution into a [`Level`] never
//! fails: names it does not know fall back to [`Level::Info`].

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Label attached to every record when the user does not pick one.
pub const DEFAULT_PREFIX: &str = "[YOUR_PLUGIN]";

/// Level name used when the user does not pick one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Level ─────────────────────────────────────────────────────────────────────

/// Severity of an emitted record. Ordered `Debug < Info < Warn < Error`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Upper-case name, as written by text sinks (e.g. `"DEBUG"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info  => "INFO",
            Self::Warn  => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info  => tracing::Level::INFO,
            Level::Warn  => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

/// User-facing settings of the request logger.
///
/// Deserializes from `{"prefix": "...", "logLevel": "..."}`. Fields that are
/// missing, `null`, or not strings keep the values of [`create_config`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Message of every record.
    #[serde(deserialize_with = "prefix_or_default")]
    pub prefix: String,
    /// One of `debug`, `info`, `warn`, `error`. Anything else means `info`.
    #[serde(deserialize_with = "log_level_or_default")]
    pub log_level: String,
}

fn prefix_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    string_or(d, DEFAULT_PREFIX)
}

fn log_level_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    string_or(d, DEFAULT_LOG_LEVEL)
}

/// Any JSON value is accepted; only a string replaces the default.
fn string_or<'de, D: Deserializer<'de>>(d: D, default: &str) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        _ => Ok(default.to_owned()),
    }
}

impl Config {
    /// Shorthand for [`resolve_level`].
    pub fn level(&self) -> Level {
        resolve_level(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        create_config()
    }
}

/// Returns the documented defaults: prefix `"[YOUR_PLUGIN]"`, level `"info"`.
pub fn create_config() -> Config {
    Config {
        prefix: DEFAULT_PREFIX.to_owned(),
        log_level: DEFAULT_LOG_LEVEL.to_owned(),
    }
}

/// Maps the configured level name to a [`Level`].
///
/// Matching is exact and case-sensitive. `"warn"` maps to [`Level::Debug`];
/// this mirrors the behaviour deployed configurations already rely on.
pub fn resolve_level(config: &Config) -> Level {
    match config.log_level.as_str() {
        "debug" => Level::Debug,
        "info"  => Level::Info,
        "warn"  => Level::Debug,
        "error" => Level::Error,
        _       => Level::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_level(name: &str) -> Config {
        Config { log_level: name.to_owned(), ..create_config() }
    }

    #[test]
    fn known_names_resolve() {
        assert_eq!(resolve_level(&with_level("debug")), Level::Debug);
        assert_eq!(resolve_level(&with_level("info")), Level::Info);
        assert_eq!(resolve_level(&with_level("error")), Level::Error);
    }

    #[test]
    fn warn_resolves_to_debug() {
        assert_eq!(resolve_level(&with_level("warn")), Level::Debug);
    }

    #[test]
    fn unknown_names_fall_back_to_info() {
        for name in ["", "trace", "DEBUG", "Warn", "fatal", " info", "error\n"] {
            assert_eq!(resolve_level(&with_level(name)), Level::Info, "{name:?}");
        }
    }

    #[test]
    fn defaults_are_stable() {
        let first = create_config();
        assert_eq!(first.prefix, "[YOUR_PLUGIN]");
        assert_eq!(first.log_level, "info");
        assert_eq!(first, create_config());
        assert_eq!(first, Config::default());
        assert_eq!(first.level(), Level::Info);
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"prefix":"[TEST]"}"#).unwrap();
        assert_eq!(cfg.prefix, "[TEST]");
        assert_eq!(cfg.level(), Level::Info);

        let cfg: Config = serde_json::from_str(r#"{"logLevel":"error"}"#).unwrap();
        assert_eq!(cfg.prefix, DEFAULT_PREFIX);
        assert_eq!(cfg.level(), Level::Error);
    }

    #[test]
    fn null_or_mistyped_fields_keep_defaults() {
        for raw in [
            r#"{"logLevel":null}"#,
            r#"{"logLevel":5}"#,
            r#"{"prefix":null}"#,
            r#"{"prefix":["x"],"logLevel":{"a":1}}"#,
        ] {
            let cfg: Config = serde_json::from_str(raw).unwrap();
            assert_eq!(cfg, create_config(), "{raw}");
        }

        let cfg: Config = serde_json::from_str(r#"{"prefix":"[P]","logLevel":false}"#).unwrap();
        assert_eq!(cfg.prefix, "[P]");
        assert_eq!(cfg.level(), Level::Info);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert_eq!(Level::Error.to_string(), "ERROR");
    }
}
