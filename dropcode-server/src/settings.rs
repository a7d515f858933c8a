//! Store configuration read from environment variables.

use dropcode_core::StoreConfig;
use std::str::FromStr;
use std::time::Duration;

pub const TTL_VAR: &str = "DROPCODE_TTL_SECS";
pub const RECLAIM_INTERVAL_VAR: &str = "DROPCODE_RECLAIM_INTERVAL_SECS";
pub const CODE_LENGTH_VAR: &str = "DROPCODE_CODE_LENGTH";
pub const CODE_ALPHABET_VAR: &str = "DROPCODE_CODE_ALPHABET";

/// Builds a [`StoreConfig`] from the process environment.
pub fn config_from_env() -> StoreConfig {
    config_from(|name| std::env::var(name).ok())
}

/// Builds a [`StoreConfig`] from `lookup`, keeping defaults for unset or
/// unparseable values.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> StoreConfig {
    let defaults = StoreConfig::default();

    let ttl = parse_or(&lookup, TTL_VAR, defaults.ttl.as_secs());
    let reclaim_interval = parse_or(
        &lookup,
        RECLAIM_INTERVAL_VAR,
        defaults.reclaim_interval.as_secs(),
    );
    let code_length = parse_or(&lookup, CODE_LENGTH_VAR, defaults.code_length);

    let mut config = defaults
        .with_ttl(Duration::from_secs(ttl))
        .with_reclaim_interval(Duration::from_secs(reclaim_interval))
        .with_code_length(code_length);

    if let Some(alphabet) = lookup(CODE_ALPHABET_VAR) {
        config = config.with_code_alphabet(alphabet);
    }
    config
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {}={:?}, using default {}", name, raw, default);
            default
        }),
    }
}
