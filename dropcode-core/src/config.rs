use std::collections::HashSet;
use std::time::Duration;

use crate::error::StoreError;

/// Default alphabet for generated codes: upper-case letters and digits.
pub const DEFAULT_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest accepted TTL (~100 years); anything longer overflows `Instant` math.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for a [`ContentStore`](crate::ContentStore) and its reclaimer.
///
/// Fixed at construction; a running store never re-reads it.
///
/// # Example
///
/// ```rust
/// use dropcode_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_ttl(Duration::from_secs(120))
///     .with_reclaim_interval(Duration::from_secs(30));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// How long an entry stays retrievable after `put` (default: 5 minutes)
    pub ttl: Duration,
    /// Number of characters in a generated code (default: 6)
    pub code_length: usize,
    /// Characters codes are drawn from (default: `A-Z0-9`)
    pub code_alphabet: String,
    /// Interval between reclaimer sweeps (default: 60 seconds)
    pub reclaim_interval: Duration,
    /// Codes drawn per `try_put` before reporting exhaustion (default: 64)
    pub max_code_draws: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            code_length: DEFAULT_CODE_LENGTH,
            code_alphabet: DEFAULT_CODE_ALPHABET.to_string(),
            reclaim_interval: Duration::from_secs(60),
            max_code_draws: 64,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time-to-live applied to every new entry
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the code length
    pub fn with_code_length(mut self, length: usize) -> Self {
        self.code_length = length;
        self
    }

    /// Sets the alphabet codes are drawn from
    ///
    /// Characters must be ASCII alphanumeric and must not repeat.
    pub fn with_code_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.code_alphabet = alphabet.into();
        self
    }

    /// Sets the interval between reclaimer sweeps
    ///
    /// # Example
    ///
    /// ```rust
    /// use dropcode_core::StoreConfig;
    /// use std::time::Duration;
    ///
    /// // Sweep every 10 seconds
    /// let config = StoreConfig::default()
    ///     .with_reclaim_interval(Duration::from_secs(10));
    /// ```
    pub fn with_reclaim_interval(mut self, interval: Duration) -> Self {
        self.reclaim_interval = interval;
        self
    }

    /// Sets how many codes a single `try_put` may draw
    pub fn with_max_code_draws(mut self, draws: usize) -> Self {
        self.max_code_draws = draws;
        self
    }

    /// Checks that the configuration can back a working store.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.ttl.is_zero() {
            return Err(invalid("ttl must be greater than zero"));
        }
        if self.ttl > MAX_TTL {
            return Err(invalid(format!(
                "ttl must not exceed {}s, got {}s",
                MAX_TTL.as_secs(),
                self.ttl.as_secs()
            )));
        }
        if self.reclaim_interval.is_zero() {
            return Err(invalid("reclaim interval must be greater than zero"));
        }
        if self.code_length == 0 {
            return Err(invalid("code length must be greater than zero"));
        }
        if self.max_code_draws == 0 {
            return Err(invalid("max code draws must be greater than zero"));
        }
        if self.code_alphabet.is_empty() {
            return Err(invalid("code alphabet must not be empty"));
        }
        if let Some(c) = self
            .code_alphabet
            .chars()
            .find(|c| !c.is_ascii_alphanumeric())
        {
            return Err(invalid(format!(
                "code alphabet must be ASCII alphanumeric, found {:?}",
                c
            )));
        }
        let mut seen = HashSet::new();
        if let Some(c) = self.code_alphabet.chars().find(|c| !seen.insert(*c)) {
            return Err(invalid(format!("code alphabet repeats {:?}", c)));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> StoreError {
    StoreError::InvalidConfig(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.reclaim_interval, Duration::from_secs(60));
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_alphabet, DEFAULT_CODE_ALPHABET);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = StoreConfig::new()
            .with_ttl(Duration::from_secs(5))
            .with_reclaim_interval(Duration::from_secs(1))
            .with_code_length(4)
            .with_code_alphabet("ABC123")
            .with_max_code_draws(8);

        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.reclaim_interval, Duration::from_secs(1));
        assert_eq!(config.code_length, 4);
        assert_eq!(config.code_alphabet, "ABC123");
        assert_eq!(config.max_code_draws, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_durations() {
        let zero_ttl = StoreConfig::default().with_ttl(Duration::ZERO);
        assert!(matches!(zero_ttl.validate(), Err(StoreError::InvalidConfig(_))));

        let zero_interval = StoreConfig::default().with_reclaim_interval(Duration::ZERO);
        assert!(matches!(zero_interval.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_ttl_beyond_cap() {
        let huge = StoreConfig::default().with_ttl(Duration::from_secs(u64::MAX));
        assert!(matches!(huge.validate(), Err(StoreError::InvalidConfig(_))));

        let at_cap = StoreConfig::default().with_ttl(MAX_TTL);
        assert!(at_cap.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_alphabets() {
        for alphabet in ["", "AB-C", "ABCA", "ÄB"] {
            let config = StoreConfig::default().with_code_alphabet(alphabet);
            assert!(
                matches!(config.validate(), Err(StoreError::InvalidConfig(_))),
                "alphabet {:?} should be rejected",
                alphabet
            );
        }
    }

    #[test]
    fn test_rejects_zero_length_and_draws() {
        assert!(StoreConfig::default().with_code_length(0).validate().is_err());
        assert!(StoreConfig::default().with_max_code_draws(0).validate().is_err());
    }
}
