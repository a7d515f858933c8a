use thiserror::Error;

/// Errors surfaced by [`ContentStore`](crate::ContentStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The code is absent, expired, or not a well-formed code.
    ///
    /// These cases are deliberately indistinguishable to the caller.
    #[error("content not found or expired")]
    NotFound,

    /// No free code was found within the configured number of draws.
    ///
    /// Only [`ContentStore::try_put`](crate::ContentStore::try_put) returns this;
    /// [`ContentStore::put`](crate::ContentStore::put) retries with backoff instead.
    #[error("code space exhausted after {attempts} draws ({live} entries held)")]
    CodeSpaceExhausted {
        /// Number of codes drawn before giving up
        attempts: usize,
        /// Entries held by the store at the time, expired ones included
        live: usize,
    },

    /// The store configuration was rejected at construction.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Returns `true` if this error means the code does not resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_does_not_leak_reason() {
        assert_eq!(StoreError::NotFound.to_string(), "content not found or expired");
        assert!(StoreError::NotFound.is_not_found());
    }

    #[test]
    fn test_exhausted_message() {
        let err = StoreError::CodeSpaceExhausted { attempts: 64, live: 36 };
        assert_eq!(
            err.to_string(),
            "code space exhausted after 64 draws (36 entries held)"
        );
        assert!(!err.is_not_found());
    }
}
