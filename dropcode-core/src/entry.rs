use std::time::Duration;
use tokio::time::Instant;

use crate::content::Content;
use crate::fingerprint::Fingerprint;

/// A stored payload with its dedup fingerprint and lifetime.
///
/// Never mutated after creation; it only exists or is removed.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    fingerprint: Fingerprint,
    content: Content,
    created_at: Instant,
    expires_at: Instant,
}

impl Entry {
    pub(crate) fn new(
        fingerprint: Fingerprint,
        content: Content,
        created_at: Instant,
        ttl: Duration,
    ) -> Self {
        Self {
            fingerprint,
            content,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub(crate) fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub(crate) fn content(&self) -> &Content {
        &self.content
    }

    pub(crate) fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Live strictly before `expires_at`.
    pub(crate) fn is_live_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub(crate) fn remaining_at(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
