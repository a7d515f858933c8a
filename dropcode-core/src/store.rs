use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::code::CodeGenerator;
use crate::config::StoreConfig;
use crate::content::Content;
use crate::entry::Entry;
use crate::error::StoreError;
use crate::fingerprint::Fingerprint;

/// First pause before `put` retries an exhausted code space.
const INITIAL_BACKOFF: Duration = Duration::from_millis(10);

/// Upper bound on the pause between `put` retries.
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// What the sender gets back from a put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Code the receiver presents to fetch the content
    pub code: String,
    /// `true` if identical content was already live and its code was reused
    pub reused: bool,
    /// Time left before the content is purged
    pub expires_in: Duration,
}

/// Entry counts of both indices, for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Entries held, including expired ones not yet reclaimed
    pub entries: usize,
    /// Fingerprints held by the dedup index
    pub fingerprints: usize,
}

/// Primary and dedup indices. Only ever touched under `StoreInner::indices`.
#[derive(Default)]
struct Indices {
    by_code: HashMap<String, Entry>,
    by_fingerprint: HashMap<Fingerprint, String>,
}

impl Indices {
    /// Removes `code` from both indices.
    ///
    /// Returns the removed entry and whether the dedup index pointed back at it.
    fn evict(&mut self, code: &str) -> Option<(Entry, bool)> {
        let entry = self.by_code.remove(code)?;
        let fingerprint = entry.fingerprint();
        let consistent = match self.by_fingerprint.get(&fingerprint) {
            Some(mapped) if mapped == code => {
                self.by_fingerprint.remove(&fingerprint);
                true
            }
            _ => false,
        };
        Some((entry, consistent))
    }

    fn live_count(&self, now: Instant) -> usize {
        self.by_code.values().filter(|e| e.is_live_at(now)).count()
    }
}

struct StoreInner {
    indices: Mutex<Indices>,
    generator: CodeGenerator,
    ttl: Duration,
    reclaim_interval: Duration,
    max_code_draws: usize,
}

/// Ephemeral content store keyed by short codes.
///
/// Identical payloads submitted while an earlier copy is still live share one
/// code. Every entry expires a fixed TTL after it was first stored; expired
/// entries are never returned, whether or not they have been reclaimed yet.
///
/// A single mutex guards both the code index and the fingerprint index, so
/// every operation observes and leaves them consistent. No I/O happens while
/// it is held.
///
/// The store does not bound payload size. Callers accepting uploads must cap
/// it before calling [`put`](Self::put).
///
/// Cloning is cheap and yields a handle to the same store.
///
/// # Example
///
/// ```rust
/// use dropcode_core::{Content, ContentStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = ContentStore::new();
///
/// let receipt = store.put(Content::text("hello")).await;
/// let content = store.get(&receipt.code).unwrap();
/// assert_eq!(content.as_text(), Some("hello"));
/// # }
/// ```
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<StoreInner>,
}

impl ContentStore {
    /// Creates a store with the default configuration
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Creates a store with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` if the configuration fails
    /// [`StoreConfig::validate`].
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                indices: Mutex::new(Indices::default()),
                generator: CodeGenerator::new(&config.code_alphabet, config.code_length),
                ttl: config.ttl,
                reclaim_interval: config.reclaim_interval,
                max_code_draws: config.max_code_draws,
            }),
        }
    }

    /// TTL applied to new entries
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Sweep interval configured for this store's reclaimer
    pub fn reclaim_interval(&self) -> Duration {
        self.inner.reclaim_interval
    }

    /// Stores content and returns the code to retrieve it.
    ///
    /// If identical bytes are already live, their code is returned and their
    /// expiry is left untouched. Never fails: if no free code can be drawn,
    /// the call backs off and retries until one frees up.
    pub async fn put(&self, content: Content) -> Receipt {
        let mut backoff = INITIAL_BACKOFF;
        loop {
            match self.try_put(content.clone()) {
                Ok(receipt) => return receipt,
                Err(err) => {
                    tracing::warn!(error = %err, retry_in = ?backoff, "put deferred");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    /// Single attempt at [`put`](Self::put).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CodeSpaceExhausted` if every drawn code belongs
    /// to a live entry.
    pub fn try_put(&self, content: Content) -> Result<Receipt, StoreError> {
        let fingerprint = Fingerprint::of(content.bytes());
        let now = Instant::now();
        let mut indices = self.inner.indices.lock();

        if let Some(code) = indices.by_fingerprint.get(&fingerprint).cloned() {
            match indices.by_code.get(&code) {
                Some(entry) if entry.is_live_at(now) => {
                    tracing::debug!(code = %code, "reusing code for identical content");
                    return Ok(Receipt {
                        expires_in: entry.remaining_at(now),
                        code,
                        reused: true,
                    });
                }
                Some(_) => {
                    indices.evict(&code);
                    tracing::debug!(code = %code, "evicted expired duplicate on put");
                }
                None => {
                    tracing::warn!(code = %code, ?fingerprint, "dedup index pointed at a missing entry");
                    indices.by_fingerprint.remove(&fingerprint);
                }
            }
        }

        let code = self.draw_code(&mut indices, now)?;
        indices.by_fingerprint.insert(fingerprint, code.clone());
        indices
            .by_code
            .insert(code.clone(), Entry::new(fingerprint, content, now, self.inner.ttl));
        tracing::debug!(code = %code, "stored new content");

        Ok(Receipt {
            code,
            reused: false,
            expires_in: self.inner.ttl,
        })
    }

    /// Draws codes until one is not held by a live entry.
    ///
    /// An expired entry holding the drawn code is evicted and its code reused.
    fn draw_code(&self, indices: &mut Indices, now: Instant) -> Result<String, StoreError> {
        let capacity = self.inner.generator.capacity();
        if indices.by_code.len() >= capacity {
            let live = indices.live_count(now);
            if live >= capacity {
                return Err(StoreError::CodeSpaceExhausted { attempts: 0, live });
            }
        }

        let mut rng = rand::thread_rng();
        for _ in 0..self.inner.max_code_draws {
            let candidate = self.inner.generator.generate(&mut rng);
            match indices.by_code.get(&candidate) {
                None => return Ok(candidate),
                Some(existing) if !existing.is_live_at(now) => {
                    indices.evict(&candidate);
                    tracing::debug!(code = %candidate, "rotated expired entry out of drawn code");
                    return Ok(candidate);
                }
                Some(_) => continue,
            }
        }

        Err(StoreError::CodeSpaceExhausted {
            attempts: self.inner.max_code_draws,
            live: indices.by_code.len(),
        })
    }

    /// Retrieves the content stored under `code`.
    ///
    /// Reading does not consume the entry; it stays retrievable until it
    /// expires. An expired entry found here is removed on the spot.
    ///
    /// Surrounding whitespace in `code` is ignored, and so is letter case
    /// when the code alphabet has no lower-case letters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for absent, expired and malformed codes
    /// alike.
    pub fn get(&self, code: &str) -> Result<Content, StoreError> {
        self.with_live_entry(code, |entry, _| entry.content().clone())
    }

    /// Time left before the content under `code` expires.
    ///
    /// Same liveness rule and lazy eviction as [`get`](Self::get).
    pub fn remaining_ttl(&self, code: &str) -> Result<Duration, StoreError> {
        self.with_live_entry(code, |entry, now| entry.remaining_at(now))
    }

    /// Runs `f` on the live entry for `code`, evicting it instead if expired.
    fn with_live_entry<T>(
        &self,
        code: &str,
        f: impl FnOnce(&Entry, Instant) -> T,
    ) -> Result<T, StoreError> {
        let code = self.inner.generator.normalize(code);
        if !self.inner.generator.is_well_formed(&code) {
            return Err(StoreError::NotFound);
        }

        let now = Instant::now();
        let mut indices = self.inner.indices.lock();
        let entry = indices.by_code.get(&code).ok_or(StoreError::NotFound)?;

        if entry.is_live_at(now) {
            return Ok(f(entry, now));
        }

        if let Some((expired, _)) = indices.evict(&code) {
            tracing::debug!(code = %code, age = ?expired.age_at(now), "evicted expired entry on read");
        }
        Err(StoreError::NotFound)
    }

    /// Removes every expired entry from both indices.
    ///
    /// Returns the number of entries removed. Running it again on a clean
    /// store is a no-op. An entry whose dedup record is missing or points
    /// elsewhere is still removed; the mismatch is logged and the sweep goes
    /// on. Dedup records left pointing at no entry are dropped afterwards.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut indices = self.inner.indices.lock();

        let expired: Vec<String> = indices
            .by_code
            .iter()
            .filter(|(_, entry)| !entry.is_live_at(now))
            .map(|(code, _)| code.clone())
            .collect();

        let mut removed = 0;
        let mut mismatched = 0;
        for code in expired {
            let Some((entry, consistent)) = indices.evict(&code) else {
                continue;
            };
            removed += 1;
            if !consistent {
                mismatched += 1;
                tracing::warn!(
                    code = %code,
                    fingerprint = ?entry.fingerprint(),
                    "purged entry had no matching dedup index record"
                );
            }
        }

        if mismatched > 0 {
            let Indices {
                by_code,
                by_fingerprint,
            } = &mut *indices;
            let before = by_fingerprint.len();
            by_fingerprint.retain(|_, code| by_code.contains_key(code));
            tracing::warn!(
                mismatched,
                dangling = before - by_fingerprint.len(),
                "dropped dangling dedup index records"
            );
        }
        removed
    }

    /// Entry counts of both indices
    pub fn stats(&self) -> StoreStats {
        let indices = self.inner.indices.lock();
        StoreStats {
            entries: indices.by_code.len(),
            fingerprints: indices.by_fingerprint.len(),
        }
    }

    /// Number of entries held, including expired ones not yet reclaimed
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.indices.lock().by_code.len()
    }

    /// Returns `true` if the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.indices.lock().by_code.is_empty()
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}
