//! # Dropcode Core
//!
//! An in-memory drop box: a sender stores text, links or a file and gets a
//! short code back; a receiver presents the code and gets the content, until
//! a fixed time-to-live runs out and the content is purged.
//!
//! ## Features
//!
//! - Short, human-typeable codes drawn from a configurable alphabet
//! - Deduplication: identical content submitted while still live shares one code
//! - Expiry enforced on every read (lazy eviction)
//! - Background [`Reclaimer`] that sweeps expired entries nobody asked for
//!
//! ## Example
//!
//! ```rust,no_run
//! use dropcode_core::{Content, ContentStore, Reclaimer, StoreConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Five minute TTL, sweep once a minute
//!     let store = ContentStore::new();
//!
//!     // Or with a custom configuration
//!     let config = StoreConfig::default()
//!         .with_ttl(Duration::from_secs(60))
//!         .with_reclaim_interval(Duration::from_secs(10));
//!     let store = ContentStore::with_config(config).unwrap();
//!     let reclaimer = Reclaimer::start(store.clone());
//!
//!     let receipt = store.put(Content::text("hello")).await;
//!     println!("share this code: {}", receipt.code);
//!
//!     if let Ok(content) = store.get(&receipt.code) {
//!         println!("got {} bytes", content.len());
//!     }
//!
//!     reclaimer.shutdown().await;
//! }
//! ```

mod code;
mod config;
mod content;
mod entry;
mod error;
mod fingerprint;
mod reclaimer;
mod store;

pub use config::{StoreConfig, DEFAULT_CODE_ALPHABET, DEFAULT_CODE_LENGTH, MAX_TTL};
pub use content::{Content, ContentKind, Metadata};
pub use error::StoreError;
pub use reclaimer::Reclaimer;
pub use store::{ContentStore, Receipt, StoreStats};
