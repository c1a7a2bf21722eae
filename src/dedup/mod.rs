//! NDJSON deduplication
//!
//! Reads one JSON object per line, derives a canonical key from each with a
//! [`KeyPath`](crate::path::KeyPath), and writes only the first record seen
//! for every key. Output keeps input order and is flushed record by record.
//!
//! ## Memory
//!
//! Every distinct key is held in a [`SeenSet`] for the whole run. There is no
//! eviction and no spill to disk, so memory grows with key cardinality.

pub mod config;
pub mod pipeline;
pub mod seen;

pub use config::{DedupConfig, InvalidLinePolicy, ParserBackend};
pub use pipeline::{DedupStats, Deduplicator};
pub use seen::SeenSet;
