//! # ldjuniq - NDJSON Deduplication
//!
//! Removes duplicate records from a newline-delimited JSON stream, keyed by
//! the value at a dot-notation field path. The first record for each key is
//! kept, input order is preserved, and output is written as it is produced.
//!
//! ## Modules
//!
//! - **path**: Parse dot-notation keys such as `user.address.city`
//! - **resolve**: Turn the value at a path into a canonical string key
//! - **dedup**: Stream records through a seen-set and emit first occurrences
//!
//! ## Quick Start
//!
//! ```rust
//! use ldjuniq::{dedup_ndjson, DedupConfig, KeyPath};
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = "{\"id\":1,\"v\":\"a\"}\n{\"id\":1.0,\"v\":\"b\"}\n{\"id\":2,\"v\":\"c\"}\n";
//! let mut output = Vec::new();
//!
//! let config = DedupConfig::new(KeyPath::parse("id")?);
//! let stats = dedup_ndjson(input.as_bytes(), &mut output, config)?;
//!
//! // `1` and `1.0` share the key "1.000000"
//! assert_eq!(stats.emitted, 2);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::io::{BufRead, Write};

pub mod dedup;
pub mod path;
pub mod resolve;

pub use dedup::{DedupConfig, DedupStats, Deduplicator, InvalidLinePolicy, ParserBackend, SeenSet};
pub use path::{KeyPath, KeyPathError};
pub use resolve::{canonical_number, resolve, JsonKind, ResolveError};

/// Main entry point: deduplicate an NDJSON stream
pub fn dedup_ndjson<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    config: DedupConfig,
) -> Result<DedupStats> {
    let mut dedup = Deduplicator::new(config);
    dedup.run(reader, writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_dedup() {
        let input = "{\"user\":{\"id\":\"u1\"},\"n\":1}\n{\"user\":{\"id\":\"u1\"},\"n\":2}\n";
        let mut output = Vec::new();

        let config = DedupConfig::new(KeyPath::parse("user.id").unwrap());
        let stats = dedup_ndjson(input.as_bytes(), &mut output, config).unwrap();

        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"n\":1,\"user\":{\"id\":\"u1\"}}\n"
        );
    }
}
