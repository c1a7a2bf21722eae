use crate::dedup::config::{DedupConfig, InvalidLinePolicy, ParserBackend};
use crate::dedup::seen::SeenSet;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{BufRead, Write};
use tracing::{debug, trace, warn};

/// Counters for a single deduplication run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Lines read from the input
    pub lines: u64,
    /// First-occurrence records written
    pub emitted: u64,
    /// Records dropped because their key was already seen
    pub duplicates: u64,
    /// Invalid lines skipped under `InvalidLinePolicy::Skip`
    pub skipped: u64,
}

/// Streams NDJSON records, keeping the first record for each canonical key
pub struct Deduplicator {
    config: DedupConfig,
    seen: SeenSet,
    /// Copy of the current line for simd-json, which decodes in place
    scratch: Vec<u8>,
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Deduplicator {
            config,
            seen: SeenSet::new(),
            scratch: Vec::new(),
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Process every line of `reader`, writing first occurrences to `writer`.
    ///
    /// Each line is handled completely before the next one is read. Records
    /// written before a fatal error stay written.
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<DedupStats> {
        let mut stats = DedupStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Failed to read line {}", stats.lines + 1))?;
            if read == 0 {
                break;
            }

            stats.lines += 1;
            let line_no = stats.lines;
            trim_line_ending(&mut buf);

            let (doc, key) = match self.key_record(&buf, line_no) {
                Ok(keyed) => keyed,
                Err(err) if self.config.on_invalid == InvalidLinePolicy::Skip => {
                    let reason = format!("{:#}", err);
                    warn!(line = line_no, "Skipping invalid line: {}", reason);
                    stats.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if !self.seen.insert(key) {
                trace!(line = line_no, "Duplicate record dropped");
                stats.duplicates += 1;
                continue;
            }

            serde_json::to_writer(&mut writer, &doc)
                .with_context(|| format!("Failed to write record from line {}", line_no))?;
            writer.write_all(b"\n").context("Failed to write record")?;
            writer.flush().context("Failed to flush output")?;
            stats.emitted += 1;
        }

        debug!(
            lines = stats.lines,
            emitted = stats.emitted,
            duplicates = stats.duplicates,
            skipped = stats.skipped,
            distinct_keys = self.seen.len(),
            "Deduplication finished"
        );

        Ok(stats)
    }

    /// Parse one line and derive its canonical key
    fn key_record(&mut self, buf: &[u8], line_no: u64) -> Result<(Map<String, Value>, String)> {
        let doc = self
            .parse_record(buf)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no))?;

        let key = self
            .config
            .key
            .resolve(&doc)
            .with_context(|| format!("Failed to resolve key {} on line {}", self.config.key, line_no))?;

        Ok((doc, key))
    }

    fn parse_record(&mut self, buf: &[u8]) -> Result<Map<String, Value>> {
        let doc = match self.config.parser {
            ParserBackend::Serde => serde_json::from_slice(buf)?,
            ParserBackend::Simd => {
                self.scratch.clear();
                self.scratch.extend_from_slice(buf);
                match simd_json::serde::from_slice::<Map<String, Value>>(&mut self.scratch) {
                    Ok(doc) => doc,
                    // simd-json rejects integers outside i64/u64, serde_json widens them to f64
                    Err(err) => {
                        trace!(error = %err, "simd-json failed, retrying with serde_json");
                        serde_json::from_slice(buf)?
                    }
                }
            }
        };
        Ok(doc)
    }
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
