use crate::path::KeyPath;

/// JSON decoder used for each input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserBackend {
    #[default]
    Serde,
    /// SIMD-accelerated decoding via simd-json.
    ///
    /// Lines simd-json rejects, such as integers outside the i64/u64 range,
    /// are decoded again with serde_json, so both backends accept the same
    /// input and produce the same records.
    Simd,
}

/// What to do with a line that cannot be parsed or keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidLinePolicy {
    /// Abort the run on the first bad line
    #[default]
    Fail,
    /// Log a warning and move on
    Skip,
}

/// Configuration for a deduplication run
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Path of the field whose value identifies a record
    pub key: KeyPath,

    pub parser: ParserBackend,

    pub on_invalid: InvalidLinePolicy,
}

impl DedupConfig {
    pub fn new(key: KeyPath) -> Self {
        DedupConfig {
            key,
            parser: ParserBackend::default(),
            on_invalid: InvalidLinePolicy::default(),
        }
    }

    pub fn with_parser(mut self, parser: ParserBackend) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_invalid_policy(mut self, policy: InvalidLinePolicy) -> Self {
        self.on_invalid = policy;
        self
    }
}
