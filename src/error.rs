use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("merge needs between 2 and {max} input runs, got {got}")]
    InvalidArity { got: usize, max: usize },
    #[error("merge capacity must be at least 1")]
    ZeroCapacity,
    #[error("block length must be at least 1")]
    ZeroBlockLen,
    #[error("total length {total_len} exceeds buffer length {buffer_len}")]
    BufferTooShort { total_len: usize, buffer_len: usize },
    #[error("run {run} is out of order at index {index}")]
    UnsortedRun { run: usize, index: usize },
    #[error("run {run} reported {consumed} consumed elements but only {remaining} remain")]
    ConsumedPastEnd {
        run: usize,
        consumed: usize,
        remaining: usize,
    },
    #[error("cannot index {len} elements with u32 positions")]
    IndexOverflow { len: usize },
    #[error("buffer of {len} elements does not split into rows of {row_len}")]
    RaggedRows { len: usize, row_len: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] MergeError),
}
