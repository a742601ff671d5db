use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid {what}: {source}")]
    InvalidEncoding {
        what: &'static str,
        #[source]
        source: hex::FromHexError,
    },
    #[error("invalid digest length {actual}, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("engine '{engine}' failed in {operation} on {input_len}-byte input: {reason}")]
    EngineFailure {
        engine: &'static str,
        operation: &'static str,
        input_len: usize,
        reason: String,
    },
    #[error("batch element {index} failed: {source}")]
    BatchElement {
        index: usize,
        #[source]
        source: Box<HashError>,
    },
}

impl HashError {
    /// Unwraps batch context down to the error of the failing element.
    pub fn root(&self) -> &HashError {
        match self {
            HashError::BatchElement { source, .. } => source.root(),
            other => other,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("hash engine with id '{0}' is already registered")]
    DuplicateEngine(String),
    #[error("hash engine '{0}' not found")]
    EngineNotFound(String),
    #[error("hash engine id '{0}' must be non-empty lowercase with no surrounding whitespace")]
    InvalidEngineId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("parallel_threshold must be at least 1")]
    ZeroParallelThreshold,
}
