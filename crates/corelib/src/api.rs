//! Contract layer: single-input, iterated, batch, verification and metadata
//! operations on top of a [`HashEngine`].

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::config::HashConfig;
use crate::crypto::engine::HashEngine;
use crate::digest::{Digest, HASH_SIZE};
use crate::encoding::decode_labeled;
use crate::errors::{ConfigError, HashError, RegistryError};
use crate::metadata::{DetailedDigest, HashMetadata};
use crate::registry;

/// Returns the digest size in bytes.
pub const fn get_hash_size() -> usize {
    HASH_SIZE
}

/// Hashing front-end bound to one engine.
///
/// Cheap to clone; the engine is shared. Holds no mutable state, so one
/// instance can serve any number of threads.
#[derive(Clone)]
pub struct Hasher {
    engine: Arc<dyn HashEngine>,
    parallel_batch: bool,
    parallel_threshold: usize,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("engine", &self.engine.id())
            .field("parallel_batch", &self.parallel_batch)
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(registry::default_engine())
    }
}

impl Hasher {
    pub fn new(engine: Arc<dyn HashEngine>) -> Self {
        let defaults = HashConfig::default();
        Self {
            engine,
            parallel_batch: defaults.parallel_batch,
            parallel_threshold: defaults.parallel_threshold,
        }
    }

    /// Build a hasher for a registered engine id.
    pub fn with_engine_id(id: &str) -> Result<Self, RegistryError> {
        let engine = registry::get_engine(id)?;
        debug!(engine = engine.id(), "selected hash engine");
        Ok(Self::new(engine))
    }

    pub fn from_config(cfg: &HashConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut hasher = Self::with_engine_id(&cfg.engine)?;
        hasher.parallel_batch = cfg.parallel_batch;
        hasher.parallel_threshold = cfg.parallel_threshold;
        Ok(hasher)
    }

    /// Enable or disable rayon fan-out for [`Hasher::hash_batch`].
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel_batch = enabled;
        self
    }

    pub fn engine_id(&self) -> &'static str {
        self.engine.id()
    }

    /// Run the engine once, tagging any engine failure with the public
    /// operation that triggered it.
    fn run(&self, operation: &'static str, input: &[u8]) -> Result<Digest, HashError> {
        trace!(engine = self.engine.id(), operation, input_len = input.len(), "hash");
        self.engine
            .hash(input)
            .map_err(|err| match err {
                HashError::EngineFailure {
                    engine,
                    input_len,
                    reason,
                    ..
                } => HashError::EngineFailure {
                    engine,
                    operation,
                    input_len,
                    reason,
                },
                other => other,
            })
            .inspect_err(|err| {
                warn!(
                    engine = self.engine.id(),
                    operation,
                    input_len = input.len(),
                    "hash engine failure: {err}"
                )
            })
    }

    pub fn hash_bytes(&self, input: &[u8]) -> Result<Digest, HashError> {
        self.run("hash_bytes", input)
    }

    pub fn hash_hex(&self, input: &[u8]) -> Result<String, HashError> {
        self.run("hash_hex", input).map(|digest| digest.to_hex())
    }

    /// Hash the UTF-8 encoding of `text`.
    pub fn hash_text(&self, text: &str) -> Result<String, HashError> {
        self.run("hash_text", text.as_bytes())
            .map(|digest| digest.to_hex())
    }

    /// Apply the engine `iterations` times, feeding each digest back in.
    ///
    /// Zero iterations return `input` unchanged, whatever its length.
    pub fn hash_iterated(&self, input: &[u8], iterations: u32) -> Result<Vec<u8>, HashError> {
        if iterations == 0 {
            return Ok(input.to_vec());
        }

        let mut result = self.run("hash_iterated", input)?;
        for _ in 1..iterations {
            result = self.run("hash_iterated", result.as_bytes())?;
        }
        Ok(result.to_vec())
    }

    /// Hash every input independently. `result[i]` belongs to `inputs[i]`.
    ///
    /// The whole batch fails if any element fails; the error names the lowest
    /// failing index.
    pub fn hash_batch<I>(&self, inputs: &[I]) -> Result<Vec<Digest>, HashError>
    where
        I: AsRef<[u8]> + Sync,
    {
        let results: Vec<Result<Digest, HashError>> =
            if self.parallel_batch && inputs.len() >= self.parallel_threshold {
                debug!(
                    engine = self.engine.id(),
                    items = inputs.len(),
                    "parallel batch"
                );
                inputs
                    .par_iter()
                    .map(|input| self.run("hash_batch", input.as_ref()))
                    .collect()
            } else {
                inputs
                    .iter()
                    .map(|input| self.run("hash_batch", input.as_ref()))
                    .collect()
            };

        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.map_err(|source| HashError::BatchElement {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }

    pub fn hash_with_metadata(&self, input: &[u8]) -> Result<HashMetadata, HashError> {
        let digest = self.run("hash_with_metadata", input)?;
        Ok(HashMetadata::from_digest(input.len(), digest))
    }

    pub fn hash_detailed(&self, input: &[u8]) -> Result<DetailedDigest, HashError> {
        self.run("hash_detailed", input).map(DetailedDigest::from)
    }
}

/// Compare two hex-encoded digests. Case-insensitive; no hashing involved.
pub fn verify(hex_a: &str, hex_b: &str) -> Result<bool, HashError> {
    let a = decode_labeled("first hash", hex_a)?;
    let b = decode_labeled("second hash", hex_b)?;
    Ok(a == b)
}

/// `hash_bytes` with the default engine.
pub fn hash_bytes(input: &[u8]) -> Result<Digest, HashError> {
    Hasher::default().hash_bytes(input)
}

pub fn hash_hex(input: &[u8]) -> Result<String, HashError> {
    Hasher::default().hash_hex(input)
}

pub fn hash_text(text: &str) -> Result<String, HashError> {
    Hasher::default().hash_text(text)
}

pub fn hash_iterated(input: &[u8], iterations: u32) -> Result<Vec<u8>, HashError> {
    Hasher::default().hash_iterated(input, iterations)
}

pub fn hash_batch<I>(inputs: &[I]) -> Result<Vec<Digest>, HashError>
where
    I: AsRef<[u8]> + Sync,
{
    Hasher::default().hash_batch(inputs)
}

pub fn hash_with_metadata(input: &[u8]) -> Result<HashMetadata, HashError> {
    Hasher::default().hash_with_metadata(input)
}

pub fn hash_detailed(input: &[u8]) -> Result<DetailedDigest, HashError> {
    Hasher::default().hash_detailed(input)
}
