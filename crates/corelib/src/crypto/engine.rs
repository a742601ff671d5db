//! Engine capability: the single operation every hash strategy provides.

use std::marker::PhantomData;

use crate::crypto::hash::{hash_one_shot, Hash32};
use crate::digest::Digest;
use crate::errors::HashError;

/// A pluggable hash strategy.
///
/// Implementations must be deterministic and return a digest for every input,
/// including the empty one. Working memory has to stay private to the call (or
/// to the calling thread) so that engines can be shared across threads.
pub trait HashEngine: Send + Sync {
    /// Stable registry id, e.g. `"scratchpad"`.
    fn id(&self) -> &'static str;

    fn hash(&self, input: &[u8]) -> Result<Digest, HashError>;

    /// Whether the engine deliberately touches a large working set per call.
    fn memory_hard(&self) -> bool {
        false
    }
}

/// Exposes any streaming [`Hash32`] primitive as an engine.
pub struct OneShot<H> {
    _primitive: PhantomData<fn() -> H>,
}

impl<H> Default for OneShot<H> {
    fn default() -> Self {
        Self {
            _primitive: PhantomData,
        }
    }
}

impl<H: Hash32> HashEngine for OneShot<H> {
    fn id(&self) -> &'static str {
        H::ID
    }

    fn hash(&self, input: &[u8]) -> Result<Digest, HashError> {
        Ok(hash_one_shot::<H>(input))
    }
}
