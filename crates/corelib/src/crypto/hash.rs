//! Streaming hash trait for the fixed-output primitives.

use crate::digest::{Digest, HASH_SIZE};

/// A simple streaming hash with fixed-size 32-byte digests.
/// Implemented by BLAKE3 and Keccak-256; wrapped into an engine by [`OneShot`](super::engine::OneShot).
pub trait Hash32 {
    /// Registry id of the primitive.
    const ID: &'static str;

    /// Create a new hasher.
    fn new() -> Self
    where
        Self: Sized;
    /// Absorb bytes into the state.
    fn update(&mut self, data: &[u8]);
    /// Finalize and produce a 32-byte digest.
    fn finalize(self) -> [u8; HASH_SIZE];
}

/// Compute one-shot hash.
pub fn hash_one_shot<H: Hash32>(data: &[u8]) -> Digest {
    let mut h = H::new();
    h.update(data);
    Digest::from_bytes(h.finalize())
}

/// Domain-separated hashing: H(label || data)
pub fn hash_labeled<H: Hash32>(label: &str, data: &[u8]) -> [u8; HASH_SIZE] {
    let mut h = H::new();
    h.update(label.as_bytes());
    h.update(data);
    h.finalize()
}
