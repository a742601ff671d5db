//! Keccak-256 (original Keccak padding, as used by Ethereum) as Hash32.

use crate::crypto::hash::Hash32;
use crate::digest::HASH_SIZE;
use tiny_keccak::{Hasher as TKHasher, Keccak};

pub struct Keccak256 {
    inner: Keccak,
}

impl Hash32 for Keccak256 {
    const ID: &'static str = "keccak256";

    fn new() -> Self {
        Self {
            inner: Keccak::v256(),
        }
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize(self) -> [u8; HASH_SIZE] {
        let mut out = [0u8; HASH_SIZE];
        self.inner.finalize(&mut out);
        out
    }
}
