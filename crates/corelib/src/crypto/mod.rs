//! Crypto primitives surface area.
//! The engine trait, the memory-hard scratchpad engine and the plain
//! BLAKE3 / Keccak-256 engines exposed through the registry.

pub mod blake3;
pub mod engine;
pub mod hash;
pub mod keccak;
pub mod scratchpad;
