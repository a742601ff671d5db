//! Core library: hash engines, hex helpers and the contract API shared by the
//! CLI, the C ABI and the WebAssembly bindings.

pub mod api;
pub mod config;
pub mod crypto;
pub mod diagnostics;
pub mod digest;
pub mod encoding;
pub mod errors;
pub mod metadata;
pub mod registry;

pub use api::{
    get_hash_size, hash_batch, hash_bytes, hash_detailed, hash_hex, hash_iterated, hash_text,
    hash_with_metadata, verify, Hasher,
};
pub use config::HashConfig;
pub use crypto::engine::HashEngine;
pub use diagnostics::init;
pub use digest::{Digest, HASH_SIZE};
pub use encoding::{bytes_to_hex, hex_to_bytes};
pub use errors::{ConfigError, HashError, RegistryError};
pub use metadata::{DetailedDigest, HashMetadata};
pub use registry::EngineInfo;

/// API: list available engines
pub fn list_engines() -> Vec<EngineInfo> {
    registry::list_engine_infos()
}

/// Version helper for CLI/FFI
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
