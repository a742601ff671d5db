//! WebAssembly bindings for the hashing contract.
//!
//! The exported names (`xelis_hash`, `hash_string`, `batch_hash`, ...) are
//! the ones the JavaScript harness calls. Everything is compiled only for
//! `wasm32`; the error wording lives in [`messages`] so it can be tested on
//! the host.

pub mod messages;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
