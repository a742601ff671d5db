//! Error strings surfaced to JavaScript callers.

use xelis_hash_corelib::HashError;

/// Render an error the way the JS API reports it: decoding problems name the
/// offending argument, everything else is a hashing error.
pub fn describe(err: &HashError) -> String {
    match err {
        HashError::InvalidEncoding { what, source } => format!("Invalid {what}: {source}"),
        other => format!("Hashing error: {other}"),
    }
}

pub fn property_error(key: &str) -> String {
    format!("Failed to set {key} property")
}

pub fn batch_input_error(index: u32) -> String {
    format!("Failed to convert input {index} to Uint8Array")
}
