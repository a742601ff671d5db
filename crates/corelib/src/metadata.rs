//! Derived records describing a single hashing operation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::Digest;

/// Lengths plus both encodings of one digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashMetadata {
    pub input_length: usize,
    pub hash_length: usize,
    pub hash_hex: String,
    #[serde(with = "digest_as_bytes")]
    pub hash_bytes: Digest,
}

impl HashMetadata {
    /// Derive every field from one digest, so hex and bytes cannot drift apart.
    pub fn from_digest(input_length: usize, digest: Digest) -> Self {
        Self {
            input_length,
            hash_length: digest.len(),
            hash_hex: digest.to_hex(),
            hash_bytes: digest,
        }
    }
}

/// Digest in both encodings together with its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedDigest {
    #[serde(with = "digest_as_bytes")]
    pub bytes: Digest,
    pub hex: String,
    pub size: usize,
}

impl From<Digest> for DetailedDigest {
    fn from(digest: Digest) -> Self {
        Self {
            bytes: digest,
            hex: digest.to_hex(),
            size: digest.len(),
        }
    }
}

// Raw bytes as a number array, so JSON consumers get the byte view next to the hex one.
mod digest_as_bytes {
    use super::*;
    use std::convert::TryFrom;

    pub fn serialize<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(digest.as_bytes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Digest::try_from(bytes.as_slice()).map_err(serde::de::Error::custom)
    }
}
