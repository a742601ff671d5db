//! Fixed-size digest type produced by every hash engine.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::errors::HashError;

/// Size of every digest in bytes.
pub const HASH_SIZE: usize = 32;

/// Output of a [`HashEngine`](crate::crypto::engine::HashEngine).
///
/// Always exactly [`HASH_SIZE`] bytes long. Displays as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; HASH_SIZE]);

impl Digest {
    /// Wraps raw engine output.
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Lowercase hex encoding of the digest.
    pub fn to_hex(&self) -> String {
        encoding::bytes_to_hex(&self.0)
    }

    /// Always [`HASH_SIZE`].
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        HASH_SIZE
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Digest {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for Vec<u8> {
    fn from(digest: Digest) -> Self {
        digest.to_vec()
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = HashError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != HASH_SIZE {
            return Err(HashError::InvalidLength {
                expected: HASH_SIZE,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }
}

impl FromStr for Digest {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = encoding::hex_to_bytes(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            Digest::try_from(bytes.as_slice()).map_err(serde::de::Error::custom)
        }
    }
}
