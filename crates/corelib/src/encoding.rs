//! Hex helpers shared by every API surface.

use crate::errors::HashError;

/// Encodes bytes as lowercase hex, two characters per byte.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string. Upper-case digits are accepted.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>, HashError> {
    decode_labeled("hex string", hex_str)
}

/// Decodes `hex_str`, tagging a failure with `what` so callers can tell inputs apart.
pub(crate) fn decode_labeled(what: &'static str, hex_str: &str) -> Result<Vec<u8>, HashError> {
    hex::decode(hex_str).map_err(|source| HashError::InvalidEncoding { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_in_order() {
        assert_eq!(bytes_to_hex(&[]), "");
        assert_eq!(bytes_to_hex(&[0x00, 0xab, 0x7f, 0xff]), "00ab7fff");
    }

    #[test]
    fn decode_inverts_encode() {
        let all: Vec<u8> = (0..=255u8).collect();
        assert_eq!(hex_to_bytes(&bytes_to_hex(&all)).unwrap(), all);
    }

    #[test]
    fn decode_accepts_uppercase() {
        assert_eq!(hex_to_bytes("ABcd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn odd_length_is_rejected() {
        let err = hex_to_bytes("abc").unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidEncoding {
                source: hex::FromHexError::OddLength,
                ..
            }
        ));
    }

    #[test]
    fn non_hex_is_rejected() {
        let err = hex_to_bytes("zz").unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidEncoding {
                source: hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 },
                ..
            }
        ));
        assert!(err.to_string().starts_with("invalid hex string"));
    }
}
