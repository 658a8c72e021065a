//! Kaia account address parsing and derivation
//!
//! Addresses are 20-byte values shown as `0x`-prefixed hex. Mixed-case input
//! is treated as an EIP-55 checksummed address and must pass the checksum.

use crate::error::WasmKaiaError;
use alloy_primitives::{keccak256, Address};
use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

/// Parse a hex address, with or without `0x` prefix
pub fn parse_address(address: &str) -> Result<Address, WasmKaiaError> {
    let hex_str = address.strip_prefix("0x").unwrap_or(address);

    if hex_str.len() != 40 {
        return Err(WasmKaiaError::InvalidField(format!(
            "Address must be 20 bytes (40 hex chars), got {} chars: {}",
            hex_str.len(),
            address
        )));
    }

    let bytes = hex::decode(hex_str)
        .map_err(|e| WasmKaiaError::InvalidField(format!("Invalid address hex: {}", e)))?;
    let parsed = Address::from_slice(&bytes);

    let has_lower = hex_str.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_str.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = parsed.to_checksum(None);
        if checksummed.trim_start_matches("0x") != hex_str {
            return Err(WasmKaiaError::InvalidField(format!(
                "Invalid address checksum: {}",
                address
            )));
        }
    }

    Ok(parsed)
}

/// Validate an address string
pub fn validate_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

/// Lowercase `0x`-prefixed form, as Kaia nodes report addresses
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Derive the account address of a public key (last 20 bytes of Keccak-256
/// over the uncompressed point without its 0x04 prefix)
pub fn address_from_public_key(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    #[test]
    fn test_parse_lowercase_address() {
        let addr = parse_address("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b").unwrap();
        assert_eq!(
            format_address(&addr),
            "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"
        );

        let unprefixed = parse_address("a94f5374fce5edbc8e2a8697c15331677e6ebf0b").unwrap();
        assert_eq!(addr, unprefixed);
    }

    #[test]
    fn test_parse_checksummed_address() {
        assert!(parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_ok());
        // Same address with one character's case flipped
        assert!(matches!(
            parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"),
            Err(WasmKaiaError::InvalidField(_))
        ));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!validate_address("0x1234"));
        assert!(!validate_address("0xzz4f5374fce5edbc8e2a8697c15331677e6ebf0b"));
        assert!(!validate_address(""));
    }

    #[test]
    fn test_address_from_public_key() {
        let key = hex::decode("45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8")
            .unwrap();
        let signing_key = SigningKey::from_slice(&key).unwrap();
        let address = address_from_public_key(signing_key.verifying_key());
        assert_eq!(
            format_address(&address),
            "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"
        );
    }
}
