//! secp256k1 signing primitive
//!
//! Messages are hashed with Keccak-256 and signed with deterministic
//! (RFC 6979) ECDSA. k256 always produces low-s signatures.

use crate::address::address_from_public_key;
use crate::error::WasmKaiaError;
use alloy_primitives::{keccak256, Address, U256};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

/// Raw output of the signing primitive, before chain binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// 0 or 1
    pub recovery_id: u8,
    pub r: U256,
    pub s: U256,
}

/// Anything that can produce a recoverable signature over a message.
///
/// The message is the full signing payload; implementations hash it
/// themselves.
pub trait MessageSigner {
    fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, WasmKaiaError>;

    /// Address the signatures recover to
    fn address(&self) -> Address;
}

/// A private key held in memory
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Create a key pair from a 32-byte private key
    pub fn from_private_key(private_key: &[u8]) -> Result<KeyPair, WasmKaiaError> {
        if private_key.len() != 32 {
            return Err(WasmKaiaError::InvalidField(
                "Private key must be 32 bytes".to_string(),
            ));
        }

        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|e| WasmKaiaError::InvalidField(format!("Invalid private key: {}", e)))?;

        Ok(KeyPair { signing_key })
    }

    /// Create a key pair from a hex private key (with or without 0x)
    pub fn from_hex(private_key: &str) -> Result<KeyPair, WasmKaiaError> {
        let hex_str = private_key.strip_prefix("0x").unwrap_or(private_key);
        let bytes = hex::decode(hex_str)
            .map_err(|e| WasmKaiaError::InvalidField(format!("Invalid private key hex: {}", e)))?;
        Self::from_private_key(&bytes)
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Compressed SEC1 public key (33 bytes)
    pub fn public_key(&self) -> Vec<u8> {
        self.verifying_key().to_sec1_bytes().to_vec()
    }
}

impl MessageSigner for KeyPair {
    fn sign_message(&self, message: &[u8]) -> Result<RecoverableSignature, WasmKaiaError> {
        let digest = keccak256(message);

        let (signature, recovery_id): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash(digest.as_slice())
            .map_err(|e| WasmKaiaError::Signing(e.to_string()))?;

        let bytes = signature.to_bytes();
        Ok(RecoverableSignature {
            recovery_id: recovery_id.to_byte(),
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..]),
        })
    }

    fn address(&self) -> Address {
        address_from_public_key(self.verifying_key())
    }
}

/// Recover the address that produced a signature over `message`
pub fn recover_address(
    message: &[u8],
    recovery_id: u8,
    r: U256,
    s: U256,
) -> Result<Address, WasmKaiaError> {
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&r.to_be_bytes::<32>());
    rs[32..].copy_from_slice(&s.to_be_bytes::<32>());

    let signature = Signature::from_slice(&rs)
        .map_err(|_| WasmKaiaError::InvalidSignature("Invalid signature format".to_string()))?;
    let recid = RecoveryId::from_byte(recovery_id)
        .ok_or_else(|| WasmKaiaError::InvalidSignature("Invalid recovery id".to_string()))?;

    let digest = keccak256(message);
    let recovered = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recid)
        .map_err(|_| {
            WasmKaiaError::InvalidSignature(
                "Failed to recover public key from signature".to_string(),
            )
        })?;

    Ok(address_from_public_key(&recovered))
}
