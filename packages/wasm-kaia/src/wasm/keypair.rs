//! WASM bindings for the secp256k1 key pair

use crate::address::format_address;
use crate::keypair::{recover_address, KeyPair, MessageSigner};
use crate::wasm::transaction::decode_hex;
use crate::WasmKaiaError;
use alloy_primitives::U256;
use wasm_bindgen::prelude::*;

/// WASM-exposed signing key
#[wasm_bindgen]
pub struct WasmKeyPair {
    inner: KeyPair,
}

#[wasm_bindgen]
impl WasmKeyPair {
    /// Create from a 32-byte private key
    #[wasm_bindgen(js_name = fromPrivateKey)]
    pub fn from_private_key(private_key: &[u8]) -> Result<WasmKeyPair, JsValue> {
        let inner = KeyPair::from_private_key(private_key)?;
        Ok(WasmKeyPair { inner })
    }

    /// Create from a hex private key (with or without 0x)
    #[wasm_bindgen(js_name = fromHex)]
    pub fn from_hex(private_key: &str) -> Result<WasmKeyPair, JsValue> {
        let inner = KeyPair::from_hex(private_key)?;
        Ok(WasmKeyPair { inner })
    }

    /// Account address (lowercase hex)
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> String {
        format_address(&self.inner.address())
    }

    /// Compressed public key (33 bytes)
    #[wasm_bindgen(getter, js_name = publicKey)]
    pub fn public_key(&self) -> Vec<u8> {
        self.inner.public_key()
    }

    /// Recover the address that signed `message`
    ///
    /// # Arguments
    /// * `message` - The signed bytes (hashed with Keccak-256 before recovery)
    /// * `recovery_id` - 0 or 1
    /// * `r`, `s` - 32-byte big-endian hex strings
    #[wasm_bindgen(js_name = recoverAddress)]
    pub fn recover_address(
        message: &[u8],
        recovery_id: u8,
        r: &str,
        s: &str,
    ) -> Result<String, JsValue> {
        let r = scalar_from_hex(r)?;
        let s = scalar_from_hex(s)?;
        let address = recover_address(message, recovery_id, r, s)?;
        Ok(format_address(&address))
    }
}

fn scalar_from_hex(hex: &str) -> Result<U256, WasmKaiaError> {
    let bytes = decode_hex(hex)?;
    if bytes.len() != 32 {
        return Err(WasmKaiaError::InvalidSignature(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(U256::from_be_slice(&bytes))
}

// Non-WASM methods for internal use
impl WasmKeyPair {
    pub fn inner(&self) -> &KeyPair {
        &self.inner
    }
}
