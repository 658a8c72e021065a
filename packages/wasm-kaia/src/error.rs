//! Error types for wasm-kaia

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Main error type for wasm-kaia operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WasmKaiaError {
    /// Malformed or out-of-range input at construction time
    #[error("Invalid field: {0}")]
    InvalidField(String),
    /// Single-signature accessor used on a set that does not hold exactly one signature
    #[error("Ambiguous signature: expected exactly one signature, found {0}; use the full signature set instead")]
    AmbiguousSignature(usize),
    /// Attempt to merge signatures made over different content
    #[error("Payload mismatch: {0}")]
    PayloadMismatch(String),
    /// Assembly attempted without the signatures the transaction type requires
    #[error("Unsigned transaction: {0}")]
    UnsignedTransaction(String),
    /// Signature failed a canonical-form check
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// Signing primitive failure
    #[error("Signing failed: {0}")]
    Signing(String),
    /// Raw transaction could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<alloy_rlp::Error> for WasmKaiaError {
    fn from(err: alloy_rlp::Error) -> Self {
        WasmKaiaError::Decode(err.to_string())
    }
}

impl From<k256::ecdsa::Error> for WasmKaiaError {
    fn from(err: k256::ecdsa::Error) -> Self {
        WasmKaiaError::Signing(err.to_string())
    }
}

// Converts to JS Error with stack trace
impl From<WasmKaiaError> for JsValue {
    fn from(err: WasmKaiaError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
