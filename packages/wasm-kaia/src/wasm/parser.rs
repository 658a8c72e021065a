//! WASM bindings for transaction parsing
//!
//! ParserNamespace provides static methods for parsing Kaia transactions

use crate::parser::{parse_transaction, ParsedTransaction};
use crate::types::TxType;
use crate::wasm::transaction::decode_hex;
use crate::WasmKaiaError;
use wasm_bindgen::prelude::*;

/// Namespace for parsing operations
#[wasm_bindgen]
pub struct ParserNamespace;

#[wasm_bindgen]
impl ParserNamespace {
    /// Parse a transaction from raw bytes
    ///
    /// # Arguments
    /// * `bytes` - Raw transaction bytes
    /// * `chain_id` - Optional chain id; inferred from the signatures when omitted
    ///
    /// # Returns
    /// Parsed transaction as JSON-compatible JS object
    #[wasm_bindgen(js_name = parseTransaction)]
    pub fn parse_transaction_wasm(bytes: &[u8], chain_id: Option<u64>) -> Result<JsValue, JsValue> {
        let parsed = parse_transaction(bytes, chain_id)?;
        to_js_value(&parsed)
    }

    /// Parse a transaction from hex string
    ///
    /// # Arguments
    /// * `hex` - Hex-encoded transaction bytes (with or without 0x prefix)
    /// * `chain_id` - Optional chain id
    #[wasm_bindgen(js_name = parseTransactionHex)]
    pub fn parse_transaction_hex(hex: &str, chain_id: Option<u64>) -> Result<JsValue, JsValue> {
        let bytes = decode_hex(hex)?;
        let parsed = parse_transaction(&bytes, chain_id)?;
        to_js_value(&parsed)
    }

    /// Get the transaction type name from raw bytes
    ///
    /// Reads only the type tag, without full parsing
    #[wasm_bindgen(js_name = getTransactionType)]
    pub fn get_transaction_type(bytes: &[u8]) -> Result<String, JsValue> {
        let tag = bytes
            .first()
            .ok_or_else(|| WasmKaiaError::Decode("empty transaction".to_string()))?;
        let tx_type = TxType::from_byte(*tag).ok_or_else(|| {
            WasmKaiaError::Decode(format!("unknown transaction type 0x{:02x}", tag))
        })?;
        Ok(tx_type.name())
    }
}

/// Convert ParsedTransaction to JsValue using serde_wasm_bindgen
fn to_js_value(parsed: &ParsedTransaction) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(parsed)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
