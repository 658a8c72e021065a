//! WASM bindings for transaction building
//!
//! BuilderNamespace provides the entry point for building Kaia transactions.
//! Follows wallet-platform pattern: buildTransaction(intent, context)

use crate::builder::{
    build_transaction,
    types::{BuildContext, TransactionIntent},
};
use crate::wasm::transaction::WasmTransaction;
use wasm_bindgen::prelude::*;

/// Namespace for building operations
#[wasm_bindgen]
pub struct BuilderNamespace;

#[wasm_bindgen]
impl BuilderNamespace {
    /// Build a transaction from an intent and context
    ///
    /// # Arguments
    /// * `intent` - What to do (JSON object with type field)
    /// * `context` - Build context (from, nonce, gasPrice, gas, chainId, feeDelegation)
    ///
    /// # Returns
    /// WasmTransaction ready for signing
    ///
    /// # Example Intent (value transfer)
    /// ```json
    /// { "type": "valueTransfer", "to": "0x00f5ab9b...", "value": "1000000000000000000" }
    /// ```
    ///
    /// # Example Context
    /// ```json
    /// {
    ///   "from": "0x1cbd3b2770909d4e10f157cabc84c7264073c9ec",
    ///   "nonce": 5,
    ///   "gasPrice": "25000000000",
    ///   "gas": 90000,
    ///   "chainId": 1001,
    ///   "feeDelegation": { "feeRatio": 30 }
    /// }
    /// ```
    ///
    /// # Intent Types
    /// - `valueTransfer`: to, value
    /// - `valueTransferMemo`: to, value, memo (hex)
    /// - `smartContractDeploy`: value, input (hex), humanReadable, codeFormat
    /// - `smartContractExecution`: to, value, input (hex)
    /// - `cancel`
    /// - `chainDataAnchoring`: anchoredData (hex)
    #[wasm_bindgen(js_name = buildTransaction)]
    pub fn build_transaction_wasm(
        intent: JsValue,
        context: JsValue,
    ) -> Result<WasmTransaction, JsValue> {
        // Deserialize intent from JS
        let intent: TransactionIntent = serde_wasm_bindgen::from_value(intent)
            .map_err(|e| JsValue::from_str(&format!("Invalid intent: {}", e)))?;

        // Deserialize context from JS
        let context: BuildContext = serde_wasm_bindgen::from_value(context)
            .map_err(|e| JsValue::from_str(&format!("Invalid context: {}", e)))?;

        // Build the transaction
        let tx = build_transaction(intent, context)?;

        // Wrap in WasmTransaction
        Ok(WasmTransaction::from_inner(tx))
    }
}
