//! WASM bindings for TxDescriptor
//!
//! Thin wrapper around the core descriptor with #[wasm_bindgen]

use crate::address::{format_address, parse_address};
use crate::parser::parse_raw;
use crate::signature::SignatureData;
use crate::transaction::TxDescriptor;
use crate::wasm::keypair::WasmKeyPair;
use crate::wasm::try_into_js_value::TryIntoJsValue;
use crate::WasmKaiaError;
use alloy_primitives::U256;
use wasm_bindgen::prelude::*;

/// WASM-exposed transaction wrapper
#[wasm_bindgen]
pub struct WasmTransaction {
    inner: TxDescriptor,
}

#[wasm_bindgen]
impl WasmTransaction {
    /// Create a transaction from raw bytes
    ///
    /// # Arguments
    /// * `bytes` - Raw transaction bytes (`type || rlp(...)`)
    /// * `chain_id` - Chain id; inferred from the signatures when omitted
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], chain_id: Option<u64>) -> Result<WasmTransaction, JsValue> {
        let inner = parse_raw(bytes, chain_id)?;
        Ok(WasmTransaction { inner })
    }

    /// Create from hex string
    #[wasm_bindgen(js_name = fromHex)]
    pub fn from_hex(hex: &str, chain_id: Option<u64>) -> Result<WasmTransaction, JsValue> {
        let bytes = decode_hex(hex)?;
        let inner = parse_raw(&bytes, chain_id)?;
        Ok(WasmTransaction { inner })
    }

    /// Type name, e.g. "FeeDelegatedValueTransfer"
    #[wasm_bindgen(getter, js_name = txType)]
    pub fn tx_type(&self) -> String {
        self.inner.tx_type().name()
    }

    /// One-byte type tag
    #[wasm_bindgen(getter, js_name = typeTag)]
    pub fn type_tag(&self) -> u8 {
        self.inner.tx_type().as_byte()
    }

    #[wasm_bindgen(getter, js_name = chainId)]
    pub fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    /// Get account nonce as BigInt
    #[wasm_bindgen(getter)]
    pub fn nonce(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.nonce().try_to_js_value()?)
    }

    /// Get gas price (kei) as BigInt
    #[wasm_bindgen(getter, js_name = gasPrice)]
    pub fn gas_price(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.gas_price().try_to_js_value()?)
    }

    /// Get gas limit as BigInt
    #[wasm_bindgen(getter)]
    pub fn gas(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.gas_limit().try_to_js_value()?)
    }

    /// Get transferred value (kei) as BigInt
    #[wasm_bindgen(getter)]
    pub fn value(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.value().try_to_js_value()?)
    }

    #[wasm_bindgen(getter)]
    pub fn from(&self) -> String {
        format_address(&self.inner.from())
    }

    #[wasm_bindgen(getter)]
    pub fn to(&self) -> Option<String> {
        self.inner.to().as_ref().map(format_address)
    }

    #[wasm_bindgen(getter, js_name = feePayer)]
    pub fn fee_payer(&self) -> Option<String> {
        self.inner.fee_payer().as_ref().map(format_address)
    }

    /// Check if at least one sender signature is present
    #[wasm_bindgen(getter, js_name = isSigned)]
    pub fn is_signed(&self) -> bool {
        !self.inner.sender_signatures().is_empty()
    }

    /// Encoding of `[type, fields...]`, the content every signature covers
    #[wasm_bindgen(js_name = unsignedPayload)]
    pub fn unsigned_payload(&self) -> Vec<u8> {
        self.inner.unsigned_payload()
    }

    /// Bytes a sender signs (Keccak-256 then secp256k1) for `chain_id`
    #[wasm_bindgen(js_name = signingPayload)]
    pub fn signing_payload(&self, chain_id: Option<u64>) -> Vec<u8> {
        self.inner
            .signing_payload(chain_id.unwrap_or(self.inner.chain_id()))
    }

    /// Bytes a fee payer signs for `chain_id`
    #[wasm_bindgen(js_name = feePayerSigningPayload)]
    pub fn fee_payer_signing_payload(
        &self,
        fee_payer: &str,
        chain_id: Option<u64>,
    ) -> Result<Vec<u8>, JsValue> {
        let fee_payer = parse_address(fee_payer)?;
        Ok(self
            .inner
            .fee_payer_signing_payload(fee_payer, chain_id.unwrap_or(self.inner.chain_id())))
    }

    /// Sign as a sender; returns the new `{ v, r, s }` signature
    #[wasm_bindgen]
    pub fn sign(&mut self, keypair: &WasmKeyPair, chain_id: Option<u64>) -> Result<JsValue, JsValue> {
        let chain_id = chain_id.unwrap_or(self.inner.chain_id());
        let signature = self.inner.sign(keypair.inner(), chain_id)?;
        Ok(signature.try_to_js_value()?)
    }

    /// Sign as the fee payer, using the key pair's address as fee payer
    #[wasm_bindgen(js_name = signAsFeePayer)]
    pub fn sign_as_fee_payer(
        &mut self,
        keypair: &WasmKeyPair,
        chain_id: Option<u64>,
    ) -> Result<JsValue, JsValue> {
        let chain_id = chain_id.unwrap_or(self.inner.chain_id());
        let fee_payer = crate::keypair::MessageSigner::address(keypair.inner());
        let signature = self
            .inner
            .sign_as_fee_payer(keypair.inner(), fee_payer, chain_id)?;
        Ok(signature.try_to_js_value()?)
    }

    /// Add an externally produced sender signature
    ///
    /// # Arguments
    /// * `v` - Chain-bound recovery value
    /// * `r` - 32-byte big-endian r
    /// * `s` - 32-byte big-endian s
    #[wasm_bindgen(js_name = addSignature)]
    pub fn add_signature(&mut self, v: u64, r: &[u8], s: &[u8]) -> Result<bool, JsValue> {
        let signature = signature_from_parts(v, r, s)?;
        Ok(self.inner.add_sender_signatures([signature]) == 1)
    }

    /// Add an externally produced fee payer signature
    #[wasm_bindgen(js_name = addFeePayerSignature)]
    pub fn add_fee_payer_signature(
        &mut self,
        fee_payer: &str,
        v: u64,
        r: &[u8],
        s: &[u8],
    ) -> Result<bool, JsValue> {
        let fee_payer = parse_address(fee_payer)?;
        let signature = signature_from_parts(v, r, s)?;
        Ok(self.inner.add_fee_payer_signatures(fee_payer, [signature])? == 1)
    }

    /// All sender signatures as `{ v, r, s }` objects, in collection order
    #[wasm_bindgen]
    pub fn signatures(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.sender_signatures().all().try_to_js_value()?)
    }

    /// All fee payer signatures as `{ v, r, s }` objects
    #[wasm_bindgen(js_name = feePayerSignatures)]
    pub fn fee_payer_signatures(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.fee_payer_signatures().all().try_to_js_value()?)
    }

    /// The only sender signature; throws when there are zero or several
    #[wasm_bindgen(js_name = singleSignature)]
    pub fn single_signature(&self) -> Result<JsValue, JsValue> {
        let signature = self.inner.sender_signatures().single()?;
        Ok(signature.try_to_js_value()?)
    }

    /// Merge the signatures of another transaction over the same payload
    #[wasm_bindgen(js_name = mergeSignaturesFrom)]
    pub fn merge_signatures_from(&mut self, other: &WasmTransaction) -> Result<(), JsValue> {
        self.inner
            .merge_signatures_from(&other.inner)
            .map_err(|e| e.into())
    }

    /// Merge the signatures of a raw transaction over the same payload
    #[wasm_bindgen(js_name = mergeSignaturesFromRaw)]
    pub fn merge_signatures_from_raw(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner
            .merge_signatures_from_raw(bytes)
            .map_err(|e| e.into())
    }

    /// Addresses recovered from the sender signatures
    #[wasm_bindgen]
    pub fn signers(&self) -> Result<JsValue, JsValue> {
        Ok(self.inner.recover_signers()?.try_to_js_value()?)
    }

    /// Serialize to signed raw bytes
    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&self) -> Result<Vec<u8>, JsValue> {
        Ok(self.inner.assemble()?.into_bytes())
    }

    /// Serialize to hex string
    #[wasm_bindgen(js_name = toHex)]
    pub fn to_hex(&self) -> Result<String, JsValue> {
        Ok(self.inner.assemble()?.to_hex())
    }

    /// Transaction hash of the assembled transaction
    #[wasm_bindgen]
    pub fn id(&self) -> Result<String, JsValue> {
        Ok(self.inner.assemble()?.transaction_hash().to_string())
    }

    /// Hash without the fee payer part
    #[wasm_bindgen(js_name = senderTxHash)]
    pub fn sender_tx_hash(&self) -> Result<String, JsValue> {
        Ok(self.inner.assemble()?.sender_tx_hash().to_string())
    }
}

/// Decode hex with or without 0x
pub(crate) fn decode_hex(hex: &str) -> Result<Vec<u8>, WasmKaiaError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    hex::decode(hex).map_err(|e| WasmKaiaError::Decode(format!("Invalid hex: {}", e)))
}

fn signature_from_parts(v: u64, r: &[u8], s: &[u8]) -> Result<SignatureData, WasmKaiaError> {
    if r.len() != 32 || s.len() != 32 {
        return Err(WasmKaiaError::InvalidSignature(format!(
            "r and s must be 32 bytes each, got {} and {}",
            r.len(),
            s.len()
        )));
    }
    let signature = SignatureData::new(v, U256::from_be_slice(r), U256::from_be_slice(s));
    if !signature.is_low_s() {
        return Err(WasmKaiaError::InvalidSignature(
            "s is not in the lower half of the curve order".to_string(),
        ));
    }
    Ok(signature)
}

// Non-WASM methods for internal use
impl WasmTransaction {
    /// Create from core descriptor (for builder)
    pub fn from_inner(inner: TxDescriptor) -> Self {
        WasmTransaction { inner }
    }

    pub fn inner(&self) -> &TxDescriptor {
        &self.inner
    }
}
