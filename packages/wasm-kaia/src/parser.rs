//! Transaction parsing for Kaia
//!
//! Decodes raw `type || [fields..., signatures...]` bytes back into a
//! [`TxDescriptor`], and summarizes them for JS callers.

use crate::address::format_address;
use crate::codec::{decode_optional_address, take_list};
use crate::error::WasmKaiaError;
use crate::signature::{SignatureData, SignatureSet};
use crate::transaction::{CommonFields, TxDescriptor, TxPayload};
use crate::types::{ChainId, CodeFormat, Delegation, FeeDelegation, FeeRatio, TxKind, TxType};
use alloy_primitives::{keccak256, Address, Bytes, U256};
use alloy_rlp::Decodable;
use serde::Serialize;
use tracing::debug;

/// Parsed transaction data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    /// Transaction hash, if signed
    pub id: Option<String>,
    /// Hash without the fee payer part, if signed
    pub sender_tx_hash: Option<String>,
    /// Type name, e.g. "FeeDelegatedValueTransfer"
    #[serde(rename = "type")]
    pub tx_type: String,
    pub type_tag: u8,
    pub chain_id: ChainId,
    pub nonce: String, // String for BigInt compatibility
    pub gas_price: String,
    pub gas: String,
    pub from: String,
    pub to: Option<String>,
    pub value: String,
    /// Input, memo or anchored data as hex
    pub input: Option<String>,
    pub human_readable: Option<bool>,
    pub code_format: Option<CodeFormat>,
    pub fee_ratio: Option<u8>,
    pub fee_payer: Option<String>,
    pub signatures: Vec<ParsedSignature>,
    pub fee_payer_signatures: Vec<ParsedSignature>,
    /// Addresses recovered from the sender signatures
    pub signers: Vec<String>,
    /// Addresses recovered from the fee payer signatures
    pub fee_payers: Vec<String>,
    pub is_signed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSignature {
    pub v: u64,
    pub r: String,
    pub s: String,
}

impl From<&SignatureData> for ParsedSignature {
    fn from(signature: &SignatureData) -> Self {
        ParsedSignature {
            v: signature.v,
            r: format!("0x{}", hex::encode(signature.r.to_be_bytes::<32>())),
            s: format!("0x{}", hex::encode(signature.s.to_be_bytes::<32>())),
        }
    }
}

/// Decode a raw transaction into a descriptor.
///
/// Signature sets keep wire order. Without an explicit `chain_id` it is
/// inferred from the first signature's `v`, falling back to 0 when the
/// transaction carries no signatures.
pub fn parse_raw(bytes: &[u8], chain_id: Option<ChainId>) -> Result<TxDescriptor, WasmKaiaError> {
    let (&tag, rest) = bytes
        .split_first()
        .ok_or_else(|| WasmKaiaError::Decode("empty transaction".to_string()))?;
    let tx_type = TxType::from_byte(tag)
        .ok_or_else(|| WasmKaiaError::Decode(format!("unknown transaction type 0x{:02x}", tag)))?;

    let mut buf = rest;
    let mut body = take_list(&mut buf)?;
    if !buf.is_empty() {
        return Err(WasmKaiaError::Decode(format!(
            "{} trailing bytes after transaction",
            buf.len()
        )));
    }

    let (fields, payload, fee_delegation) = decode_fields(tx_type, &mut body)?;
    let sender_signatures = SignatureSet::decode_list(&mut body)?;

    let (fee_payer, fee_payer_signatures) = if tx_type.delegation.is_delegated() {
        let fee_payer = decode_optional_address(&mut body)?;
        (fee_payer, SignatureSet::decode_list(&mut body)?)
    } else {
        (None, SignatureSet::new())
    };

    if !body.is_empty() {
        return Err(WasmKaiaError::Decode(format!(
            "unexpected elements after the fields of {}",
            tx_type.name()
        )));
    }

    let chain_id = chain_id
        .or_else(|| {
            sender_signatures
                .first()
                .or_else(|| fee_payer_signatures.first())
                .and_then(SignatureData::implied_chain_id)
        })
        .unwrap_or(0);

    let mut descriptor = TxDescriptor::new(chain_id, fields, payload, fee_delegation)?;
    descriptor.add_sender_signatures(sender_signatures.iter().copied());

    match fee_payer {
        Some(fee_payer) => {
            descriptor
                .add_fee_payer_signatures(fee_payer, fee_payer_signatures.iter().copied())?;
        }
        None if !fee_payer_signatures.is_empty() => {
            return Err(WasmKaiaError::Decode(
                "fee payer signatures without a fee payer".to_string(),
            ));
        }
        None => {}
    }

    debug!(
        tx_type = %tx_type.name(),
        chain_id,
        senders = descriptor.sender_signatures().len(),
        fee_payers = descriptor.fee_payer_signatures().len(),
        "parsed transaction"
    );
    Ok(descriptor)
}

/// Decode the unsigned fields of `tx_type`, leaving the signatures in `body`
fn decode_fields(
    tx_type: TxType,
    body: &mut &[u8],
) -> Result<(CommonFields, TxPayload, FeeDelegation), WasmKaiaError> {
    let nonce = U256::decode(body)?;
    let gas_price = U256::decode(body)?;
    let gas_limit = U256::decode(body)?;

    let (to, value, from) = if tx_type.kind.has_value() {
        let to = decode_optional_address(body)?;
        let value = U256::decode(body)?;
        (to, value, Address::decode(body)?)
    } else {
        (None, U256::ZERO, Address::decode(body)?)
    };

    let mut fee_ratio = None;
    let payload = match tx_type.kind {
        TxKind::ValueTransfer => TxPayload::ValueTransfer,
        TxKind::ValueTransferMemo => TxPayload::ValueTransferMemo {
            memo: Bytes::decode(body)?,
        },
        TxKind::SmartContractExecution => TxPayload::SmartContractExecution {
            input: Bytes::decode(body)?,
        },
        TxKind::SmartContractDeploy => {
            let input = Bytes::decode(body)?;
            let human_readable = bool::decode(body)?;
            if tx_type.delegation == Delegation::WithRatio {
                fee_ratio = Some(u8::decode(body)?);
            }
            TxPayload::SmartContractDeploy {
                input,
                human_readable,
                code_format: CodeFormat::from_u8(u8::decode(body)?)?,
            }
        }
        TxKind::Cancel => TxPayload::Cancel,
        TxKind::ChainDataAnchoring => TxPayload::ChainDataAnchoring {
            anchored_data: Bytes::decode(body)?,
        },
    };

    // the ratio trails the shape's own fields, except for deploys
    let fee_delegation = match tx_type.delegation {
        Delegation::None => FeeDelegation::None,
        Delegation::Full => FeeDelegation::Full,
        Delegation::WithRatio => {
            let ratio = match fee_ratio {
                Some(ratio) => ratio,
                None => u8::decode(body)?,
            };
            FeeDelegation::WithRatio(FeeRatio::new(ratio)?)
        }
    };

    let fields = CommonFields {
        nonce,
        gas_price,
        gas_limit,
        from,
        to,
        value,
    };
    Ok((fields, payload, fee_delegation))
}

/// Parse a raw transaction into a serializable summary
///
/// # Arguments
/// * `bytes` - Raw transaction bytes
/// * `chain_id` - Chain id, inferred from the signatures when absent
pub fn parse_transaction(
    bytes: &[u8],
    chain_id: Option<ChainId>,
) -> Result<ParsedTransaction, WasmKaiaError> {
    let tx = parse_raw(bytes, chain_id)?;
    let tx_type = tx.tx_type();
    let is_signed = !tx.sender_signatures().is_empty();

    let (id, sender_tx_hash) = if is_signed {
        let sender_hash = if tx_type.delegation.is_delegated() {
            keccak256(tx.encode_signed(false))
        } else {
            keccak256(bytes)
        };
        (
            Some(keccak256(bytes).to_string()),
            Some(sender_hash.to_string()),
        )
    } else {
        (None, None)
    };

    let (human_readable, code_format) = match tx.payload() {
        TxPayload::SmartContractDeploy {
            human_readable,
            code_format,
            ..
        } => (Some(*human_readable), Some(*code_format)),
        _ => (None, None),
    };

    let signers = tx.recover_signers()?;
    let fee_payers = tx.recover_fee_payers()?;

    Ok(ParsedTransaction {
        id,
        sender_tx_hash,
        tx_type: tx_type.name(),
        type_tag: tx_type.as_byte(),
        chain_id: tx.chain_id(),
        nonce: tx.nonce().to_string(),
        gas_price: tx.gas_price().to_string(),
        gas: tx.gas_limit().to_string(),
        from: format_address(&tx.from()),
        to: tx.to().as_ref().map(format_address),
        value: tx.value().to_string(),
        input: tx
            .payload()
            .data()
            .map(|data| format!("0x{}", hex::encode(data))),
        human_readable,
        code_format,
        fee_ratio: tx.fee_ratio().map(FeeRatio::get),
        fee_payer: tx.fee_payer().as_ref().map(format_address),
        signatures: tx.sender_signatures().iter().map(Into::into).collect(),
        fee_payer_signatures: tx.fee_payer_signatures().iter().map(Into::into).collect(),
        signers: signers.iter().map(format_address).collect(),
        fee_payers: fee_payers.iter().map(format_address).collect(),
        is_signed,
    })
}
