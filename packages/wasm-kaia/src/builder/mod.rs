//! Transaction building from intents
//!
//! Build Kaia transaction descriptors from high-level intent descriptions

pub mod types;

use crate::address::parse_address;
use crate::error::WasmKaiaError;
use crate::transaction::{CommonFields, TxDescriptor, TxPayload};
use crate::types::{FeeDelegation, FeeRatio};
use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;
use types::{BuildContext, FeeDelegationContext, TransactionIntent};

/// Build a transaction from an intent
///
/// # Arguments
/// * `intent` - High-level description of the transaction
/// * `context` - Sender, nonce, gas, chain id and fee delegation settings
pub fn build_transaction(
    intent: TransactionIntent,
    context: BuildContext,
) -> Result<TxDescriptor, WasmKaiaError> {
    let from = parse_address(&context.from)?;
    let (to, value, payload) = build_payload(intent)?;

    let fields = CommonFields {
        nonce: context.nonce,
        gas_price: context.gas_price,
        gas_limit: context.gas,
        from,
        to,
        value,
    };

    let fee_delegation = match &context.fee_delegation {
        None => FeeDelegation::None,
        Some(FeeDelegationContext {
            fee_ratio: None, ..
        }) => FeeDelegation::Full,
        Some(FeeDelegationContext {
            fee_ratio: Some(ratio),
            ..
        }) => FeeDelegation::WithRatio(FeeRatio::new(*ratio)?),
    };

    let mut tx = TxDescriptor::new(context.chain_id, fields, payload, fee_delegation)?;

    let fee_payer = context
        .fee_delegation
        .as_ref()
        .and_then(|delegation| delegation.fee_payer.as_deref());
    if let Some(fee_payer) = fee_payer {
        tx = tx.with_fee_payer(parse_address(fee_payer)?)?;
    }

    debug!(
        tx_type = %tx.tx_type().name(),
        chain_id = context.chain_id,
        "built transaction"
    );
    Ok(tx)
}

/// Map an intent to its recipient, value and shape payload
fn build_payload(
    intent: TransactionIntent,
) -> Result<(Option<Address>, U256, TxPayload), WasmKaiaError> {
    let built = match intent {
        TransactionIntent::ValueTransfer { to, value } => {
            (Some(parse_address(&to)?), value, TxPayload::ValueTransfer)
        }
        TransactionIntent::ValueTransferMemo { to, value, memo } => (
            Some(parse_address(&to)?),
            value,
            TxPayload::ValueTransferMemo {
                memo: decode_data("memo", &memo)?,
            },
        ),
        TransactionIntent::SmartContractDeploy {
            value,
            input,
            human_readable,
            code_format,
        } => (
            None,
            value,
            TxPayload::SmartContractDeploy {
                input: decode_data("input", &input)?,
                human_readable,
                code_format,
            },
        ),
        TransactionIntent::SmartContractExecution { to, value, input } => (
            Some(parse_address(&to)?),
            value,
            TxPayload::SmartContractExecution {
                input: decode_data("input", &input)?,
            },
        ),
        TransactionIntent::Cancel => (None, U256::ZERO, TxPayload::Cancel),
        TransactionIntent::ChainDataAnchoring { anchored_data } => (
            None,
            U256::ZERO,
            TxPayload::ChainDataAnchoring {
                anchored_data: decode_data("anchoredData", &anchored_data)?,
            },
        ),
    };
    Ok(built)
}

/// Decode a hex byte field (with or without 0x)
fn decode_data(field: &str, data: &str) -> Result<Bytes, WasmKaiaError> {
    let hex_str = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(hex_str)
        .map(Bytes::from)
        .map_err(|e| WasmKaiaError::InvalidField(format!("{} is not valid hex: {}", field, e)))
}
