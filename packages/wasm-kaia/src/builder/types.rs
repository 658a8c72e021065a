//! Intent types for transaction building
//!
//! Matches wallet-platform pattern: buildTransaction(intent, context)
//! - intent: what to do (transfer, contract call, cancel, ...) - single operation
//! - context: how to build it (sender, nonce, gas, chain, fee delegation)

use crate::types::{parse_quantity, ChainId, CodeFormat};
use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer};

/// Largest integer a JS number holds exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Deserialize U256 from either a number or a decimal/0x-hex string
fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    struct U256Visitor;

    impl<'de> de::Visitor<'de> for U256Visitor {
        type Value = U256;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer as number or string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<U256, E>
        where
            E: de::Error,
        {
            Ok(U256::from(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<U256, E>
        where
            E: de::Error,
        {
            if value >= 0 {
                Ok(U256::from(value as u64))
            } else {
                Err(E::custom("negative values not allowed"))
            }
        }

        fn visit_f64<E>(self, value: f64) -> Result<U256, E>
        where
            E: de::Error,
        {
            // JS numbers arrive as f64 through serde-wasm-bindgen; larger
            // amounts must be passed as strings
            if value.fract() != 0.0 || value < 0.0 {
                Err(E::custom(format!("not a non-negative integer: {}", value)))
            } else if value > MAX_SAFE_INTEGER {
                Err(E::custom(format!(
                    "{} exceeds Number.MAX_SAFE_INTEGER, pass it as a string",
                    value
                )))
            } else {
                Ok(U256::from(value as u64))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<U256, E>
        where
            E: de::Error,
        {
            parse_quantity("quantity", value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U256Visitor)
}

/// Deserialize a chain id from either a number or a string
fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<ChainId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserialize_u256(deserializer)?;
    ChainId::try_from(value).map_err(|_| de::Error::custom("chain id does not fit in 64 bits"))
}

/// Transaction intent - what to do
///
/// Byte fields (`memo`, `input`, `anchoredData`) are hex strings, with or
/// without `0x`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransactionIntent {
    /// Transfer KAIA to a recipient
    ValueTransfer {
        to: String,
        /// Amount in kei
        #[serde(deserialize_with = "deserialize_u256")]
        value: U256,
    },
    /// Transfer KAIA with an attached memo
    ValueTransferMemo {
        to: String,
        #[serde(deserialize_with = "deserialize_u256")]
        value: U256,
        memo: String,
    },
    /// Deploy a contract
    SmartContractDeploy {
        #[serde(default, deserialize_with = "deserialize_u256")]
        value: U256,
        /// Contract bytecode followed by constructor arguments
        input: String,
        #[serde(default, rename = "humanReadable")]
        human_readable: bool,
        #[serde(default, rename = "codeFormat")]
        code_format: CodeFormat,
    },
    /// Call a contract
    SmartContractExecution {
        to: String,
        #[serde(default, deserialize_with = "deserialize_u256")]
        value: U256,
        input: String,
    },
    /// Replace a pending transaction with the same nonce
    Cancel,
    /// Anchor service chain data
    ChainDataAnchoring {
        #[serde(rename = "anchoredData")]
        anchored_data: String,
    },
}

/// Build context - how to build the transaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildContext {
    /// Sender address (hex)
    pub from: String,
    /// Account nonce
    #[serde(deserialize_with = "deserialize_u256")]
    pub nonce: U256,
    /// Gas price in kei
    #[serde(deserialize_with = "deserialize_u256")]
    pub gas_price: U256,
    /// Gas limit
    #[serde(deserialize_with = "deserialize_u256")]
    pub gas: U256,
    /// Chain id used for signing (1001 = Kairos, 8217 = mainnet)
    #[serde(deserialize_with = "deserialize_chain_id")]
    pub chain_id: ChainId,
    /// Build a fee-delegated variant when present
    #[serde(default)]
    pub fee_delegation: Option<FeeDelegationContext>,
}

/// Fee delegation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDelegationContext {
    /// Percentage paid by the fee payer (1-99); omitted means the fee payer pays all
    #[serde(default)]
    pub fee_ratio: Option<u8>,
    /// Fee payer address, if already known
    #[serde(default)]
    pub fee_payer: Option<String>,
}
