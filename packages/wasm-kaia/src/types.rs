//! Shared types for Kaia transactions

use crate::error::WasmKaiaError;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Chain identifier used for replay protection (0 = legacy, unprotected)
pub type ChainId = u64;

/// Transaction shape, independent of who pays the fee
///
/// Kaia's access-list type is not listed: it has a two-byte tag and is
/// signed like an Ethereum envelope, not with the payloads built here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxKind {
    ValueTransfer,
    ValueTransferMemo,
    SmartContractDeploy,
    SmartContractExecution,
    Cancel,
    ChainDataAnchoring,
}

impl TxKind {
    /// Tag of the sender-pays variant; delegated variants follow it
    pub fn base_tag(self) -> u8 {
        match self {
            TxKind::ValueTransfer => 0x08,
            TxKind::ValueTransferMemo => 0x10,
            TxKind::SmartContractDeploy => 0x28,
            TxKind::SmartContractExecution => 0x30,
            TxKind::Cancel => 0x38,
            TxKind::ChainDataAnchoring => 0x48,
        }
    }

    fn from_base_tag(tag: u8) -> Option<Self> {
        match tag {
            0x08 => Some(TxKind::ValueTransfer),
            0x10 => Some(TxKind::ValueTransferMemo),
            0x28 => Some(TxKind::SmartContractDeploy),
            0x30 => Some(TxKind::SmartContractExecution),
            0x38 => Some(TxKind::Cancel),
            0x48 => Some(TxKind::ChainDataAnchoring),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TxKind::ValueTransfer => "ValueTransfer",
            TxKind::ValueTransferMemo => "ValueTransferMemo",
            TxKind::SmartContractDeploy => "SmartContractDeploy",
            TxKind::SmartContractExecution => "SmartContractExecution",
            TxKind::Cancel => "Cancel",
            TxKind::ChainDataAnchoring => "ChainDataAnchoring",
        }
    }

    /// Whether this shape carries a recipient
    pub fn has_recipient(self) -> bool {
        matches!(
            self,
            TxKind::ValueTransfer | TxKind::ValueTransferMemo | TxKind::SmartContractExecution
        )
    }

    /// Whether this shape encodes a value field
    pub fn has_value(self) -> bool {
        !matches!(self, TxKind::Cancel | TxKind::ChainDataAnchoring)
    }
}

/// Who pays the transaction fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delegation {
    /// Sender pays
    None,
    /// Fee payer pays everything
    Full,
    /// Fee payer pays a percentage (fee ratio)
    WithRatio,
}

impl Delegation {
    fn tag_offset(self) -> u8 {
        match self {
            Delegation::None => 0,
            Delegation::Full => 1,
            Delegation::WithRatio => 2,
        }
    }

    pub fn is_delegated(self) -> bool {
        !matches!(self, Delegation::None)
    }
}

/// One-byte Kaia transaction type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxType {
    pub kind: TxKind,
    pub delegation: Delegation,
}

impl TxType {
    pub fn new(kind: TxKind, delegation: Delegation) -> Self {
        TxType { kind, delegation }
    }

    /// Parse a type tag byte
    pub fn from_byte(tag: u8) -> Option<Self> {
        let delegation = match tag & 0x07 {
            0 => Delegation::None,
            1 => Delegation::Full,
            2 => Delegation::WithRatio,
            _ => return None,
        };
        TxKind::from_base_tag(tag & !0x07).map(|kind| TxType { kind, delegation })
    }

    pub fn as_byte(self) -> u8 {
        self.kind.base_tag() + self.delegation.tag_offset()
    }

    /// Human-readable name, e.g. "FeeDelegatedValueTransferWithRatio"
    pub fn name(self) -> String {
        match self.delegation {
            Delegation::None => self.kind.name().to_string(),
            Delegation::Full => format!("FeeDelegated{}", self.kind.name()),
            Delegation::WithRatio => format!("FeeDelegated{}WithRatio", self.kind.name()),
        }
    }

    pub fn signer_policy(self) -> SignerPolicy {
        if self.delegation.is_delegated() {
            SignerPolicy::RequireSender
        } else {
            SignerPolicy::AllowUnsigned
        }
    }
}

/// Whether a transaction type may be assembled without sender signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerPolicy {
    /// Assembly of an empty signature set yields an unsigned raw transaction
    AllowUnsigned,
    /// Assembly fails until at least one sender signature is present
    RequireSender,
}

/// Percentage of the fee paid by the fee payer (1..=99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FeeRatio(u8);

impl FeeRatio {
    pub fn new(ratio: u8) -> Result<Self, WasmKaiaError> {
        if (1..=99).contains(&ratio) {
            Ok(FeeRatio(ratio))
        } else {
            Err(WasmKaiaError::InvalidField(format!(
                "fee ratio must be between 1 and 99, got {}",
                ratio
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Fee delegation settings of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeDelegation {
    None,
    Full,
    WithRatio(FeeRatio),
}

impl FeeDelegation {
    pub fn delegation(self) -> Delegation {
        match self {
            FeeDelegation::None => Delegation::None,
            FeeDelegation::Full => Delegation::Full,
            FeeDelegation::WithRatio(_) => Delegation::WithRatio,
        }
    }

    pub fn fee_ratio(self) -> Option<FeeRatio> {
        match self {
            FeeDelegation::WithRatio(ratio) => Some(ratio),
            _ => None,
        }
    }
}

/// Contract code format for deploy transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeFormat {
    #[default]
    Evm,
}

impl CodeFormat {
    pub fn as_u8(self) -> u8 {
        match self {
            CodeFormat::Evm => 0,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, WasmKaiaError> {
        match value {
            0 => Ok(CodeFormat::Evm),
            other => Err(WasmKaiaError::InvalidField(format!(
                "unsupported code format: {}",
                other
            ))),
        }
    }
}

/// Parse an unsigned 256-bit quantity from a decimal or `0x`-prefixed hex string
pub fn parse_quantity(field: &str, input: &str) -> Result<U256, WasmKaiaError> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(WasmKaiaError::InvalidField(format!(
            "{} must not be negative: {}",
            field, input
        )));
    }

    let (digits, radix) = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex_digits) => (hex_digits, 16),
        None => (trimmed, 10),
    };

    if digits.is_empty() {
        return Err(WasmKaiaError::InvalidField(format!("{} is empty", field)));
    }

    U256::from_str_radix(digits, radix)
        .map_err(|e| WasmKaiaError::InvalidField(format!("{} is not a valid quantity: {}", field, e)))
}
