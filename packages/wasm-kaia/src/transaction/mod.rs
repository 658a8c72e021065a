//! Transaction descriptors
//!
//! A [`TxDescriptor`] holds the common fields every Kaia transaction has, a
//! shape-specific payload, and the signatures collected so far. The unsigned
//! encoding depends only on the type tag and the fields; signatures live in
//! their own sets and never change it.

mod raw;
mod signing;

pub use raw::RawTransaction;

use crate::codec::{encode_list_header, list_length};
use crate::error::WasmKaiaError;
use crate::signature::{SignatureData, SignatureSet};
use crate::types::{ChainId, CodeFormat, FeeDelegation, FeeRatio, TxKind, TxType};
use alloy_primitives::{Address, Bytes, U256};
use alloy_rlp::{BufMut, Encodable, EMPTY_STRING_CODE};

/// Fields shared by every transaction shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonFields {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub from: Address,
    /// Absent for contract deployment, cancel and anchoring
    pub to: Option<Address>,
    pub value: U256,
}

/// Shape-specific part of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPayload {
    ValueTransfer,
    ValueTransferMemo {
        memo: Bytes,
    },
    SmartContractDeploy {
        input: Bytes,
        human_readable: bool,
        code_format: CodeFormat,
    },
    SmartContractExecution {
        input: Bytes,
    },
    Cancel,
    ChainDataAnchoring {
        anchored_data: Bytes,
    },
}

impl TxPayload {
    pub fn kind(&self) -> TxKind {
        match self {
            TxPayload::ValueTransfer => TxKind::ValueTransfer,
            TxPayload::ValueTransferMemo { .. } => TxKind::ValueTransferMemo,
            TxPayload::SmartContractDeploy { .. } => TxKind::SmartContractDeploy,
            TxPayload::SmartContractExecution { .. } => TxKind::SmartContractExecution,
            TxPayload::Cancel => TxKind::Cancel,
            TxPayload::ChainDataAnchoring { .. } => TxKind::ChainDataAnchoring,
        }
    }

    /// The input/memo/anchored data bytes, if the shape has any
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            TxPayload::ValueTransferMemo { memo } => Some(memo),
            TxPayload::SmartContractDeploy { input, .. } => Some(input),
            TxPayload::SmartContractExecution { input } => Some(input),
            TxPayload::ChainDataAnchoring { anchored_data } => Some(anchored_data),
            TxPayload::ValueTransfer | TxPayload::Cancel => None,
        }
    }
}

/// One element of a transaction's field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Quantity(U256),
    Address(Address),
    /// Address that encodes as the empty string when unset
    OptionalAddress(Option<Address>),
    Bytes(&'a [u8]),
    Bool(bool),
    Uint(u8),
}

impl Encodable for Field<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Field::Quantity(value) => value.encode(out),
            Field::Address(address) | Field::OptionalAddress(Some(address)) => address.encode(out),
            Field::OptionalAddress(None) => out.put_u8(EMPTY_STRING_CODE),
            Field::Bytes(bytes) => bytes.encode(out),
            Field::Bool(flag) => flag.encode(out),
            Field::Uint(value) => value.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Field::Quantity(value) => value.length(),
            Field::Address(address) | Field::OptionalAddress(Some(address)) => address.length(),
            Field::OptionalAddress(None) => 1,
            Field::Bytes(bytes) => bytes.length(),
            Field::Bool(flag) => flag.length(),
            Field::Uint(value) => value.length(),
        }
    }
}

/// Encode `[prefix?, fields..., tail...]` as one list
pub(crate) fn encode_fields(
    prefix: Option<u8>,
    fields: &[Field<'_>],
    tail: &[&dyn Encodable],
) -> Vec<u8> {
    let payload_length = prefix.map_or(0, |tag| tag.length())
        + fields.iter().map(Encodable::length).sum::<usize>()
        + tail.iter().map(|item| item.length()).sum::<usize>();

    let mut out = Vec::with_capacity(list_length(payload_length));
    encode_list_header(payload_length, &mut out);
    if let Some(tag) = prefix {
        tag.encode(&mut out);
    }
    for field in fields {
        field.encode(&mut out);
    }
    for item in tail {
        item.encode(&mut out);
    }
    out
}

/// A Kaia transaction and the signatures collected for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxDescriptor {
    chain_id: ChainId,
    fields: CommonFields,
    payload: TxPayload,
    fee_delegation: FeeDelegation,
    fee_payer: Option<Address>,
    sender_signatures: SignatureSet,
    fee_payer_signatures: SignatureSet,
}

impl TxDescriptor {
    /// Create a descriptor, validating that the fields fit the shape
    pub fn new(
        chain_id: ChainId,
        fields: CommonFields,
        payload: TxPayload,
        fee_delegation: FeeDelegation,
    ) -> Result<Self, WasmKaiaError> {
        let kind = payload.kind();

        match (kind.has_recipient(), fields.to) {
            (true, None) => {
                return Err(WasmKaiaError::InvalidField(format!(
                    "{} requires a recipient",
                    kind.name()
                )))
            }
            (false, Some(to)) => {
                return Err(WasmKaiaError::InvalidField(format!(
                    "{} does not take a recipient, got {}",
                    kind.name(),
                    to
                )))
            }
            _ => {}
        }

        if !kind.has_value() && !fields.value.is_zero() {
            return Err(WasmKaiaError::InvalidField(format!(
                "{} does not transfer value, got {}",
                kind.name(),
                fields.value
            )));
        }

        Ok(TxDescriptor {
            chain_id,
            fields,
            payload,
            fee_delegation,
            fee_payer: None,
            sender_signatures: SignatureSet::new(),
            fee_payer_signatures: SignatureSet::new(),
        })
    }

    /// Set the fee payer of a fee-delegated transaction
    pub fn with_fee_payer(mut self, fee_payer: Address) -> Result<Self, WasmKaiaError> {
        self.set_fee_payer(fee_payer)?;
        Ok(self)
    }

    /// Record the fee payer; a different payer than an already recorded one is rejected
    pub(crate) fn set_fee_payer(&mut self, fee_payer: Address) -> Result<(), WasmKaiaError> {
        self.check_fee_payer(fee_payer)?;
        self.fee_payer = Some(fee_payer);
        Ok(())
    }

    pub(crate) fn check_fee_payer(&self, fee_payer: Address) -> Result<(), WasmKaiaError> {
        if !self.fee_delegation.delegation().is_delegated() {
            return Err(WasmKaiaError::InvalidField(format!(
                "{} is not fee-delegated",
                self.tx_type().name()
            )));
        }
        match self.fee_payer {
            Some(existing) if existing != fee_payer => Err(WasmKaiaError::InvalidField(format!(
                "fee payer already set to {}, got {}",
                existing, fee_payer
            ))),
            _ => Ok(()),
        }
    }

    pub fn tx_type(&self) -> TxType {
        TxType::new(self.payload.kind(), self.fee_delegation.delegation())
    }

    /// Ordered fields of this shape, without the type tag
    pub fn field_list(&self) -> Vec<Field<'_>> {
        let common = &self.fields;
        let mut list = vec![
            Field::Quantity(common.nonce),
            Field::Quantity(common.gas_price),
            Field::Quantity(common.gas_limit),
        ];

        match &self.payload {
            TxPayload::ValueTransfer => {
                list.push(Field::OptionalAddress(common.to));
                list.push(Field::Quantity(common.value));
                list.push(Field::Address(common.from));
            }
            TxPayload::ValueTransferMemo { memo: input }
            | TxPayload::SmartContractExecution { input } => {
                list.push(Field::OptionalAddress(common.to));
                list.push(Field::Quantity(common.value));
                list.push(Field::Address(common.from));
                list.push(Field::Bytes(input));
            }
            TxPayload::SmartContractDeploy {
                input,
                human_readable,
                code_format,
            } => {
                list.push(Field::OptionalAddress(common.to));
                list.push(Field::Quantity(common.value));
                list.push(Field::Address(common.from));
                list.push(Field::Bytes(input));
                list.push(Field::Bool(*human_readable));
                // fee ratio sits before the code format for deploys
                if let Some(ratio) = self.fee_delegation.fee_ratio() {
                    list.push(Field::Uint(ratio.get()));
                }
                list.push(Field::Uint(code_format.as_u8()));
                return list;
            }
            TxPayload::Cancel => {
                list.push(Field::Address(common.from));
            }
            TxPayload::ChainDataAnchoring { anchored_data } => {
                list.push(Field::Address(common.from));
                list.push(Field::Bytes(anchored_data));
            }
        }

        if let Some(ratio) = self.fee_delegation.fee_ratio() {
            list.push(Field::Uint(ratio.get()));
        }
        list
    }

    /// Encoding of `[type, fields...]`; the content every signature covers
    pub fn unsigned_payload(&self) -> Vec<u8> {
        encode_fields(Some(self.tx_type().as_byte()), &self.field_list(), &[])
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn nonce(&self) -> U256 {
        self.fields.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.fields.gas_price
    }

    pub fn gas_limit(&self) -> U256 {
        self.fields.gas_limit
    }

    pub fn from(&self) -> Address {
        self.fields.from
    }

    pub fn to(&self) -> Option<Address> {
        self.fields.to
    }

    pub fn value(&self) -> U256 {
        self.fields.value
    }

    pub fn common_fields(&self) -> &CommonFields {
        &self.fields
    }

    pub fn payload(&self) -> &TxPayload {
        &self.payload
    }

    pub fn fee_delegation(&self) -> FeeDelegation {
        self.fee_delegation
    }

    pub fn fee_ratio(&self) -> Option<FeeRatio> {
        self.fee_delegation.fee_ratio()
    }

    pub fn fee_payer(&self) -> Option<Address> {
        self.fee_payer
    }

    pub fn sender_signatures(&self) -> &SignatureSet {
        &self.sender_signatures
    }

    pub fn fee_payer_signatures(&self) -> &SignatureSet {
        &self.fee_payer_signatures
    }

    /// Attach externally produced sender signatures
    pub fn add_sender_signatures<I>(&mut self, signatures: I) -> usize
    where
        I: IntoIterator<Item = SignatureData>,
    {
        self.sender_signatures.add_all(signatures)
    }

    /// Attach externally produced fee payer signatures
    pub fn add_fee_payer_signatures<I>(
        &mut self,
        fee_payer: Address,
        signatures: I,
    ) -> Result<usize, WasmKaiaError>
    where
        I: IntoIterator<Item = SignatureData>,
    {
        self.set_fee_payer(fee_payer)?;
        Ok(self.fee_payer_signatures.add_all(signatures))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::address::parse_address;
    use crate::types::Delegation;
    use rstest::rstest;

    pub(crate) fn transfer_fields() -> CommonFields {
        CommonFields {
            nonce: U256::ZERO,
            gas_price: U256::from(25_000_000_000u64),
            gas_limit: U256::from(90_000u64),
            from: parse_address("0x1cbd3b2770909d4e10f157cabc84c7264073c9ec").unwrap(),
            to: Some(parse_address("0x00f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c7").unwrap()),
            value: U256::ZERO,
        }
    }

    pub(crate) fn value_transfer() -> TxDescriptor {
        TxDescriptor::new(
            1001,
            transfer_fields(),
            TxPayload::ValueTransfer,
            FeeDelegation::None,
        )
        .unwrap()
    }

    #[test]
    fn test_value_transfer_unsigned_payload() {
        let tx = value_transfer();
        assert_eq!(tx.tx_type().as_byte(), 0x08);
        assert_eq!(
            hex::encode(tx.unsigned_payload()),
            "f708808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ec"
        );
    }

    #[test]
    fn test_unsigned_payload_ignores_signatures() {
        let mut tx = value_transfer();
        let before = tx.unsigned_payload();
        tx.add_sender_signatures([SignatureData::new(2037, U256::from(1), U256::from(2))]);
        assert_eq!(tx.unsigned_payload(), before);
        assert_eq!(tx.unsigned_payload(), tx.unsigned_payload());
    }

    #[test]
    fn test_field_list_orders() {
        let tx = value_transfer();
        let fields = tx.field_list();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[3], Field::OptionalAddress(tx.to()));
        assert_eq!(fields[5], Field::Address(tx.from()));

        let mut cancel_fields = transfer_fields();
        cancel_fields.to = None;
        let cancel = TxDescriptor::new(
            1001,
            cancel_fields,
            TxPayload::Cancel,
            FeeDelegation::WithRatio(FeeRatio::new(30).unwrap()),
        )
        .unwrap();
        assert_eq!(
            cancel.field_list(),
            vec![
                Field::Quantity(U256::ZERO),
                Field::Quantity(U256::from(25_000_000_000u64)),
                Field::Quantity(U256::from(90_000u64)),
                Field::Address(cancel.from()),
                Field::Uint(30),
            ]
        );
        assert_eq!(cancel.tx_type().as_byte(), 0x3a);
    }

    #[test]
    fn test_deploy_fee_ratio_precedes_code_format() {
        let mut fields = transfer_fields();
        fields.to = None;
        let deploy = TxDescriptor::new(
            1001,
            fields,
            TxPayload::SmartContractDeploy {
                input: Bytes::from_static(&[0x60, 0x80]),
                human_readable: false,
                code_format: CodeFormat::Evm,
            },
            FeeDelegation::WithRatio(FeeRatio::new(50).unwrap()),
        )
        .unwrap();

        let list = deploy.field_list();
        assert_eq!(list[list.len() - 3], Field::Bool(false));
        assert_eq!(list[list.len() - 2], Field::Uint(50));
        assert_eq!(list[list.len() - 1], Field::Uint(0));
        assert_eq!(list[3], Field::OptionalAddress(None));
    }

    #[rstest]
    #[case(TxPayload::ValueTransfer, None, 0)]
    #[case(TxPayload::SmartContractExecution { input: Bytes::new() }, None, 0)]
    #[case(TxPayload::Cancel, Some(0x11), 0)]
    #[case(TxPayload::Cancel, None, 5)]
    #[case(TxPayload::ChainDataAnchoring { anchored_data: Bytes::new() }, None, 1)]
    fn test_invalid_field_combinations(
        #[case] payload: TxPayload,
        #[case] to: Option<u8>,
        #[case] value: u64,
    ) {
        let mut fields = transfer_fields();
        fields.to = to.map(Address::repeat_byte);
        fields.value = U256::from(value);

        let result = TxDescriptor::new(1001, fields, payload, FeeDelegation::None);
        assert!(matches!(result, Err(WasmKaiaError::InvalidField(_))));
    }

    #[test]
    fn test_fee_payer_only_for_delegated_types() {
        let tx = value_transfer();
        assert!(matches!(
            tx.with_fee_payer(Address::repeat_byte(0x22)),
            Err(WasmKaiaError::InvalidField(_))
        ));

        let delegated = TxDescriptor::new(
            1001,
            transfer_fields(),
            TxPayload::ValueTransfer,
            FeeDelegation::Full,
        )
        .unwrap()
        .with_fee_payer(Address::repeat_byte(0x22))
        .unwrap();
        assert_eq!(delegated.tx_type(), TxType::new(TxKind::ValueTransfer, Delegation::Full));

        let mut delegated = delegated;
        assert!(delegated.set_fee_payer(Address::repeat_byte(0x22)).is_ok());
        assert!(delegated.set_fee_payer(Address::repeat_byte(0x33)).is_err());
    }
}
