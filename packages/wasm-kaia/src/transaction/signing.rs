//! Signing, signature merging and assembly of the signed encoding

use super::{encode_fields, Field, RawTransaction, TxDescriptor};
use crate::error::WasmKaiaError;
use crate::keypair::{recover_address, MessageSigner};
use crate::signature::{SignatureData, SignatureSet};
use crate::types::{ChainId, SignerPolicy};
use alloy_primitives::Address;
use alloy_rlp::Encodable;
use tracing::debug;

impl TxDescriptor {
    /// Payload a sender signs: `[unsigned_payload, chain_id, 0, 0]`.
    ///
    /// The unsigned payload is embedded as an opaque byte string, so the
    /// signature covers an encoding nested inside another encoding.
    pub fn signing_payload(&self, chain_id: ChainId) -> Vec<u8> {
        let unsigned = self.unsigned_payload();
        let marker = SignatureData::placeholder(chain_id);
        encode_fields(
            None,
            &[Field::Bytes(&unsigned)],
            &[&marker.v, &marker.r, &marker.s],
        )
    }

    /// Payload a fee payer signs: `[unsigned_payload, fee_payer, chain_id, 0, 0]`
    pub fn fee_payer_signing_payload(&self, fee_payer: Address, chain_id: ChainId) -> Vec<u8> {
        let unsigned = self.unsigned_payload();
        let marker = SignatureData::placeholder(chain_id);
        encode_fields(
            None,
            &[Field::Bytes(&unsigned), Field::Address(fee_payer)],
            &[&marker.v, &marker.r, &marker.s],
        )
    }

    /// Sign as a sender and add the chain-bound signature to the sender set.
    ///
    /// `chain_id` must match the descriptor's chain id. Returns the new
    /// signature, which is also useful on its own in co-signing flows that
    /// ship signatures instead of transactions.
    pub fn sign<S>(&mut self, signer: &S, chain_id: ChainId) -> Result<SignatureData, WasmKaiaError>
    where
        S: MessageSigner + ?Sized,
    {
        self.check_chain_id(chain_id)?;

        let payload = self.signing_payload(chain_id);
        let signature = bind_signature(signer, &payload, chain_id)?;
        let added = self.sender_signatures.add(signature);

        debug!(
            tx_type = %self.tx_type().name(),
            chain_id,
            v = signature.v,
            added,
            signatures = self.sender_signatures.len(),
            "sender signature"
        );
        Ok(signature)
    }

    /// Sign as the fee payer of a fee-delegated transaction
    pub fn sign_as_fee_payer<S>(
        &mut self,
        signer: &S,
        fee_payer: Address,
        chain_id: ChainId,
    ) -> Result<SignatureData, WasmKaiaError>
    where
        S: MessageSigner + ?Sized,
    {
        self.check_chain_id(chain_id)?;
        self.check_fee_payer(fee_payer)?;

        let payload = self.fee_payer_signing_payload(fee_payer, chain_id);
        let signature = bind_signature(signer, &payload, chain_id)?;
        self.fee_payer = Some(fee_payer);
        let added = self.fee_payer_signatures.add(signature);

        debug!(
            tx_type = %self.tx_type().name(),
            %fee_payer,
            chain_id,
            added,
            signatures = self.fee_payer_signatures.len(),
            "fee payer signature"
        );
        Ok(signature)
    }

    /// Copy every signature of `other` into this descriptor.
    ///
    /// Both descriptors must encode the same unsigned payload for the same
    /// chain id, and agree on the fee payer when both have one. Nothing
    /// changes on failure.
    pub fn merge_signatures_from(&mut self, other: &TxDescriptor) -> Result<(), WasmKaiaError> {
        if self.chain_id != other.chain_id {
            return Err(WasmKaiaError::PayloadMismatch(format!(
                "cannot merge signatures for chain id {} into chain id {}",
                other.chain_id, self.chain_id
            )));
        }
        let foreign = other
            .sender_signatures
            .iter()
            .chain(other.fee_payer_signatures.iter())
            .find(|signature| signature.implied_chain_id() != Some(self.chain_id));
        if let Some(signature) = foreign {
            return Err(WasmKaiaError::PayloadMismatch(format!(
                "signature with v = {} is not bound to chain id {}",
                signature.v, self.chain_id
            )));
        }
        if self.unsigned_payload() != other.unsigned_payload() {
            return Err(WasmKaiaError::PayloadMismatch(
                "cannot merge signatures over different unsigned payloads".to_string(),
            ));
        }

        let fee_payer = match (self.fee_payer, other.fee_payer) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                return Err(WasmKaiaError::PayloadMismatch(format!(
                    "fee payers differ: {} and {}",
                    mine, theirs
                )));
            }
            (mine, theirs) => mine.or(theirs),
        };
        self.fee_payer = fee_payer;

        let sender_added = self
            .sender_signatures
            .add_all(other.sender_signatures.iter().copied());
        let fee_payer_added = self
            .fee_payer_signatures
            .add_all(other.fee_payer_signatures.iter().copied());

        debug!(
            sender_added,
            fee_payer_added,
            senders = self.sender_signatures.len(),
            fee_payers = self.fee_payer_signatures.len(),
            "merged signatures"
        );
        Ok(())
    }

    /// Decode a raw transaction and merge its signatures into this one
    ///
    /// The chain id of `raw` is taken from its signatures, so signatures
    /// bound to another chain are rejected.
    pub fn merge_signatures_from_raw(&mut self, raw: &[u8]) -> Result<(), WasmKaiaError> {
        let mut other = crate::parser::parse_raw(raw, None)?;
        if other.sender_signatures.is_empty() && other.fee_payer_signatures.is_empty() {
            other.chain_id = self.chain_id;
        }
        self.merge_signatures_from(&other)
    }

    fn check_chain_id(&self, chain_id: ChainId) -> Result<(), WasmKaiaError> {
        if chain_id != self.chain_id {
            return Err(WasmKaiaError::InvalidField(format!(
                "cannot sign for chain id {}, transaction is for chain id {}",
                chain_id, self.chain_id
            )));
        }
        Ok(())
    }

    /// Assemble the signed encoding `type || [fields..., signatures...]`
    pub fn assemble(&self) -> Result<RawTransaction, WasmKaiaError> {
        let tx_type = self.tx_type();
        if tx_type.signer_policy() == SignerPolicy::RequireSender
            && self.sender_signatures.is_empty()
        {
            return Err(WasmKaiaError::UnsignedTransaction(format!(
                "{} requires at least one sender signature",
                tx_type.name()
            )));
        }

        let raw = self.encode_signed(true);
        debug!(
            tx_type = %tx_type.name(),
            bytes = raw.len(),
            senders = self.sender_signatures.len(),
            fee_payers = self.fee_payer_signatures.len(),
            "assembled transaction"
        );
        Ok(RawTransaction::new(raw, self.clone()))
    }

    /// Signed encoding, optionally without the fee payer part
    pub(crate) fn encode_signed(&self, include_fee_payer: bool) -> Vec<u8> {
        let fields = self.field_list();
        let fee_payer = Field::OptionalAddress(self.fee_payer);

        let mut tail: Vec<&dyn Encodable> = vec![&self.sender_signatures];
        if include_fee_payer && self.tx_type().delegation.is_delegated() {
            tail.push(&fee_payer);
            tail.push(&self.fee_payer_signatures);
        }

        let body = encode_fields(None, &fields, &tail);
        let mut raw = Vec::with_capacity(1 + body.len());
        raw.push(self.tx_type().as_byte());
        raw.extend_from_slice(&body);
        raw
    }

    /// Addresses behind the sender signatures, in set order
    pub fn recover_signers(&self) -> Result<Vec<Address>, WasmKaiaError> {
        let payload = self.signing_payload(self.chain_id);
        recover_all(&self.sender_signatures, &payload, self.chain_id)
    }

    /// Addresses behind the fee payer signatures, in set order
    pub fn recover_fee_payers(&self) -> Result<Vec<Address>, WasmKaiaError> {
        if self.fee_payer_signatures.is_empty() {
            return Ok(Vec::new());
        }
        let fee_payer = self.fee_payer.ok_or_else(|| {
            WasmKaiaError::InvalidField("fee payer address is not set".to_string())
        })?;
        let payload = self.fee_payer_signing_payload(fee_payer, self.chain_id);
        recover_all(&self.fee_payer_signatures, &payload, self.chain_id)
    }
}

/// Run the signing primitive and bind its output to `chain_id`
fn bind_signature<S>(
    signer: &S,
    payload: &[u8],
    chain_id: ChainId,
) -> Result<SignatureData, WasmKaiaError>
where
    S: MessageSigner + ?Sized,
{
    let raw = signer.sign_message(payload)?;
    let signature = SignatureData::from_recoverable(raw, chain_id)?;
    if !signature.is_low_s() {
        return Err(WasmKaiaError::InvalidSignature(
            "s is not in the lower half of the curve order".to_string(),
        ));
    }
    Ok(signature)
}

fn recover_all(
    signatures: &SignatureSet,
    payload: &[u8],
    chain_id: ChainId,
) -> Result<Vec<Address>, WasmKaiaError> {
    signatures
        .iter()
        .map(|signature| {
            let recovery_id = signature.recovery_id(chain_id)?;
            recover_address(payload, recovery_id, signature.r, signature.s)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_address;
    use crate::keypair::{KeyPair, RecoverableSignature};
    use crate::transaction::tests::{transfer_fields, value_transfer};
    use crate::transaction::{CommonFields, TxPayload};
    use crate::types::FeeDelegation;
    use alloy_primitives::{uint, U256};

    const SENDER_KEY: &str = "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8";
    const COSIGNER_KEY: &str = "0xe3d4f7a0b3a1f21fcd13b4f0a2c5e7d9a3b6c1d2e4f50617283940a1b2c3d4e5";

    const UNSIGNED_HEX: &str = "f708808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ec";
    const SIGNED_HEX: &str = "08f87f808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ecf847f8458207f6a05d3aed47061f1ebbfbfc72012c75eb80be175c424ad8236a34ef3fcd483cee67a03a1b5df6716de36b260d641b281346049fdc2110645070acc5baec0bd5e352af";

    const FEE_DELEGATED_SENDER_ONLY_HEX: &str = "09f881808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ecf847f8458207f6a07e94b8e4783a1a6945b974de56424f9b31adc1f38840e788676bbe6246524e1ca041a5ba7e883220b7f5a1ef406a4d199ede8ccf5f9bf2ac1b82454a3df2eb3fe080c0";
    const FEE_DELEGATED_SIGNED_HEX: &str = "09f8dd808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ecf847f8458207f6a07e94b8e4783a1a6945b974de56424f9b31adc1f38840e788676bbe6246524e1ca041a5ba7e883220b7f5a1ef406a4d199ede8ccf5f9bf2ac1b82454a3df2eb3fe09422b96a8b7ddfa2912d4c6b608b3198dd1076808cf847f8458207f6a0a4083c86760a3da735b34f5b36271820554b617356dcf34fede63a05d683b5baa008ecdb07267da74afa84d93c7fdae1d78d0925e19eb80e1ee29575e7bb9b685f";
    const FEE_DELEGATED_TX_HASH: &str =
        "0x74e689e0c67512911e877dc8406bd00e664bab1f0879fac8363df8a1507b1d98";
    const FEE_DELEGATED_SENDER_TX_HASH: &str =
        "0x96791aaa5e69b918c30d4645d0a49a23822f9170a49b57452f694f7d882e259e";

    fn sender_signature() -> SignatureData {
        SignatureData::new(
            2038,
            uint!(0x5d3aed47061f1ebbfbfc72012c75eb80be175c424ad8236a34ef3fcd483cee67_U256),
            uint!(0x3a1b5df6716de36b260d641b281346049fdc2110645070acc5baec0bd5e352af_U256),
        )
    }

    fn cosigner_signature() -> SignatureData {
        SignatureData::new(
            2038,
            uint!(0x10aebb87615f516ca5a8c9ef39fd58a7a9be0946fb7fe96ec37009aa3eb1c5bd_U256),
            uint!(0x1d1759adc17fd05016bf0009c08cea31c3348e2b0c71c412aafb37711cb9c64b_U256),
        )
    }

    /// Signer that returns a fixed, non-canonical signature
    struct HighSSigner;

    impl MessageSigner for HighSSigner {
        fn sign_message(&self, _message: &[u8]) -> Result<RecoverableSignature, WasmKaiaError> {
            Ok(RecoverableSignature {
                recovery_id: 0,
                r: U256::from(1),
                s: U256::MAX,
            })
        }

        fn address(&self) -> Address {
            Address::ZERO
        }
    }

    #[test]
    fn test_signing_payload_wraps_unsigned_payload() {
        let tx = value_transfer();
        assert_eq!(hex::encode(tx.unsigned_payload()), UNSIGNED_HEX);
        assert_eq!(
            hex::encode(tx.signing_payload(1001)),
            format!("f83fb838{}8203e98080", UNSIGNED_HEX)
        );
    }

    #[test]
    fn test_sign_and_assemble_fixed_vector() {
        let mut tx = value_transfer();
        let keypair = KeyPair::from_hex(SENDER_KEY).unwrap();

        let signature = tx.sign(&keypair, 1001).unwrap();
        assert_eq!(signature, sender_signature());
        assert_eq!(tx.sender_signatures().single().unwrap(), &signature);

        let raw = tx.assemble().unwrap();
        assert_eq!(raw.bytes()[0], 0x08);
        assert_eq!(hex::encode(raw.bytes()), SIGNED_HEX);
        assert_eq!(raw.signature(), Some(&signature));
        assert_eq!(
            raw.transaction_hash().to_string(),
            "0x2175ca4e6fd5a0c905ace9e0106e668d1db2976b916873ea7cf7788e18531eca"
        );
    }

    #[test]
    fn test_resign_is_idempotent() {
        let mut tx = value_transfer();
        let keypair = KeyPair::from_hex(SENDER_KEY).unwrap();

        let first = tx.sign(&keypair, 1001).unwrap();
        let second = tx.sign(&keypair, 1001).unwrap();
        assert_eq!(first, second);
        assert_eq!(tx.sender_signatures().len(), 1);
    }

    #[test]
    fn test_legacy_chain_id_zero() {
        let mut tx = TxDescriptor::new(
            0,
            transfer_fields(),
            TxPayload::ValueTransfer,
            FeeDelegation::None,
        )
        .unwrap();
        let keypair = KeyPair::from_hex(SENDER_KEY).unwrap();

        let signature = tx.sign(&keypair, 0).unwrap();
        assert_eq!(
            signature,
            SignatureData::new(
                27,
                uint!(0x99403cd269c2a991befe48f283f3b89fdb21529234596721e20b9c7467da8cb8_U256),
                uint!(0x113e03ff552b1c3d93f537684d0bb446dc3a6250e0401c3ae43e4ab485ecab87_U256),
            )
        );
    }

    #[test]
    fn test_two_signers_merge() {
        let mut first = value_transfer();
        let mut second = value_transfer();
        first
            .sign(&KeyPair::from_hex(SENDER_KEY).unwrap(), 1001)
            .unwrap();
        second
            .sign(&KeyPair::from_hex(COSIGNER_KEY).unwrap(), 1001)
            .unwrap();

        first.merge_signatures_from(&second).unwrap();
        assert_eq!(
            first.sender_signatures().all(),
            &[sender_signature(), cosigner_signature()]
        );
        // The source side is untouched
        assert_eq!(second.sender_signatures().all(), &[cosigner_signature()]);

        // Merging again changes nothing
        first.merge_signatures_from(&second).unwrap();
        assert_eq!(first.sender_signatures().len(), 2);

        assert!(matches!(
            first.sender_signatures().single(),
            Err(WasmKaiaError::AmbiguousSignature(2))
        ));

        let raw = first.assemble().unwrap();
        assert_eq!(
            hex::encode(raw.bytes()),
            "08f8c6808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ecf88ef8458207f6a05d3aed47061f1ebbfbfc72012c75eb80be175c424ad8236a34ef3fcd483cee67a03a1b5df6716de36b260d641b281346049fdc2110645070acc5baec0bd5e352aff8458207f6a010aebb87615f516ca5a8c9ef39fd58a7a9be0946fb7fe96ec37009aa3eb1c5bda01d1759adc17fd05016bf0009c08cea31c3348e2b0c71c412aafb37711cb9c64b"
        );
        assert_eq!(raw.signature(), Some(&sender_signature()));

        let signers = first.recover_signers().unwrap();
        assert_eq!(
            signers,
            vec![
                parse_address("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b").unwrap(),
                parse_address("0x22b96a8b7ddfa2912d4c6b608b3198dd1076808c").unwrap(),
            ]
        );
    }

    #[test]
    fn test_merge_rejects_different_payloads() {
        let mut tx = value_transfer();
        tx.sign(&KeyPair::from_hex(SENDER_KEY).unwrap(), 1001)
            .unwrap();

        let mut other_fields = transfer_fields();
        other_fields.nonce = U256::from(1);
        let mut other = TxDescriptor::new(
            1001,
            other_fields,
            TxPayload::ValueTransfer,
            FeeDelegation::None,
        )
        .unwrap();
        other
            .sign(&KeyPair::from_hex(COSIGNER_KEY).unwrap(), 1001)
            .unwrap();

        let result = tx.merge_signatures_from(&other);
        assert!(matches!(result, Err(WasmKaiaError::PayloadMismatch(_))));
        assert_eq!(tx.sender_signatures().all(), &[sender_signature()]);
    }

    fn transfer_on_chain(chain_id: u64) -> TxDescriptor {
        TxDescriptor::new(
            chain_id,
            transfer_fields(),
            TxPayload::ValueTransfer,
            FeeDelegation::None,
        )
        .unwrap()
    }

    #[test]
    fn test_sign_rejects_other_chain_id() {
        let mut tx = value_transfer();
        let result = tx.sign(&KeyPair::from_hex(SENDER_KEY).unwrap(), 8217);
        assert!(matches!(result, Err(WasmKaiaError::InvalidField(_))));
        assert!(tx.sender_signatures().is_empty());
    }

    #[test]
    fn test_merge_rejects_other_chain_id() {
        // Same unsigned payload, signatures bound to mainnet
        let mut mainnet = transfer_on_chain(8217);
        mainnet
            .sign(&KeyPair::from_hex(COSIGNER_KEY).unwrap(), 8217)
            .unwrap();

        let mut tx = value_transfer();
        tx.sign(&KeyPair::from_hex(SENDER_KEY).unwrap(), 1001)
            .unwrap();
        assert_eq!(tx.unsigned_payload(), mainnet.unsigned_payload());

        let result = tx.merge_signatures_from(&mainnet);
        assert!(matches!(result, Err(WasmKaiaError::PayloadMismatch(_))));
        assert_eq!(tx.sender_signatures().all(), &[sender_signature()]);

        let raw = mainnet.assemble().unwrap();
        let result = tx.merge_signatures_from_raw(raw.bytes());
        assert!(matches!(result, Err(WasmKaiaError::PayloadMismatch(_))));
        assert_eq!(tx.sender_signatures().all(), &[sender_signature()]);
        tx.recover_signers().unwrap();
    }

    #[test]
    fn test_merge_rejects_signature_bound_to_other_chain() {
        let mut other = value_transfer();
        other.add_sender_signatures([SignatureData::new(16469, U256::from(1), U256::from(2))]);

        let mut tx = value_transfer();
        let result = tx.merge_signatures_from(&other);
        assert!(matches!(result, Err(WasmKaiaError::PayloadMismatch(_))));
        assert!(tx.sender_signatures().is_empty());
    }

    #[test]
    fn test_merge_from_raw() {
        let mut cosigned = value_transfer();
        cosigned
            .sign(&KeyPair::from_hex(COSIGNER_KEY).unwrap(), 1001)
            .unwrap();
        let raw = cosigned.assemble().unwrap();

        let mut tx = value_transfer();
        tx.sign(&KeyPair::from_hex(SENDER_KEY).unwrap(), 1001)
            .unwrap();
        tx.merge_signatures_from_raw(raw.bytes()).unwrap();
        assert_eq!(
            tx.sender_signatures().all(),
            &[sender_signature(), cosigner_signature()]
        );

        // An unsigned raw carries no chain id and merges nothing
        let unsigned = value_transfer().assemble().unwrap();
        tx.merge_signatures_from_raw(unsigned.bytes()).unwrap();
        assert_eq!(tx.sender_signatures().len(), 2);
    }

    #[test]
    fn test_assemble_unsigned_value_transfer() {
        let raw = value_transfer().assemble().unwrap();
        assert_eq!(
            hex::encode(raw.bytes()),
            "08f7808505d21dba0083015f909400f5ab9b7d5d0bd0a3e5c3ae8d4a8fbd1c1632c780941cbd3b2770909d4e10f157cabc84c7264073c9ecc0"
        );
        assert_eq!(raw.signature(), None);
    }

    #[test]
    fn test_high_s_signature_is_rejected() {
        let mut tx = value_transfer();
        let result = tx.sign(&HighSSigner, 1001);
        assert!(matches!(result, Err(WasmKaiaError::InvalidSignature(_))));
        assert!(tx.sender_signatures().is_empty());
    }

    fn fee_delegated_transfer() -> TxDescriptor {
        TxDescriptor::new(
            1001,
            transfer_fields(),
            TxPayload::ValueTransfer,
            FeeDelegation::Full,
        )
        .unwrap()
    }

    #[test]
    fn test_fee_delegated_requires_sender_signature() {
        let tx = fee_delegated_transfer();
        assert!(matches!(
            tx.assemble(),
            Err(WasmKaiaError::UnsignedTransaction(_))
        ));
    }

    #[test]
    fn test_fee_delegated_signing_flow() {
        let sender = KeyPair::from_hex(SENDER_KEY).unwrap();
        let fee_payer = KeyPair::from_hex(COSIGNER_KEY).unwrap();

        let mut tx = fee_delegated_transfer();
        tx.sign(&sender, 1001).unwrap();
        let sender_raw = tx.assemble().unwrap();
        assert_eq!(hex::encode(sender_raw.bytes()), FEE_DELEGATED_SENDER_ONLY_HEX);

        // The fee payer receives the sender-signed raw transaction
        let mut received = crate::parser::parse_raw(sender_raw.bytes(), None).unwrap();
        assert_eq!(received.fee_payer(), None);
        received
            .sign_as_fee_payer(&fee_payer, fee_payer.address(), 1001)
            .unwrap();

        let raw = received.assemble().unwrap();
        assert_eq!(hex::encode(raw.bytes()), FEE_DELEGATED_SIGNED_HEX);
        assert_eq!(raw.transaction_hash().to_string(), FEE_DELEGATED_TX_HASH);
        assert_eq!(received.recover_signers().unwrap(), vec![sender.address()]);
        assert_eq!(
            received.recover_fee_payers().unwrap(),
            vec![fee_payer.address()]
        );
        assert_eq!(
            raw.sender_tx_hash().to_string(),
            FEE_DELEGATED_SENDER_TX_HASH
        );
        assert_ne!(raw.sender_tx_hash(), raw.transaction_hash());
    }

    #[test]
    fn test_fee_payer_signing_on_plain_type_fails() {
        let mut tx = value_transfer();
        let fee_payer = KeyPair::from_hex(COSIGNER_KEY).unwrap();
        let result = tx.sign_as_fee_payer(&fee_payer, fee_payer.address(), 1001);
        assert!(matches!(result, Err(WasmKaiaError::InvalidField(_))));
        assert!(tx.fee_payer_signatures().is_empty());
    }

    #[test]
    fn test_merge_rejects_conflicting_fee_payers() {
        let fee_payer = KeyPair::from_hex(COSIGNER_KEY).unwrap();
        let mut mine = fee_delegated_transfer()
            .with_fee_payer(Address::repeat_byte(0x42))
            .unwrap();
        let mut theirs = fee_delegated_transfer();
        theirs
            .sign_as_fee_payer(&fee_payer, fee_payer.address(), 1001)
            .unwrap();

        assert!(matches!(
            mine.merge_signatures_from(&theirs),
            Err(WasmKaiaError::PayloadMismatch(_))
        ));
        assert!(mine.fee_payer_signatures().is_empty());
        assert_eq!(mine.fee_payer(), Some(Address::repeat_byte(0x42)));
    }

    #[test]
    fn test_merge_adopts_fee_payer() {
        let fee_payer = KeyPair::from_hex(COSIGNER_KEY).unwrap();
        let mut mine = fee_delegated_transfer();
        let mut theirs = fee_delegated_transfer();
        theirs
            .sign_as_fee_payer(&fee_payer, fee_payer.address(), 1001)
            .unwrap();

        mine.merge_signatures_from(&theirs).unwrap();
        assert_eq!(mine.fee_payer(), Some(fee_payer.address()));
        assert_eq!(mine.fee_payer_signatures().len(), 1);
    }

    #[test]
    fn test_common_fields_accessors() {
        let tx = value_transfer();
        let CommonFields {
            nonce,
            gas_price,
            gas_limit,
            ..
        } = tx.common_fields().clone();
        assert_eq!(nonce, tx.nonce());
        assert_eq!(gas_price, tx.gas_price());
        assert_eq!(gas_limit, tx.gas_limit());
        assert_eq!(tx.value(), U256::ZERO);
        assert_eq!(tx.chain_id(), 1001);
    }
}
