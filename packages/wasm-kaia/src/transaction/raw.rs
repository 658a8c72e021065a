use super::TxDescriptor;
use crate::signature::SignatureData;
use alloy_primitives::{keccak256, B256};

/// Signed, wire-ready encoding of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    raw: Vec<u8>,
    descriptor: TxDescriptor,
    signature: Option<SignatureData>,
}

impl RawTransaction {
    pub(crate) fn new(raw: Vec<u8>, descriptor: TxDescriptor) -> Self {
        let signature = descriptor.sender_signatures().first().copied();
        RawTransaction {
            raw,
            descriptor,
            signature,
        }
    }

    /// `type || [fields..., signatures...]`
    pub fn bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// 0x-prefixed hex of the encoding
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    /// Descriptor this encoding was assembled from
    pub fn descriptor(&self) -> &TxDescriptor {
        &self.descriptor
    }

    /// The first sender signature, if any
    pub fn signature(&self) -> Option<&SignatureData> {
        self.signature.as_ref()
    }

    /// Keccak-256 of the full encoding
    pub fn transaction_hash(&self) -> B256 {
        keccak256(&self.raw)
    }

    /// Keccak-256 of the encoding without the fee payer part.
    ///
    /// Equal to the transaction hash for types without fee delegation.
    pub fn sender_tx_hash(&self) -> B256 {
        if self.descriptor.tx_type().delegation.is_delegated() {
            keccak256(self.descriptor.encode_signed(false))
        } else {
            self.transaction_hash()
        }
    }
}

impl AsRef<[u8]> for RawTransaction {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}
