//! Signature triples and the signature set attached to a transaction

use crate::codec::{list_length, take_list};
use crate::error::WasmKaiaError;
use crate::keypair::RecoverableSignature;
use crate::types::ChainId;
use alloy_primitives::{uint, U256};
use alloy_rlp::{BufMut, Decodable, Encodable};
use std::collections::HashSet;

/// Half of the secp256k1 group order; canonical signatures have `s <= HALF_ORDER`
const SECP256K1_HALF_ORDER: U256 =
    uint!(0x7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0_U256);

/// `v` offset for signatures without replay protection
const LEGACY_V_OFFSET: u64 = 27;
/// `v` offset for chain-bound signatures: `v = recovery_id + 35 + 2 * chain_id`
const CHAIN_BOUND_V_OFFSET: u64 = 35;

/// A (v, r, s) signature triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureData {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl SignatureData {
    pub fn new(v: u64, r: U256, s: U256) -> Self {
        SignatureData { v, r, s }
    }

    /// The `(chain_id, 0, 0)` marker appended to the signing payload
    pub fn placeholder(chain_id: ChainId) -> Self {
        SignatureData {
            v: chain_id,
            r: U256::ZERO,
            s: U256::ZERO,
        }
    }

    /// Bind a raw primitive signature to a chain
    pub fn from_recoverable(
        signature: RecoverableSignature,
        chain_id: ChainId,
    ) -> Result<Self, WasmKaiaError> {
        if signature.recovery_id > 1 {
            return Err(WasmKaiaError::InvalidSignature(format!(
                "recovery id must be 0 or 1, got {}",
                signature.recovery_id
            )));
        }

        let recovery_id = u64::from(signature.recovery_id);
        let v = if chain_id == 0 {
            LEGACY_V_OFFSET + recovery_id
        } else {
            chain_id
                .checked_mul(2)
                .and_then(|doubled| doubled.checked_add(CHAIN_BOUND_V_OFFSET + recovery_id))
                .ok_or_else(|| {
                    WasmKaiaError::InvalidField(format!("chain id {} is too large", chain_id))
                })?
        };

        Ok(SignatureData {
            v,
            r: signature.r,
            s: signature.s,
        })
    }

    /// Recovery id (0 or 1) of this signature when bound to `chain_id`
    pub fn recovery_id(&self, chain_id: ChainId) -> Result<u8, WasmKaiaError> {
        let base = if chain_id == 0 {
            Some(LEGACY_V_OFFSET)
        } else {
            chain_id
                .checked_mul(2)
                .and_then(|doubled| doubled.checked_add(CHAIN_BOUND_V_OFFSET))
        };

        match base.and_then(|base| self.v.checked_sub(base)) {
            Some(recovery_id @ (0 | 1)) => Ok(recovery_id as u8),
            _ => Err(WasmKaiaError::InvalidSignature(format!(
                "v = {} is not bound to chain id {}",
                self.v, chain_id
            ))),
        }
    }

    /// Chain id implied by `v`, if `v` is a chain-bound or legacy value
    pub fn implied_chain_id(&self) -> Option<ChainId> {
        match self.v {
            27 | 28 => Some(0),
            v if v >= CHAIN_BOUND_V_OFFSET => Some((v - CHAIN_BOUND_V_OFFSET) / 2),
            _ => None,
        }
    }

    /// Whether `s` is in the lower half of the curve order
    pub fn is_low_s(&self) -> bool {
        self.s <= SECP256K1_HALF_ORDER
    }

    fn payload_length(&self) -> usize {
        self.v.length() + self.r.length() + self.s.length()
    }
}

impl Encodable for SignatureData {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl Decodable for SignatureData {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let mut body = take_list(buf)?;
        let v = u64::decode(&mut body)?;
        let r = U256::decode(&mut body)?;
        let s = U256::decode(&mut body)?;
        if !body.is_empty() {
            return Err(alloy_rlp::Error::Custom(
                "signature must have exactly three elements",
            ));
        }
        Ok(SignatureData { v, r, s })
    }
}

/// Deduplicated, insertion-ordered collection of signatures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    ordered: Vec<SignatureData>,
    seen: HashSet<SignatureData>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature; returns false if it was already present
    pub fn add(&mut self, signature: SignatureData) -> bool {
        if !self.seen.insert(signature) {
            return false;
        }
        self.ordered.push(signature);
        true
    }

    /// Insert many signatures; returns how many were new
    pub fn add_all<I>(&mut self, signatures: I) -> usize
    where
        I: IntoIterator<Item = SignatureData>,
    {
        signatures
            .into_iter()
            .filter(|signature| self.add(*signature))
            .count()
    }

    /// All signatures in insertion order
    pub fn all(&self) -> &[SignatureData] {
        &self.ordered
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureData> {
        self.ordered.iter()
    }

    /// The only signature in the set.
    ///
    /// Kept for single-signer call sites; fails unless the set holds exactly
    /// one signature.
    pub fn single(&self) -> Result<&SignatureData, WasmKaiaError> {
        match self.ordered.as_slice() {
            [only] => Ok(only),
            other => Err(WasmKaiaError::AmbiguousSignature(other.len())),
        }
    }

    pub fn first(&self) -> Option<&SignatureData> {
        self.ordered.first()
    }

    pub fn contains(&self, signature: &SignatureData) -> bool {
        self.seen.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    fn payload_length(&self) -> usize {
        self.ordered.iter().map(Encodable::length).sum()
    }

    /// Decode a list of signature triples, preserving wire order.
    ///
    /// A repeated triple is an error, since the set could not re-encode it.
    pub(crate) fn decode_list(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let mut body = take_list(buf)?;
        let mut set = SignatureSet::new();
        while !body.is_empty() {
            if !set.add(SignatureData::decode(&mut body)?) {
                return Err(alloy_rlp::Error::Custom("duplicate signature"));
            }
        }
        Ok(set)
    }
}

impl Encodable for SignatureSet {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        for signature in &self.ordered {
            signature.encode(out);
        }
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl<'a> IntoIterator for &'a SignatureSet {
    type Item = &'a SignatureData;
    type IntoIter = std::slice::Iter<'a, SignatureData>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}
