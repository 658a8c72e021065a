//! wasm-kaia: WASM module for Kaia transaction operations
//!
//! This crate provides:
//! - Transaction descriptors for the Kaia type registry (value transfer,
//!   memo, contract deploy/execution, cancel, anchoring, fee delegation)
//! - Multi-signature collection, merging and assembly
//! - Raw transaction parsing and signer recovery
//! - Transaction building from intents
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//! - **Core layer** (`src/*.rs`): Pure Rust logic, no WASM dependencies
//! - **WASM layer** (`src/wasm/*.rs`): Thin wrappers with `#[wasm_bindgen]`

pub mod address;
pub mod builder;
mod codec;
pub mod error;
pub mod keypair;
pub mod parser;
pub mod signature;
pub mod transaction;
pub mod types;
pub mod wasm;

// Re-export main types for convenience
pub use address::{format_address, parse_address, validate_address};
pub use builder::build_transaction;
pub use error::WasmKaiaError;
pub use keypair::{recover_address, KeyPair, MessageSigner, RecoverableSignature};
pub use parser::{parse_raw, parse_transaction, ParsedTransaction};
pub use signature::{SignatureData, SignatureSet};
pub use transaction::{CommonFields, RawTransaction, TxDescriptor, TxPayload};
pub use types::{ChainId, CodeFormat, FeeDelegation, FeeRatio, SignerPolicy, TxKind, TxType};
