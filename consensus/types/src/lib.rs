//! Core consensus types shared across the beacon node.
//!
//! Types here carry SSZ, tree-hash and serde support so they can be used both
//! in-memory and directly within block bodies.

pub mod attestation;
pub mod attestation_data;
pub mod checkpoint;
pub mod eth_spec;
pub mod slot_data;
pub mod slot_epoch;
pub mod test_utils;

pub use crate::attestation::{Attestation, Error as AttestationError};
pub use crate::attestation_data::AttestationData;
pub use crate::checkpoint::Checkpoint;
pub use crate::eth_spec::{EthSpec, MainnetEthSpec, MinimalEthSpec};
pub use crate::slot_data::SlotData;
pub use crate::slot_epoch::{Epoch, Slot};
pub use bls::{AggregateSignature, Keypair, PublicKey, SecretKey, Signature};
pub use ssz_types::{typenum, typenum::Unsigned, BitList, BitVector};

pub type Hash256 = ethereum_types::H256;
pub type CommitteeIndex = u64;
