use crate::{Checkpoint, CommitteeIndex, Hash256, Slot, SlotData};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// The data upon which an attestation is based.
///
/// The tree hash root of this container identifies the vote; attestations
/// sharing a root come from the same committee and can be aggregated.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: CommitteeIndex,

    // LMD GHOST vote
    pub beacon_block_root: Hash256,

    // FFG vote
    pub source: Checkpoint,
    pub target: Checkpoint,
}

impl SlotData for AttestationData {
    fn get_slot(&self) -> Slot {
        self.slot
    }
}
