use serde::{Deserialize, Serialize};
use ssz_types::typenum::{Unsigned, U128, U2048, U32, U8};
use std::fmt::Debug;

/// A compile-time specification of the constants that size consensus
/// containers.
pub trait EthSpec: 'static + Default + Sync + Send + Clone + Debug + PartialEq + Eq {
    type MaxValidatorsPerCommittee: Unsigned + Clone + Sync + Send + Debug + PartialEq + Eq;
    type SlotsPerEpoch: Unsigned + Clone + Sync + Send + Debug + PartialEq + Eq;
    type MaxAttestations: Unsigned + Clone + Sync + Send + Debug + PartialEq + Eq;

    /// Returns the `SLOTS_PER_EPOCH` constant for this specification.
    fn slots_per_epoch() -> u64 {
        Self::SlotsPerEpoch::to_u64()
    }

    /// Returns the `MAX_ATTESTATIONS` constant for this specification.
    fn max_attestations() -> usize {
        Self::MaxAttestations::to_usize()
    }

    /// Returns the `MAX_VALIDATORS_PER_COMMITTEE` constant for this
    /// specification.
    fn max_validators_per_committee() -> usize {
        Self::MaxValidatorsPerCommittee::to_usize()
    }
}

/// Ethereum Foundation mainnet specification.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MainnetEthSpec;

impl EthSpec for MainnetEthSpec {
    type MaxValidatorsPerCommittee = U2048;
    type SlotsPerEpoch = U32;
    type MaxAttestations = U128;
}

/// Ethereum Foundation minimal specification, used for testing.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct MinimalEthSpec;

impl EthSpec for MinimalEthSpec {
    type MaxValidatorsPerCommittee = U2048;
    type SlotsPerEpoch = U8;
    type MaxAttestations = U128;
}
