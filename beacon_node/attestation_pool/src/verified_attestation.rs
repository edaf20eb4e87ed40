use types::{Attestation, AttestationData, EthSpec, Hash256};

/// An attestation that has passed gossip verification, together with the seed
/// of the committee shuffling under which it was produced.
///
/// The shuffling seed ties an aggregate back to the committee context it was
/// built from. Verification attaches the seed before an attestation reaches
/// the aggregation pool; the pool refuses attestations without one.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedAttestation<E: EthSpec> {
    attestation: Attestation<E>,
    committee_shuffling_seed: Option<Hash256>,
}

impl<E: EthSpec> VerifiedAttestation<E> {
    /// Wrap an attestation whose committee shuffling is known.
    pub fn new(attestation: Attestation<E>, committee_shuffling_seed: Hash256) -> Self {
        Self {
            attestation,
            committee_shuffling_seed: Some(committee_shuffling_seed),
        }
    }

    /// Wrap an attestation before its committee shuffling has been resolved.
    ///
    /// Attestations built this way cannot enter the aggregation pool.
    pub fn from_attestation(attestation: Attestation<E>) -> Self {
        Self {
            attestation,
            committee_shuffling_seed: None,
        }
    }

    pub fn attestation(&self) -> &Attestation<E> {
        &self.attestation
    }

    pub fn into_attestation(self) -> Attestation<E> {
        self.attestation
    }

    pub fn data(&self) -> &AttestationData {
        &self.attestation.data
    }

    pub fn committee_shuffling_seed(&self) -> Option<Hash256> {
        self.committee_shuffling_seed
    }
}
