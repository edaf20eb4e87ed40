use crate::{AggregateSignature, AttestationData, BitList, EthSpec, SecretKey, Signature, Slot, SlotData};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// An error from the `ssz_types` crate, i.e. an out-of-bounds bit access.
    SszTypesError(ssz_types::Error),
    /// The specified validator has already signed this attestation.
    AlreadySigned(usize),
}

/// A vote by one or more validators of the same committee on an
/// `AttestationData`, compressed to a participation bitfield and an
/// aggregated signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash)]
#[serde(bound = "E: EthSpec")]
pub struct Attestation<E: EthSpec> {
    pub aggregation_bits: BitList<E::MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: AggregateSignature,
}

impl<E: EthSpec> Attestation<E> {
    /// Produce an attestation over `data` with no participants, sized for a
    /// committee of `committee_len` validators.
    pub fn empty(data: AttestationData, committee_len: usize) -> Result<Self, Error> {
        Ok(Self {
            aggregation_bits: BitList::with_capacity(committee_len)
                .map_err(Error::SszTypesError)?,
            data,
            signature: AggregateSignature::infinity(),
        })
    }

    /// Are the validators that signed `self` disjoint from those that signed
    /// `other`?
    pub fn signers_disjoint_from(&self, other: &Self) -> bool {
        self.aggregation_bits
            .intersection(&other.aggregation_bits)
            .is_zero()
    }

    /// Aggregate another `Attestation` into `self`.
    ///
    /// The aggregation bitfields must be disjoint, and the data must be the
    /// same.
    pub fn aggregate(&mut self, other: &Self) {
        debug_assert_eq!(self.data, other.data);
        debug_assert!(self.signers_disjoint_from(other));

        self.aggregation_bits = self.aggregation_bits.union(&other.aggregation_bits);
        self.signature.add_assign_aggregate(&other.signature);
    }

    /// Signs `self`, setting the `committee_position`'th bit of
    /// `aggregation_bits`.
    ///
    /// The message signed is the tree hash root of the attestation data;
    /// domain separation is applied by callers that own a fork schedule.
    pub fn sign(&mut self, secret_key: &SecretKey, committee_position: usize) -> Result<(), Error> {
        let message = self.data.tree_hash_root();
        self.add_signature(&secret_key.sign(message), committee_position)
    }

    /// Adds `signature` to `self` and sets the `committee_position`'th bit of
    /// `aggregation_bits`.
    ///
    /// Returns an `AlreadySigned` error if the bit was already set.
    pub fn add_signature(
        &mut self,
        signature: &Signature,
        committee_position: usize,
    ) -> Result<(), Error> {
        if self
            .aggregation_bits
            .get(committee_position)
            .map_err(Error::SszTypesError)?
        {
            Err(Error::AlreadySigned(committee_position))
        } else {
            self.aggregation_bits
                .set(committee_position, true)
                .map_err(Error::SszTypesError)?;

            self.signature.add_assign(signature);

            Ok(())
        }
    }
}

impl<E: EthSpec> SlotData for Attestation<E> {
    fn get_slot(&self) -> Slot {
        self.data.slot
    }
}
