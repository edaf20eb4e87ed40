use crate::verified_attestation::VerifiedAttestation;
use crate::Error;
use std::cmp::Reverse;
use types::{Attestation, AttestationData, BitList, EthSpec, Hash256, Unsigned};

/// Returned when an attestation is offered to a group.
#[derive(Debug, PartialEq)]
pub enum InsertOutcome {
    /// The attestation contributed at least one previously unseen validator
    /// and was stored.
    NewValidatorsAdded,
    /// Every participating validator had already been observed by the group.
    /// The attestation was not stored.
    ValidatorsAlreadyKnown,
}

/// A collection of attestations that all vote for the same `AttestationData`
/// (and therefore come from the same committee).
///
/// The group's job is to answer one question efficiently: given the
/// attestations currently held, what is a small set of non-overlapping
/// aggregates that between them cover the maximal union of validators?
pub struct MatchingDataAttestationGroup<E: EthSpec> {
    data: AttestationData,
    committee_shuffling_seed: Hash256,
    attestations: Vec<VerifiedAttestation<E>>,
    /// The union of the aggregation bits of every attestation ever added to
    /// the group.
    ///
    /// This only grows: bits are not cleared when attestations are removed,
    /// so content strictly subsumed by what has already been served is
    /// refused even after the attestations that carried it are gone.
    seen_aggregation_bits: Option<BitList<E::MaxValidatorsPerCommittee>>,
}

/// Is every bit set in `a` also set in `b`?
fn is_subset<N: Unsigned + Clone>(a: &BitList<N>, b: &BitList<N>) -> bool {
    a.intersection(b).num_set_bits() == a.num_set_bits()
}

impl<E: EthSpec> MatchingDataAttestationGroup<E> {
    pub fn new(data: AttestationData, committee_shuffling_seed: Hash256) -> Self {
        Self {
            data,
            committee_shuffling_seed,
            attestations: vec![],
            seen_aggregation_bits: None,
        }
    }

    /// Insert an attestation into the group.
    ///
    /// Attestations whose participants are all already covered by
    /// `seen_aggregation_bits` are not stored; keeping strict subsets of
    /// known aggregates can never improve the aggregates this group emits.
    pub fn add(&mut self, attestation: VerifiedAttestation<E>) -> Result<InsertOutcome, Error> {
        if *attestation.data() != self.data {
            return Err(Error::IncorrectAttestationData);
        }

        let aggregation_bits = &attestation.attestation().aggregation_bits;
        if aggregation_bits.is_zero() {
            return Err(Error::NoAggregationBitsSet);
        }

        let seen_aggregation_bits = match &self.seen_aggregation_bits {
            Some(seen_bits) => {
                if seen_bits.len() != aggregation_bits.len() {
                    return Err(Error::InconsistentBitfieldLengths);
                }
                if is_subset(aggregation_bits, seen_bits) {
                    return Ok(InsertOutcome::ValidatorsAlreadyKnown);
                }
                seen_bits.union(aggregation_bits)
            }
            None => aggregation_bits.clone(),
        };

        self.seen_aggregation_bits = Some(seen_aggregation_bits);
        self.attestations.push(attestation);

        Ok(InsertOutcome::NewValidatorsAdded)
    }

    /// Remove every stored attestation whose participants are a subset of
    /// `attestation`'s, returning the number removed.
    ///
    /// Attestations that merely overlap `attestation` are left in place
    /// unchanged; the group never mutates stored attestations. The seen bits
    /// are deliberately not cleared.
    pub fn remove(&mut self, attestation: &Attestation<E>) -> usize {
        let removed_bits = &attestation.aggregation_bits;
        let initial_len = self.attestations.len();
        self.attestations
            .retain(|stored| !is_subset(&stored.attestation().aggregation_bits, removed_bits));
        initial_len - self.attestations.len()
    }

    /// Produce the aggregates currently derivable from the group, largest
    /// first.
    ///
    /// Each aggregate is built by greedily folding in every stored
    /// attestation disjoint from it, in descending order of participant
    /// count (ties keep insertion order); together the aggregates of one
    /// full iteration partition the stored attestations. The iterator is
    /// lazy, so a consumer that stops early does not pay for the remaining
    /// aggregates, and it must not outlive mutation of the group.
    pub fn aggregates(&self) -> Aggregates<'_, E> {
        let mut remaining: Vec<&VerifiedAttestation<E>> = self.attestations.iter().collect();
        remaining.sort_by_key(|attestation| {
            Reverse(attestation.attestation().aggregation_bits.num_set_bits())
        });
        Aggregates {
            committee_shuffling_seed: self.committee_shuffling_seed,
            remaining,
        }
    }

    pub fn data(&self) -> &AttestationData {
        &self.data
    }

    pub fn committee_shuffling_seed(&self) -> Hash256 {
        self.committee_shuffling_seed
    }

    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }
}

/// See [`MatchingDataAttestationGroup::aggregates`].
pub struct Aggregates<'a, E: EthSpec> {
    committee_shuffling_seed: Hash256,
    remaining: Vec<&'a VerifiedAttestation<E>>,
}

impl<'a, E: EthSpec> Iterator for Aggregates<'a, E> {
    type Item = VerifiedAttestation<E>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut candidates = std::mem::take(&mut self.remaining).into_iter();

        let mut aggregate = candidates.next()?.attestation().clone();
        for candidate in candidates {
            if aggregate.signers_disjoint_from(candidate.attestation()) {
                aggregate.aggregate(candidate.attestation());
            } else {
                self.remaining.push(candidate);
            }
        }

        Some(VerifiedAttestation::new(
            aggregate,
            self.committee_shuffling_seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::test_utils::generate_deterministic_keypair;
    use types::{Checkpoint, MainnetEthSpec, Slot};

    type E = MainnetEthSpec;

    const COMMITTEE_LEN: usize = 8;

    fn test_data() -> AttestationData {
        AttestationData {
            slot: Slot::new(4),
            index: 0,
            beacon_block_root: Hash256::from_low_u64_be(1),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    fn seed() -> Hash256 {
        Hash256::repeat_byte(0xab)
    }

    fn attestation(validators: &[usize]) -> Attestation<E> {
        let mut attestation = Attestation::empty(test_data(), COMMITTEE_LEN).unwrap();
        for &validator in validators {
            attestation
                .aggregation_bits
                .set(validator, true)
                .expect("validator index within committee");
        }
        attestation
    }

    fn verified(validators: &[usize]) -> VerifiedAttestation<E> {
        VerifiedAttestation::new(attestation(validators), seed())
    }

    fn group() -> MatchingDataAttestationGroup<E> {
        MatchingDataAttestationGroup::new(test_data(), seed())
    }

    fn aggregate_bits(group: &MatchingDataAttestationGroup<E>) -> Vec<Vec<usize>> {
        group
            .aggregates()
            .map(|aggregate| {
                aggregate
                    .attestation()
                    .aggregation_bits
                    .iter()
                    .enumerate()
                    .filter(|(_, bit)| *bit)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn disjoint_attestations_form_one_aggregate() {
        let mut group = group();
        assert_eq!(group.add(verified(&[0])), Ok(InsertOutcome::NewValidatorsAdded));
        assert_eq!(group.add(verified(&[1])), Ok(InsertOutcome::NewValidatorsAdded));
        assert_eq!(group.len(), 2);

        assert_eq!(aggregate_bits(&group), vec![vec![0, 1]]);
    }

    #[test]
    fn subset_of_seen_bits_is_refused() {
        let mut group = group();
        group.add(verified(&[0])).unwrap();
        group.add(verified(&[1])).unwrap();

        assert_eq!(
            group.add(verified(&[0])),
            Ok(InsertOutcome::ValidatorsAlreadyKnown),
            "strict subset of the union of previous attestations"
        );
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn greedy_aggregation_over_overlap() {
        let mut group = group();
        group.add(verified(&[0, 1, 2])).unwrap();
        group.add(verified(&[3, 4])).unwrap();
        group.add(verified(&[1])).unwrap();

        // The singleton overlaps the largest attestation, so it cannot join
        // the first aggregate.
        assert_eq!(aggregate_bits(&group), vec![vec![0, 1, 2, 3, 4], vec![1]]);
        // Streaming does not consume the stored attestations.
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn aggregates_partition_the_stored_attestations() {
        let mut group = group();
        group.add(verified(&[0, 1])).unwrap();
        group.add(verified(&[1, 2])).unwrap();
        group.add(verified(&[2, 3])).unwrap();

        assert_eq!(aggregate_bits(&group), vec![vec![0, 1, 2, 3], vec![1, 2]]);
    }

    #[test]
    fn removal_subtracts_subsets_only() {
        let mut group = group();
        group.add(verified(&[0, 1, 2, 3])).unwrap();
        group.add(verified(&[4, 5, 6, 7])).unwrap();

        assert_eq!(group.remove(&attestation(&[0, 1, 2, 3])), 1);
        assert_eq!(group.len(), 1);
        assert_eq!(aggregate_bits(&group), vec![vec![4, 5, 6, 7]]);

        // Removal is idempotent.
        assert_eq!(group.remove(&attestation(&[0, 1, 2, 3])), 0);
    }

    #[test]
    fn seen_bits_survive_removal() {
        let mut group = group();
        group.add(verified(&[0, 1, 2, 3])).unwrap();
        group.add(verified(&[4, 5, 6, 7])).unwrap();
        group.remove(&attestation(&[0, 1, 2, 3]));

        // The union of everything ever added still covers these validators,
        // so re-adding a subset of the removed attestation is refused.
        assert_eq!(
            group.add(verified(&[0, 1, 2])),
            Ok(InsertOutcome::ValidatorsAlreadyKnown)
        );
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn overlapping_removal_leaves_attestations_untouched() {
        let mut group = group();
        group.add(verified(&[0, 1])).unwrap();
        group.add(verified(&[1, 2, 3])).unwrap();

        // {0, 1} overlaps but is not a subset of {1, 2, 3}.
        assert_eq!(group.remove(&attestation(&[1, 2, 3])), 1);
        assert_eq!(aggregate_bits(&group), vec![vec![0, 1]]);
    }

    #[test]
    fn rejects_empty_and_foreign_attestations() {
        let mut group = group();
        assert_eq!(group.add(verified(&[])), Err(Error::NoAggregationBitsSet));

        let mut foreign_data = test_data();
        foreign_data.beacon_block_root = Hash256::from_low_u64_be(2);
        let foreign = Attestation::empty(foreign_data, COMMITTEE_LEN).unwrap();
        assert_eq!(
            group.add(VerifiedAttestation::new(foreign, seed())),
            Err(Error::IncorrectAttestationData)
        );

        group.add(verified(&[0])).unwrap();
        let mut longer = Attestation::<E>::empty(test_data(), COMMITTEE_LEN * 2).unwrap();
        longer.aggregation_bits.set(9, true).unwrap();
        assert_eq!(
            group.add(VerifiedAttestation::new(longer, seed())),
            Err(Error::InconsistentBitfieldLengths)
        );
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn emitted_aggregate_matches_manual_aggregation() {
        let mut a = attestation(&[]);
        a.sign(&generate_deterministic_keypair(0).sk, 0).unwrap();
        let mut b = attestation(&[]);
        b.sign(&generate_deterministic_keypair(1).sk, 1).unwrap();

        let mut group = group();
        group.add(VerifiedAttestation::new(a.clone(), seed())).unwrap();
        group.add(VerifiedAttestation::new(b.clone(), seed())).unwrap();

        let mut expected = a;
        expected.aggregate(&b);

        let aggregates = group.aggregates().collect::<Vec<_>>();
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].attestation(), &expected);
        assert_eq!(aggregates[0].committee_shuffling_seed(), Some(seed()));
    }
}
