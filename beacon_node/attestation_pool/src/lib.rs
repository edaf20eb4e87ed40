//! An in-memory staging area for attestations flowing between gossip and
//! block production.
//!
//! Verified attestations are grouped by the tree hash root of their
//! `AttestationData`; each group combines its attestations into the largest
//! non-overlapping aggregates it can. The pool serves those aggregates two
//! ways:
//!
//! - `get_attestations_for_block` walks the pool newest-slot-first and packs
//!   a block's worth of attestations, subject to state validity, fork
//!   membership and the per-epoch inclusion caps.
//! - `create_aggregate_for` returns the best current aggregate for a single
//!   attestation data root, for the naive gossip aggregation flow.
//!
//! **The pool does not do any signature or attestation verification. It
//! assumes that all attestations provided are individually valid.**
//!
//! Attestations included in a canonical block are `remove`d, which subtracts
//! their participants from the pool, and a per-slot `prune` drops groups
//! whose attestation slot has left the retention window.

mod matching_data_attestation_group;
pub mod metrics;
mod verified_attestation;

pub use matching_data_attestation_group::{
    Aggregates, InsertOutcome, MatchingDataAttestationGroup,
};
pub use verified_attestation::VerifiedAttestation;

use parking_lot::RwLock;
use slog::{debug, Logger};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tree_hash::TreeHash;
use types::{Attestation, AttestationData, CommitteeIndex, Epoch, EthSpec, Hash256, Slot};

/// The number of epochs an attestation is retained before `prune` drops it,
/// matching the window within which the protocol still accepts it into a
/// block.
pub const ATTESTATION_RETENTION_EPOCHS: u64 = 2;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// The attestation carried no committee shuffling seed. Seeds are
    /// attached during verification; their absence is a bug in the caller
    /// and is never recovered from here.
    MissingCommitteeShufflingSeed,
    /// The attestation has no participating validators.
    NoAggregationBitsSet,
    /// The attestation's aggregation bitfield length differs from the rest
    /// of its group, despite sharing the group's data. This indicates a
    /// fairly serious error somewhere in the code that called this function.
    InconsistentBitfieldLengths,
    /// The attestation was offered to a group holding different data. This
    /// is an internal error.
    IncorrectAttestationData,
}

/// The state-dependent checks required when packing attestations into a
/// block.
///
/// Implementations wrap the beacon state at the slot of the block being
/// proposed. The pool treats them as an oracle: rejection reasons are
/// observed only for their presence.
pub trait ProposalState<E: EthSpec> {
    /// Why an attestation cannot be included in a block on top of this
    /// state.
    type RejectionReason;

    /// The epoch of the state at the proposal slot.
    fn current_epoch(&self) -> Epoch;

    /// The number of previous-epoch attestations the state can still accept
    /// under the per-epoch inclusion cap.
    fn previous_epoch_attestation_capacity(&self) -> usize;

    /// Check `data` for state-transition validity against this state.
    fn validate_attestation(&self, data: &AttestationData) -> Result<(), Self::RejectionReason>;
}

/// Checks whether attestations belong to the fork expected by the block
/// being proposed.
pub trait ForkChecker {
    fn attestations_from_correct_fork(&self, data: &AttestationData) -> bool;
}

/// The aggregating attestation pool.
///
/// All mutating operations and the block/aggregate queries are atomic with
/// respect to each other via a single coarse lock; `num_attestations` reads
/// an atomic counter without it.
pub struct AggregatingAttestationPool<E: EthSpec> {
    inner: RwLock<PoolInner<E>>,
    /// Total count of attestations across all groups. Kept in sync with
    /// `inner` under its write lock.
    size: AtomicUsize,
    log: Logger,
}

struct PoolInner<E: EthSpec> {
    /// All groups, keyed by the tree hash root of their attestation data.
    attestation_groups: HashMap<Hash256, MatchingDataAttestationGroup<E>>,
    /// The group keys present at each slot, ordered so that slot ranges can
    /// be pruned and walked in either direction.
    data_hashes_by_slot: BTreeMap<Slot, HashSet<Hash256>>,
}

impl<E: EthSpec> AggregatingAttestationPool<E> {
    pub fn new(log: Logger) -> Self {
        Self {
            inner: RwLock::new(PoolInner {
                attestation_groups: HashMap::new(),
                data_hashes_by_slot: BTreeMap::new(),
            }),
            size: AtomicUsize::new(0),
            log,
        }
    }

    /// Insert an attestation, aggregating it into the group for its data.
    ///
    /// The attestation must carry a committee shuffling seed. Attestations
    /// that contribute no validator not already seen by their group are
    /// acknowledged but not stored.
    pub fn insert(&self, attestation: VerifiedAttestation<E>) -> Result<InsertOutcome, Error> {
        let _timer = metrics::start_timer(&metrics::ATTESTATION_POOL_INSERT_SECONDS);

        let committee_shuffling_seed = attestation
            .committee_shuffling_seed()
            .ok_or(Error::MissingCommitteeShufflingSeed)?;
        let data = attestation.data().clone();
        let slot = data.slot;
        let data_hash = data.tree_hash_root();

        let mut inner = self.inner.write();

        let group = inner
            .attestation_groups
            .entry(data_hash)
            .or_insert_with(|| MatchingDataAttestationGroup::new(data, committee_shuffling_seed));

        let outcome = match group.add(attestation) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Don't leave behind an empty group if the add that created
                // it failed.
                if group.is_empty() {
                    inner.attestation_groups.remove(&data_hash);
                }
                return Err(e);
            }
        };

        if outcome == InsertOutcome::NewValidatorsAdded {
            let size = self.size.fetch_add(1, Ordering::Relaxed) + 1;
            metrics::set_gauge(&metrics::ATTESTATION_POOL_SIZE, size as i64);
        }

        inner
            .data_hashes_by_slot
            .entry(slot)
            .or_insert_with(HashSet::new)
            .insert(data_hash);

        Ok(outcome)
    }

    /// Remove the participants of `attestation` from the pool, e.g. because
    /// they were included in a canonical block.
    ///
    /// Every stored attestation whose participants are a subset of
    /// `attestation`'s is dropped; overlapping attestations are left intact.
    /// Returns the number of attestations dropped. Unknown data is a no-op.
    pub fn remove(&self, attestation: &Attestation<E>) -> usize {
        let data_hash = attestation.data.tree_hash_root();

        let mut inner = self.inner.write();

        let (removed, now_empty) = match inner.attestation_groups.get_mut(&data_hash) {
            Some(group) => (group.remove(attestation), group.is_empty()),
            None => return 0,
        };

        if removed > 0 {
            let size = self.size.fetch_sub(removed, Ordering::Relaxed) - removed;
            metrics::set_gauge(&metrics::ATTESTATION_POOL_SIZE, size as i64);
        }

        if now_empty {
            inner.attestation_groups.remove(&data_hash);
            let slot = attestation.data.slot;
            if let Some(data_hashes) = inner.data_hashes_by_slot.get_mut(&slot) {
                data_hashes.remove(&data_hash);
                if data_hashes.is_empty() {
                    inner.data_hashes_by_slot.remove(&slot);
                }
            }
        }

        removed
    }

    /// Apply `remove` to each attestation.
    pub fn remove_all<'a, I>(&self, attestations: I)
    where
        I: IntoIterator<Item = &'a Attestation<E>>,
    {
        for attestation in attestations {
            self.remove(attestation);
        }
    }

    /// Drop every group whose attestation slot has fallen out of the
    /// retention window ending at `current_slot`.
    ///
    /// Retention is purely slot arithmetic over the slot embedded in the
    /// attestation data, not wall-clock time or arrival order.
    pub fn prune(&self, current_slot: Slot) {
        let _timer = metrics::start_timer(&metrics::ATTESTATION_POOL_PRUNE_SECONDS);

        let retention_slots = E::slots_per_epoch() * ATTESTATION_RETENTION_EPOCHS;
        if current_slot <= retention_slots {
            return;
        }
        let earliest_retained_slot = current_slot - retention_slots;

        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let retained = inner.data_hashes_by_slot.split_off(&earliest_retained_slot);
        let expired = std::mem::replace(&mut inner.data_hashes_by_slot, retained);

        let mut removed = 0;
        for data_hashes in expired.into_values() {
            for data_hash in data_hashes {
                if let Some(group) = inner.attestation_groups.remove(&data_hash) {
                    removed += group.len();
                }
            }
        }

        if removed > 0 {
            let size = self.size.fetch_sub(removed, Ordering::Relaxed) - removed;
            metrics::set_gauge(&metrics::ATTESTATION_POOL_SIZE, size as i64);
            debug!(
                self.log,
                "Pruned attestation pool";
                "removed" => removed,
                "earliest_retained_slot" => earliest_retained_slot.as_u64()
            );
        }
    }

    /// The best aggregate currently available for the attestation data with
    /// the given tree hash root, if any.
    pub fn create_aggregate_for(&self, data_hash: &Hash256) -> Option<VerifiedAttestation<E>> {
        self.inner
            .read()
            .attestation_groups
            .get(data_hash)
            .and_then(|group| group.aggregates().next())
    }

    /// Iterate the aggregates of every group, newest slot first, optionally
    /// restricted to a single slot and/or committee index.
    ///
    /// The traversal snapshots the slot index up front and re-checks each
    /// group lazily, tolerating groups that are removed concurrently; no
    /// retention or validity filters are applied. Callers must not mutate
    /// the pool while holding an item borrowed from the iterator.
    pub fn attestations(
        &self,
        slot: Option<Slot>,
        committee_index: Option<CommitteeIndex>,
    ) -> impl Iterator<Item = Attestation<E>> + '_ {
        let data_hashes: Vec<Hash256> = {
            let inner = self.inner.read();
            inner
                .data_hashes_by_slot
                .iter()
                .rev()
                .filter(|(map_slot, _)| slot.map_or(true, |slot| **map_slot == slot))
                .flat_map(|(_, data_hashes)| data_hashes.iter().copied())
                .collect()
        };

        data_hashes.into_iter().flat_map(move |data_hash| {
            let inner = self.inner.read();
            inner
                .attestation_groups
                .get(&data_hash)
                // The group may have vanished since the slot index was
                // snapshotted.
                .filter(|group| {
                    committee_index.map_or(true, |index| group.data().index == index)
                })
                .map(|group| {
                    group
                        .aggregates()
                        .map(VerifiedAttestation::into_attestation)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })
    }

    /// Select attestations for inclusion in a block proposed on top of
    /// `state`.
    ///
    /// Groups are walked newest slot first, dropping any that fail the
    /// state validity or fork checks, and their aggregates are collected up
    /// to `MAX_ATTESTATIONS`. The candidate stream is capped before the
    /// previous-epoch filter so that total work stays bounded; attestations
    /// from before the state's epoch are then admitted only while the
    /// state's previous-epoch capacity lasts.
    pub fn get_attestations_for_block<P, F>(
        &self,
        state: &P,
        fork_checker: &F,
    ) -> Vec<Attestation<E>>
    where
        P: ProposalState<E>,
        F: ForkChecker,
    {
        let _timer = metrics::start_timer(&metrics::ATTESTATION_POOL_BLOCK_PACKING_SECONDS);

        let current_epoch = state.current_epoch();
        let previous_epoch_limit = state.previous_epoch_attestation_capacity();
        let mut previous_epoch_count = 0;

        let inner = self.inner.read();
        inner
            .data_hashes_by_slot
            .iter()
            .rev()
            .flat_map(|(_, data_hashes)| data_hashes.iter())
            .filter_map(|data_hash| inner.attestation_groups.get(data_hash))
            .filter(|group| state.validate_attestation(group.data()).is_ok())
            .filter(|group| fork_checker.attestations_from_correct_fork(group.data()))
            .flat_map(|group| group.aggregates())
            .take(E::max_attestations())
            .map(VerifiedAttestation::into_attestation)
            .filter(|attestation| {
                if attestation.data.slot.epoch(E::slots_per_epoch()) < current_epoch {
                    let admitted = previous_epoch_count < previous_epoch_limit;
                    if admitted {
                        previous_epoch_count += 1;
                    }
                    admitted
                } else {
                    true
                }
            })
            .collect()
    }

    /// The total number of attestations stored across all groups.
    ///
    /// This is an unsynchronised read; it may race with concurrent
    /// mutation.
    pub fn num_attestations(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}
