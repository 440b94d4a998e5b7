//! Local cache of the ledger's record registry
//!
//! The ledger owns the records. This cache holds the last listing in ledger
//! order and is only ever moved forward: a `Verified` record stays
//! `Verified`, and records missing from a listing are kept because the
//! ledger has no delete operation, so their absence can only mean the
//! listing was stale.

use super::record::{Record, SnapshotMerge};
use serde::Serialize;
use shared_types::{ConfidentialHandle, RecordId, RecordSnapshot};
use std::collections::HashMap;

/// Registry summary over the cached records.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Default)]
pub struct RegistryStats {
    pub total: usize,
    pub verified: usize,
    /// Mean public required level, 0 when the registry is empty.
    pub average_required_level: f64,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    order: Vec<RecordId>,
    records: HashMap<RecordId, Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    /// Records in listing order.
    pub fn records(&self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    /// Merge one snapshot, inserting the record if it is new.
    pub fn upsert(&mut self, snapshot: &RecordSnapshot) -> (Record, SnapshotMerge) {
        match self.records.get_mut(&snapshot.id) {
            Some(record) => {
                let merge = record.apply_snapshot(snapshot);
                (record.clone(), merge)
            }
            None => {
                let record = Record::from_snapshot(snapshot);
                self.order.push(snapshot.id.clone());
                self.records.insert(snapshot.id.clone(), record.clone());
                let merge = if record.is_verified() {
                    SnapshotMerge::BecameVerified
                } else {
                    SnapshotMerge::Unchanged
                };
                (record, merge)
            }
        }
    }

    /// Replace the listing with a fresh one.
    ///
    /// Snapshots are merged into existing entries; the new order follows
    /// the listing, with cached records it omitted appended after it.
    /// Returns the number of snapshots that tried to downgrade or alter a
    /// verified record.
    pub fn replace_all(&mut self, snapshots: &[RecordSnapshot]) -> usize {
        let mut rejected = 0;
        let mut order = Vec::with_capacity(snapshots.len().max(self.order.len()));

        for snapshot in snapshots {
            if order.contains(&snapshot.id) {
                continue;
            }
            let (_, merge) = self.upsert(snapshot);
            if matches!(
                merge,
                SnapshotMerge::StaleIgnored | SnapshotMerge::ConflictIgnored
            ) {
                rejected += 1;
            }
            order.push(snapshot.id.clone());
        }

        for id in &self.order {
            if !order.contains(id) {
                order.push(id.clone());
            }
        }
        self.order = order;
        rejected
    }

    /// Attach a handle to a cached record. Returns false if the record is
    /// unknown or already carries a different handle.
    pub fn attach_handle(&mut self, id: &RecordId, handle: ConfidentialHandle) -> bool {
        self.records
            .get_mut(id)
            .map(|record| record.attach_handle(handle))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> RegistryStats {
        let total = self.records.len();
        if total == 0 {
            return RegistryStats::default();
        }
        let verified = self.records.values().filter(|r| r.is_verified()).count();
        let level_sum: u64 = self
            .records
            .values()
            .map(|r| u64::from(r.attributes().required_level))
            .sum();

        RegistryStats {
            total,
            verified,
            average_required_level: level_sum as f64 / total as f64,
        }
    }
}
