use std::collections::BTreeSet;

use super::row::{Row, RowKey};

/// Selected rows, tracked by key so the selection survives search, sort and paging.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    keys: BTreeSet<RowKey>,
}

impl Selection {
    pub fn key_of<T: Row>(row: &T, index: usize) -> RowKey {
        row.row_id().map(RowKey::Id).unwrap_or(RowKey::Index(index))
    }

    /// Flips membership of `key`, returns the new state.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn insert(&mut self, key: RowKey) {
        self.keys.insert(key);
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keeps the ids that still exist in the new snapshot `rows`.
    /// Index keys are dropped, a position in a new snapshot names a different row.
    pub fn retain_existing<T: Row>(&mut self, rows: &[T]) {
        if self.keys.is_empty() {
            return;
        }
        let live: BTreeSet<String> = rows.iter().filter_map(|row| row.row_id()).collect();
        self.keys.retain(|k| match k {
            RowKey::Id(id) => live.contains(id),
            RowKey::Index(_) => false,
        });
    }
}
