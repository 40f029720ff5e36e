use std::collections::BTreeMap;

use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, CandidType)]
pub enum DirtyStatus {
    /// Buffer holds a value that differs from the original.
    Modified,
    /// Key was removed from the buffer and must be removed from the original on apply.
    Deleted,
}

/// Keys with staged, uncommitted changes, keyed to how they changed.
///
/// Plain data on purpose: anything that wants to observe staging state can
/// read or serialize this map directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirtyMap<K: Ord> {
    staged: BTreeMap<K, DirtyStatus>,
}

impl<K: Ord> Default for DirtyMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> DirtyMap<K> {
    pub fn new() -> Self {
        Self {
            staged: BTreeMap::new(),
        }
    }

    pub(crate) fn mark(&mut self, k: K, status: DirtyStatus) {
        self.staged.insert(k, status);
    }

    pub(crate) fn forget(&mut self, k: &K) -> Option<DirtyStatus> {
        self.staged.remove(k)
    }

    pub(crate) fn clear(&mut self) {
        self.staged.clear();
    }

    pub fn status(&self, k: &K) -> Option<DirtyStatus> {
        self.staged.get(k).copied()
    }

    pub fn contains(&self, k: &K) -> bool {
        self.staged.contains_key(k)
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, DirtyStatus)> {
        self.staged.iter().map(|(k, s)| (k, *s))
    }

    /// Snapshot of the currently dirty keys.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.staged.keys().cloned().collect()
    }
}
