use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::ops::Index;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    config::{PresenceRule, StageConfig},
    dirty::{DirtyMap, DirtyStatus},
    error::StageResult,
    record::JsonRecord,
    selection::KeySelection,
    traits::{MapStore, Truthy},
};

/// Write buffer in front of an original record.
///
/// Reads and writes go to the buffer. The original only changes when
/// [`apply`](Self::apply) copies staged keys onto it.
pub struct BufferedStage<K, V, S>
where
    K: Ord + Clone,
    V: Clone,
    S: MapStore<K, V>,
{
    original: S,
    buffer: BTreeMap<K, V>,
    dirty: DirtyMap<K>,
    config: StageConfig,
    // decides whether a deleted key's original value must be reconciled on apply
    present: fn(&V) -> bool,
}

fn any_value<V>(_: &V) -> bool {
    true
}

impl<K, V, S> fmt::Debug for BufferedStage<K, V, S>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
    S: MapStore<K, V> + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedStage")
            .field("original", &self.original)
            .field("buffer", &self.buffer)
            .field("dirty", &self.dirty)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K, V, S> BufferedStage<K, V, S>
where
    K: Ord + Clone,
    V: Truthy + Clone,
    S: MapStore<K, V>,
{
    pub fn new(original: S) -> Self {
        Self::with_config(original, StageConfig::default())
    }

    pub fn with_config(original: S, config: StageConfig) -> Self {
        let present: fn(&V) -> bool = match config.presence {
            PresenceRule::Truthy => <V as Truthy>::is_truthy,
            PresenceRule::Exists => any_value::<V>,
        };
        Self::build(original, config, present)
    }
}

impl<K, V, S> BufferedStage<K, V, S>
where
    K: Ord + Clone,
    V: Clone,
    S: MapStore<K, V>,
{
    /// Stage whose deletes are reconciled whenever the original has the key,
    /// whatever its value. Works for any value type.
    pub fn strict(original: S) -> Self {
        Self::build(original, StageConfig::strict(), any_value::<V>)
    }

    fn build(original: S, config: StageConfig, present: fn(&V) -> bool) -> Self {
        let buffer = original
            .keys()
            .into_iter()
            .filter_map(|k| original.get(&k).map(|v| (k, v)))
            .collect();
        Self {
            original,
            buffer,
            dirty: DirtyMap::new(),
            config,
            present,
        }
    }

    pub fn get(&self, k: &K) -> Option<&V> {
        self.buffer.get(k)
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.buffer.contains_key(k)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.buffer.iter()
    }

    /// Stages `v` under `k`. Writing back the original's own value un-stages the key.
    pub fn set(&mut self, k: K, v: V)
    where
        V: PartialEq,
    {
        let matches_original = self.original.get(&k).is_some_and(|orig| orig == v);
        self.buffer.insert(k.clone(), v);
        if matches_original {
            self.dirty.forget(&k);
            trace!(dirty = self.dirty.len(), "set matches original, unstaged");
        } else {
            self.dirty.mark(k, DirtyStatus::Modified);
            trace!(dirty = self.dirty.len(), "staged modification");
        }
    }

    /// Removes `k` from the buffer. The deletion is only staged if the original
    /// still holds a value for `k`; a buffer-only key simply disappears.
    pub fn delete(&mut self, k: &K) {
        self.buffer.remove(k);
        let present = self.present;
        if self.original.get(k).is_some_and(|v| present(&v)) {
            self.dirty.mark(k.clone(), DirtyStatus::Deleted);
            trace!(dirty = self.dirty.len(), "staged deletion");
        } else {
            self.dirty.forget(k);
            trace!(dirty = self.dirty.len(), "deleted buffer-only key");
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn has_buffered_changes(&self) -> bool {
        self.has_changes()
    }

    pub fn has_changed(&self, k: &K) -> bool {
        self.dirty.contains(k)
    }

    pub fn status(&self, k: &K) -> Option<DirtyStatus> {
        self.dirty.status(k)
    }

    /// Commits staged changes to the original. An empty `keys` commits every dirty key.
    pub fn apply(&mut self, keys: &[K]) {
        self.apply_selection(KeySelection::from_keys(keys))
    }

    pub fn apply_changes(&mut self, keys: &[K]) {
        self.apply(keys)
    }

    pub fn apply_buffered_changes(&mut self, keys: &[K]) {
        self.apply(keys)
    }

    pub fn apply_selection(&mut self, selection: KeySelection<K>) {
        let (all, targets) = selection.resolve(&self.dirty);
        debug!(all, keys = targets.len(), "applying staged changes");
        for k in &targets {
            match (self.dirty.status(k), self.buffer.get(k)) {
                (Some(DirtyStatus::Deleted), _) | (_, None) => self.original.remove(k),
                (_, Some(v)) => self.original.put(k.clone(), v.clone()),
            }
        }
        self.settle(all, &targets);
    }

    /// Resets staged keys to the original's values. An empty `keys` resets every dirty key.
    pub fn discard(&mut self, keys: &[K]) {
        self.discard_selection(KeySelection::from_keys(keys))
    }

    pub fn discard_changes(&mut self, keys: &[K]) {
        self.discard(keys)
    }

    pub fn discard_buffered_changes(&mut self, keys: &[K]) {
        self.discard(keys)
    }

    pub fn discard_selection(&mut self, selection: KeySelection<K>) {
        let (all, targets) = selection.resolve(&self.dirty);
        debug!(all, keys = targets.len(), "discarding staged changes");
        for k in &targets {
            match self.original.get(k) {
                Some(v) => {
                    self.buffer.insert(k.clone(), v);
                }
                None => {
                    self.buffer.remove(k);
                }
            }
        }
        self.settle(all, &targets);
    }

    fn settle(&mut self, all: bool, keys: &[K]) {
        if all {
            self.dirty.clear();
        } else {
            for k in keys {
                self.dirty.forget(k);
            }
        }
    }

    pub fn original(&self) -> &S {
        &self.original
    }

    pub fn buffer(&self) -> &BTreeMap<K, V> {
        &self.buffer
    }

    pub fn dirty(&self) -> &DirtyMap<K> {
        &self.dirty
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Drops the buffer and any unapplied changes.
    pub fn into_original(self) -> S {
        self.original
    }
}

impl<'a, K, V, S> Index<&'a K> for BufferedStage<K, V, S>
where
    K: Ord + Clone,
    V: Clone,
    S: MapStore<K, V>,
{
    type Output = V;

    /// Panics if `k` is not in the buffer.
    fn index(&self, k: &'a K) -> &V {
        &self.buffer[k]
    }
}

impl BufferedStage<String, Value, JsonRecord> {
    /// Stages edits to a JSON object. Fails if `original` is not an object.
    pub fn from_json(original: Value) -> StageResult<Self> {
        Ok(Self::new(JsonRecord::try_from(original)?))
    }
}

impl<S> BufferedStage<String, Value, S>
where
    S: MapStore<String, Value>,
{
    /// [`apply`](Self::apply) with an untyped key list. The list is validated
    /// before anything is committed.
    pub fn apply_json(&mut self, keys: &Value) -> StageResult<()> {
        let selection = KeySelection::from_json(keys)?;
        self.apply_selection(selection);
        Ok(())
    }

    pub fn discard_json(&mut self, keys: &Value) -> StageResult<()> {
        let selection = KeySelection::from_json(keys)?;
        self.discard_selection(selection);
        Ok(())
    }
}
