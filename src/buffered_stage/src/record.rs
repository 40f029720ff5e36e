use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde_json::{Map, Value};

use crate::error::{json_kind, StageError, StageResult};
use crate::traits::MapStore;

impl<K, V> MapStore<K, V> for BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn get(&self, k: &K) -> Option<V> {
        BTreeMap::get(self, k).cloned()
    }

    fn put(&mut self, k: K, v: V) {
        self.insert(k, v);
    }

    fn remove(&mut self, k: &K) {
        BTreeMap::remove(self, k);
    }

    fn keys(&self) -> Vec<K> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, k: &K) -> bool {
        BTreeMap::contains_key(self, k)
    }
}

impl<K, V> MapStore<K, V> for HashMap<K, V>
where
    K: Ord + Hash + Clone,
    V: Clone,
{
    fn get(&self, k: &K) -> Option<V> {
        HashMap::get(self, k).cloned()
    }

    fn put(&mut self, k: K, v: V) {
        self.insert(k, v);
    }

    fn remove(&mut self, k: &K) {
        HashMap::remove(self, k);
    }

    fn keys(&self) -> Vec<K> {
        HashMap::keys(self).cloned().collect()
    }

    fn contains_key(&self, k: &K) -> bool {
        HashMap::contains_key(self, k)
    }
}

// Lets a stage borrow a record the caller keeps ownership of.
impl<K, V, S> MapStore<K, V> for &mut S
where
    K: Ord + Clone,
    V: Clone,
    S: MapStore<K, V> + ?Sized,
{
    fn get(&self, k: &K) -> Option<V> {
        (**self).get(k)
    }

    fn put(&mut self, k: K, v: V) {
        (**self).put(k, v)
    }

    fn remove(&mut self, k: &K) {
        (**self).remove(k)
    }

    fn keys(&self) -> Vec<K> {
        (**self).keys()
    }

    fn contains_key(&self, k: &K) -> bool {
        (**self).contains_key(k)
    }
}

/// A JSON object used as the original record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonRecord {
    inner: Map<String, Value>,
}

impl JsonRecord {
    pub fn new() -> Self {
        Self { inner: Map::new() }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.inner)
    }
}

impl From<Map<String, Value>> for JsonRecord {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

impl TryFrom<Value> for JsonRecord {
    type Error = StageError;

    fn try_from(value: Value) -> StageResult<Self> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(StageError::invalid(format!(
                "a record must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl MapStore<String, Value> for JsonRecord {
    fn get(&self, k: &String) -> Option<Value> {
        self.inner.get(k).cloned()
    }

    fn put(&mut self, k: String, v: Value) {
        self.inner.insert(k, v);
    }

    fn remove(&mut self, k: &String) {
        self.inner.remove(k);
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    fn contains_key(&self, k: &String) -> bool {
        self.inner.contains_key(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise<S: MapStore<String, u32>>(store: &mut S) {
        store.put("a".into(), 1);
        store.put("b".into(), 2);
        store.remove(&"a".to_string());
        assert_eq!(store.get(&"b".to_string()), Some(2));
        assert!(!store.contains_key(&"a".to_string()));
        assert_eq!(store.keys(), vec!["b".to_string()]);
    }

    #[test]
    fn std_maps_are_records() {
        exercise(&mut BTreeMap::new());
        exercise(&mut HashMap::new());
    }

    #[test]
    fn borrowed_record_writes_through() {
        let mut map: BTreeMap<String, u32> = BTreeMap::new();
        exercise(&mut &mut map);
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn json_record_requires_object() {
        let rec = JsonRecord::try_from(json!({"baz": 1})).unwrap();
        assert_eq!(rec.get(&"baz".to_string()), Some(json!(1)));
        assert_eq!(rec.into_value(), json!({"baz": 1}));

        for bad in [json!(null), json!([1, 2]), json!("baz")] {
            assert!(matches!(
                JsonRecord::try_from(bad),
                Err(StageError::InvalidArgument(_))
            ));
        }
    }
}
