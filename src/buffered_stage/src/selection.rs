use serde_json::Value;

use crate::dirty::DirtyMap;
use crate::error::{json_kind, StageError, StageResult};

/// Which keys an apply or discard operates on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySelection<K> {
    /// Every key dirty at the time of the call.
    All,
    Keys(Vec<K>),
}

impl<K: Clone> KeySelection<K> {
    /// An empty list means every dirty key.
    pub fn from_keys(keys: &[K]) -> Self {
        keys.to_vec().into()
    }
}

impl<K> KeySelection<K> {
    pub fn is_all(&self) -> bool {
        match self {
            KeySelection::All => true,
            KeySelection::Keys(keys) => keys.is_empty(),
        }
    }

    pub(crate) fn resolve(self, dirty: &DirtyMap<K>) -> (bool, Vec<K>)
    where
        K: Ord + Clone,
    {
        match self {
            KeySelection::Keys(keys) if !keys.is_empty() => (false, keys),
            _ => (true, dirty.keys()),
        }
    }
}

impl<K> From<Vec<K>> for KeySelection<K> {
    fn from(keys: Vec<K>) -> Self {
        if keys.is_empty() {
            KeySelection::All
        } else {
            KeySelection::Keys(keys)
        }
    }
}

impl KeySelection<String> {
    /// Parses an untyped key list: `[]` selects everything, an array of
    /// strings selects those keys, anything else (`null` included) is rejected.
    pub fn from_json(value: &Value) -> StageResult<Self> {
        match value {
            Value::Array(items) => {
                let keys = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(StageError::invalid(format!(
                            "key list entries must be strings, got {}",
                            json_kind(other)
                        ))),
                    })
                    .collect::<StageResult<Vec<_>>>()?;
                Ok(keys.into())
            }
            other => Err(StageError::invalid(format!(
                "expected an array of keys, got {}",
                json_kind(other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyStatus;
    use serde_json::json;

    #[test]
    fn empty_list_selects_all() {
        assert!(KeySelection::<u8>::from_keys(&[]).is_all());
        assert!(KeySelection::<u8>::Keys(vec![]).is_all());
        assert!(!KeySelection::from_keys(&[1u8]).is_all());
    }

    #[test]
    fn resolve_snapshots_dirty_keys() {
        let mut dirty = DirtyMap::new();
        dirty.mark(3, DirtyStatus::Modified);
        dirty.mark(1, DirtyStatus::Deleted);
        assert_eq!(KeySelection::All.resolve(&dirty), (true, vec![1, 3]));
        assert_eq!(KeySelection::Keys(vec![]).resolve(&dirty), (true, vec![1, 3]));
        assert_eq!(KeySelection::Keys(vec![9]).resolve(&dirty), (false, vec![9]));
    }

    #[test]
    fn json_key_lists() {
        assert_eq!(KeySelection::from_json(&json!([])).unwrap(), KeySelection::All);
        assert_eq!(
            KeySelection::from_json(&json!(["foo", "bar"])).unwrap(),
            KeySelection::Keys(vec!["foo".to_string(), "bar".to_string()])
        );
    }

    #[test]
    fn json_key_lists_rejected() {
        for bad in [json!(null), json!("foo"), json!(3), json!({"foo": 1}), json!(["foo", 1])] {
            let err = KeySelection::from_json(&bad).unwrap_err();
            assert!(matches!(err, StageError::InvalidArgument(_)), "{bad}");
        }
    }
}
