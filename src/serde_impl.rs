use std::hash::{BuildHasher, Hash};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::compare::Compare;
use crate::priority_map::{Entry, PriorityMap};

/// Serialized as the sequence of its entries in heap array order
impl<K, V, C, S> Serialize for PriorityMap<K, V, C, S>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Deserialized from a sequence of entries through bulk construction, so the heap order is
/// rebuilt for the comparator `C` and duplicate keys are dropped
impl<'de, K, V, C, S> Deserialize<'de> for PriorityMap<K, V, C, S>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
    C: Compare<V> + Default,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Entry<K, V>>::deserialize(deserializer)?;
        Ok(Self::from_pairs_with(entries.into_iter().map(Entry::into_pair),
                                 C::default(),
                                 S::default()))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use crate::compare::Greater;
    use crate::priority_map::{Entry, PriorityMap};

    #[test]
    fn test_serialize() {
        let map = PriorityMap::from([("only", 1)]);
        assert_eq!(serde_json::to_value(&map).unwrap(), json!([{"key": "only", "value": 1}]));
    }

    #[test]
    fn test_roundtrip_keeps_array_order() {
        let map = PriorityMap::from_pairs((0..50).map(|k| (k, (k * 37) % 11)));
        let json = serde_json::to_string(&map).unwrap();
        let restored: PriorityMap<i32, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.as_slice(), map.as_slice());
        for entry in &map {
            assert_eq!(restored.position(&entry.key), map.position(&entry.key));
        }
    }

    #[test]
    fn test_deserialize_rebuilds_heap() {
        let json = r#"[{"key":"a","value":1},{"key":"b","value":9},
                       {"key":"a","value":50},{"key":"c","value":4}]"#;

        let max: PriorityMap<String, u32> = serde_json::from_str(json).unwrap();
        assert_eq!(max.len(), 3);
        assert_eq!(max.top(), Ok(&Entry { key: "b".to_string(), value: 9 }));

        let min: PriorityMap<String, u32, Greater> = serde_json::from_str(json).unwrap();
        assert_eq!(min.top(), Ok(&Entry { key: "a".to_string(), value: 1 }));
    }

    #[test]
    fn test_deserialize_invalid() {
        let res = serde_json::from_str::<PriorityMap<String, u32>>(r#"[{"key":"a"}]"#);
        assert!(res.is_err());
    }
}
