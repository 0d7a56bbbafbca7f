use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open attribute → value mapping for quality specs and requirements.
///
/// No schema is imposed; only well-formedness is checked (non-blank keys,
/// no null values).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityMap(BTreeMap<String, Value>);

impl QualityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (key, value) in &self.0 {
            if key.trim().is_empty() {
                return Err("quality attribute names cannot be blank".to_string());
            }
            if value.is_null() {
                return Err(format!("quality attribute '{}' has no value", key));
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<String, Value>> for QualityMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        QualityMap(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_are_ordered() {
        let map = QualityMap::new().with("sio2", 58.5).with("loi", "< 5%");
        let keys: Vec<_> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["loi", "sio2"]);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_keys_and_nulls() {
        assert!(QualityMap::new().with(" ", 1).validate().is_err());
        assert!(QualityMap::new().with("fineness", json!(null)).validate().is_err());
    }
}
