use serde_json::{Map, Value};

/// Accumulated answers for a session or round, keyed by question name.
///
/// Values merge from three layered sources, lowest to highest precedence:
/// answers resolved earlier in the round, externally supplied configuration,
/// and values obtained from the prompt gateway. Once a key is present it is
/// never overwritten by a lower-precedence source: `seed` skips existing
/// keys, `insert` records a resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerPool {
    values: Map<String, Value>,
}

impl AnswerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool pre-loaded from a configuration map. Null entries are dropped so
    /// they do not mask a question's own default.
    pub fn from_config(config: &Map<String, Value>) -> Self {
        let mut pool = Self::new();
        for (name, value) in config {
            pool.seed(name, value.clone());
        }
        pool
    }

    /// Adds a lower-precedence value; an existing key wins.
    pub fn seed(&mut self, name: &str, value: Value) {
        if value.is_null() || self.values.contains_key(name) {
            return;
        }
        self.values.insert(name.to_string(), value);
    }

    /// Records a resolved answer.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_never_overwrites() {
        let mut pool = AnswerPool::new();
        pool.insert("name", json!("Order"));
        pool.seed("name", json!("Invoice"));
        assert_eq!(pool.get_str("name"), Some("Order"));
    }

    #[test]
    fn seed_drops_null_values() {
        let mut pool = AnswerPool::new();
        pool.seed("base", Value::Null);
        assert!(!pool.contains("base"));
    }

    #[test]
    fn from_config_keeps_first_occurrence_only() {
        let mut config = Map::new();
        config.insert("type".into(), json!("string"));
        let mut pool = AnswerPool::from_config(&config);
        pool.seed("type", json!("number"));
        assert_eq!(pool.get_str("type"), Some("string"));
    }
}
