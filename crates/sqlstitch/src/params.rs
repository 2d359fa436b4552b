//! Named parameter storage.

use crate::adapter::Adapter;
use crate::ident::sanitize_param_name;
use crate::value::Value;
use indexmap::IndexMap;

/// Insertion-ordered `label -> value` map handed to a prepared statement.
pub type ParamMap = IndexMap<String, Value>;

/// Parameter values keyed by name.
///
/// Names passed through [`ParameterStore::set`], [`ParameterStore::get`] and
/// [`ParameterStore::remove`] are sanitized; [`ParameterStore::insert_raw`] stores the key as
/// given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    values: IndexMap<String, Value>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under the sanitized `name`, overwriting any previous value.
    /// Returns the sanitized key.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> String {
        let key = sanitize_param_name(name);
        self.values.insert(key.clone(), value.into());
        key
    }

    /// Store `value` under `key` verbatim.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&sanitize_param_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(&sanitize_param_name(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored keys and values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All parameters keyed by the adapter's label for each name.
    pub fn labeled(&self, adapter: &dyn Adapter) -> ParamMap {
        self.values
            .iter()
            .map(|(k, v)| (adapter.make_parameter_label(k), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::OfflineAdapter;

    #[test]
    fn overwrite_returns_latest() {
        let mut p = ParameterStore::new();
        p.set("status", "draft");
        p.set("status", "published");
        assert_eq!(p.get("status"), Some(&Value::Text("published".into())));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn sanitized_on_store_and_lookup() {
        let mut p = ParameterStore::new();
        assert_eq!(p.set("u.id", 5), "uid");
        assert_eq!(p.get("uid"), Some(&Value::Int(5)));
        assert_eq!(p.get("u.id"), Some(&Value::Int(5)));
        assert_eq!(p.get("u-i-d"), Some(&Value::Int(5)));
        assert_eq!(p.remove("u.id"), Some(Value::Int(5)));
        assert!(p.is_empty());
    }

    #[test]
    fn raw_keys_are_not_sanitized() {
        let mut p = ParameterStore::new();
        p.insert_raw("u.id", Value::Int(1));
        assert_eq!(p.get("u.id"), None);
        assert_eq!(p.iter().next(), Some(("u.id", &Value::Int(1))));
    }

    #[test]
    fn labeled_uses_adapter_labels() {
        let mut p = ParameterStore::new();
        p.set("a", 1);
        p.set("b", "x");
        let labeled = p.labeled(&OfflineAdapter::default());
        let keys: Vec<_> = labeled.keys().cloned().collect();
        assert_eq!(keys, vec![":a", ":b"]);
    }
}
