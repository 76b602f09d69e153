//! Read-only configuration store.
//!
//! The dispatch engine reads a handful of runtime settings: the
//! `modules_{hook}` bindings, the admin-action list, and the front-page
//! default. It never writes configuration; [`ConfigStore`] is the
//! read-only seam and [`MapConfig`] the in-memory implementation.

use std::collections::HashMap;

/// Read-only key/value lookup.
pub trait ConfigStore {
    /// Looks up a raw setting value.
    fn get(&self, key: &str) -> Option<&str>;

    /// Looks up a comma-separated list setting, trimming whitespace and
    /// dropping empty items. A missing key yields an empty list.
    fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Settings held in a plain map.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, returning `self` for chaining at construction time.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Sets a value on an existing store.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the store holds no settings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigStore for MapConfig {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let config = MapConfig::new().with("modules_display", "drafts,calendar");
        assert_eq!(config.get("modules_display"), Some("drafts,calendar"));
        assert_eq!(config.get("modules_post"), None);
    }

    #[test]
    fn test_get_list() {
        let config = MapConfig::new().with("modules_display", " drafts, calendar ,, ");
        assert_eq!(config.get_list("modules_display"), vec!["drafts", "calendar"]);
        assert!(config.get_list("missing").is_empty());
    }

    #[test]
    fn test_from_iter() {
        let config: MapConfig = [("a".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(config.get("a"), Some("1"));
        assert_eq!(config.len(), 1);
    }
}
