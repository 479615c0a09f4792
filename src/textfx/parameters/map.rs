//! Ordered parameter map

use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Ordered, deduplicated key/value pairs of one tag.
///
/// Insertion order is kept, and the first value for a key wins. The bare leading value of a
/// tag is stored under the empty key, see [ParameterMap::default_value].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, String)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether the pair was kept.
    pub(crate) fn insert_first(&mut self, key: String, value: String) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// The unnamed leading value (`<speed=2>`, `<speed 2>`).
    pub fn default_value(&self) -> Option<&str> {
        self.get("")
    }

    /// First alias present in the map, with its value.
    pub fn get_any<'a>(&'a self, aliases: &[&'a str]) -> Option<(&'a str, &'a str)> {
        aliases
            .iter()
            .find_map(|alias| self.get(alias).map(|value| (*alias, value)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParameterMap::new();
        for (key, value) in iter {
            map.insert_first(key.into(), value.into());
        }
        map
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl fmt::Display for ParameterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if key.is_empty() {
                write!(f, "={}", value)?;
            } else {
                write!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_wins() {
        let map: ParameterMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some("1"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_get_any_uses_alias_order() {
        let map: ParameterMap = [("uptime", "1"), ("up", "2")].into_iter().collect();
        assert_eq!(map.get_any(&["up", "uptime"]), Some(("up", "2")));
        assert_eq!(map.get_any(&["down", "downtime"]), None);
    }

    #[test]
    fn test_display() {
        let map: ParameterMap = [("", "2"), ("amp", "3")].into_iter().collect();
        assert_eq!(map.to_string(), "=2 amp=3");
    }
}
