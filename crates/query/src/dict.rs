//! Attribute-style read access over response data.

use serde_json::Value;
use std::fmt;

static NULL: Value = Value::Null;

/// A borrowed view over JSON data where missing keys read as empty instead
/// of failing, so deep paths can be chained without checks.
///
/// ```
/// use graphql_query::Dict;
/// use serde_json::json;
///
/// let data = json!({"repository": {"owner": {"login": "juliuscaeser"}}});
/// let dict = Dict::new(&data);
///
/// assert_eq!(dict.get("repository").get("owner").get("login").as_str(), Some("juliuscaeser"));
/// assert_eq!(dict.path("repository.owner.login").as_str(), Some("juliuscaeser"));
/// assert!(dict.get("missing").get("deeper").is_empty());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Dict<'a> {
    value: &'a Value,
}

impl<'a> Dict<'a> {
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Reads a key of an object. Anything else yields an empty view.
    #[must_use]
    pub fn get(&self, key: &str) -> Dict<'a> {
        Dict::new(self.value.get(key).unwrap_or(&NULL))
    }

    /// Reads an element of an array. Anything else yields an empty view.
    #[must_use]
    pub fn index(&self, index: usize) -> Dict<'a> {
        Dict::new(self.value.get(index).unwrap_or(&NULL))
    }

    /// Follows a dot-separated path; numeric segments index into arrays.
    #[must_use]
    pub fn path(&self, path: &str) -> Dict<'a> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .fold(*self, |view, segment| match segment.parse::<usize>() {
                Ok(i) if view.value.is_array() => view.index(i),
                _ => view.get(segment),
            })
    }

    /// True for null, and for empty objects, arrays and strings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self.value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Iterates the elements of an array view.
    pub fn iter(&self) -> impl Iterator<Item = Dict<'a>> + 'a {
        let value = self.value;
        value
            .as_array()
            .map(|items| items.iter())
            .into_iter()
            .flatten()
            .map(Dict::new)
    }

    /// Object keys, in response order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let value = self.value;
        value
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_bool()
    }

    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl<'a> From<&'a Value> for Dict<'a> {
    fn from(value: &'a Value) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Dict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.value, f)
    }
}

impl fmt::Display for Dict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_are_empty() {
        let data = json!({"a": 1});
        let dict = Dict::new(&data);
        assert!(dict.get("b").is_empty());
        assert!(dict.get("a").get("b").is_empty());
        assert!(!dict.get("a").is_empty());
        assert_eq!(dict.get("a").as_i64(), Some(1));
    }

    #[test]
    fn test_path_through_arrays() {
        let data = json!({"repos": [{"title": "xxx"}, {"title": "yyy"}]});
        let dict = Dict::new(&data);
        assert_eq!(dict.path("repos.1.title").as_str(), Some("yyy"));
        assert!(dict.path("repos.9.title").is_empty());
    }

    #[test]
    fn test_iter_and_keys() {
        let data = json!({"repos": [{"title": "xxx"}], "count": 1});
        let dict = Dict::new(&data);
        let titles: Vec<_> = dict
            .get("repos")
            .iter()
            .filter_map(|repo| repo.get("title").as_str())
            .collect();
        assert_eq!(titles, ["xxx"]);
        assert_eq!(dict.keys().collect::<Vec<_>>(), ["repos", "count"]);
        assert_eq!(dict.get("count").iter().count(), 0);
    }
}
