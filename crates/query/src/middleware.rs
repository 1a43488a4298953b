//! Post-fetch transforms.
//!
//! A [`Client`](crate::Client) applies its middleware left to right to the
//! `data` of every successful response before handing it to the caller.

use crate::{Error, Query, Result};
use serde_json::Value;

/// A transform over successfully fetched data.
pub trait Middleware: Send + Sync {
    /// Returns the data that replaces `data`. `root` is the document root
    /// the data was fetched for.
    fn pre_response(&self, data: Value, root: &Query) -> Result<Value>;
}

impl<F> Middleware for F
where
    F: Fn(Value, &Query) -> Result<Value> + Send + Sync,
{
    fn pre_response(&self, data: Value, root: &Query) -> Result<Value> {
        self(data, root)
    }
}

/// Returns data unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Middleware for Identity {
    fn pre_response(&self, data: Value, _root: &Query) -> Result<Value> {
        Ok(data)
    }
}

/// Unwraps the single-field envelope: returns `data[name]` where `name` is
/// the root's first selection.
///
/// `{"repos": [...]}` fetched for `query { repos { ... } }` becomes `[...]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSubscript;

impl Middleware for AutoSubscript {
    fn pre_response(&self, mut data: Value, root: &Query) -> Result<Value> {
        let key = root
            .first_selection_name()
            .ok_or_else(|| Error::Middleware("auto-subscript: root selects nothing".to_string()))?;
        data.get_mut(&key)
            .map(Value::take)
            .ok_or_else(|| Error::Middleware(format!("auto-subscript: response has no key '{key}'")))
    }
}

/// Leaves data untouched; pair it with [`Dict`](crate::Dict) to read the
/// result by attribute-style paths.
///
/// Rejects data that is not a JSON object or array, which a [`Dict`](crate::Dict)
/// view could only ever show as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictView;

impl Middleware for DictView {
    fn pre_response(&self, data: Value, _root: &Query) -> Result<Value> {
        match data {
            Value::Object(_) | Value::Array(_) => Ok(data),
            other => Err(Error::Middleware(format!(
                "dict view: expected an object or array, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root_selecting(name: &str) -> Query {
        let root = Query::new();
        root.field(name).values(["title"]).unwrap();
        root
    }

    #[test]
    fn test_identity() {
        let data = json!({"a": 1});
        assert_eq!(Identity.pre_response(data.clone(), &Query::new()).unwrap(), data);
    }

    #[test]
    fn test_auto_subscript_unwraps_list() {
        let data = json!({"repos": [{"title": "xxx"}]});
        let result = AutoSubscript
            .pre_response(data, &root_selecting("repos"))
            .unwrap();
        assert_eq!(result, json!([{"title": "xxx"}]));
    }

    #[test]
    fn test_auto_subscript_missing_key() {
        let err = AutoSubscript
            .pre_response(json!({"other": 1}), &root_selecting("repos"))
            .unwrap_err();
        assert!(matches!(err, Error::Middleware(_)));
    }

    #[test]
    fn test_auto_subscript_empty_root() {
        let err = AutoSubscript
            .pre_response(json!({}), &Query::new())
            .unwrap_err();
        assert!(matches!(err, Error::Middleware(_)));
    }

    #[test]
    fn test_closure_middleware() {
        let count = |data: Value, _root: &Query| -> Result<Value> {
            Ok(json!(data.as_object().map_or(0, serde_json::Map::len)))
        };
        assert_eq!(
            count.pre_response(json!({"a": 1, "b": 2}), &Query::new()).unwrap(),
            json!(2)
        );
    }

    #[test]
    fn test_dict_view() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(DictView.pre_response(data.clone(), &Query::new()).unwrap(), data);
        assert!(DictView.pre_response(json!(1), &Query::new()).is_err());
    }
}
