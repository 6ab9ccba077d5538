//! Per-attribute getters and setters.
//!
//! A getter intercepts reads of one attribute. It receives the stored value
//! when the row has one, or the whole row when it does not, which lets a
//! getter compute a virtual attribute from other columns. A setter
//! intercepts writes to an attribute the row already has and may rewrite
//! any part of the attribute map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use quarry_core::{Attributes, SqlValue};

use crate::model::RowModel;

/// What a getter is handed.
#[derive(Debug, Clone, Copy)]
pub enum GetterInput<'a> {
    /// The stored raw value of the attribute.
    Stored(&'a SqlValue),
    /// The row, for attributes the row does not store.
    Row(&'a RowModel),
}

impl<'a> GetterInput<'a> {
    /// Returns the stored value, if any.
    #[must_use]
    pub const fn stored(self) -> Option<&'a SqlValue> {
        match self {
            Self::Stored(value) => Some(value),
            Self::Row(_) => None,
        }
    }
}

type Getter = dyn Fn(GetterInput<'_>) -> SqlValue + Send + Sync;
type Setter = dyn Fn(&mut Attributes, SqlValue) + Send + Sync;

/// Getter and setter registry for one model.
#[derive(Clone, Default)]
pub struct Accessors {
    getters: HashMap<String, Arc<Getter>>,
    setters: HashMap<String, Arc<Setter>>,
}

impl Accessors {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the getter of `attribute`.
    #[must_use]
    pub fn getter<F>(mut self, attribute: &str, getter: F) -> Self
    where
        F: Fn(GetterInput<'_>) -> SqlValue + Send + Sync + 'static,
    {
        self.getters.insert(attribute.to_string(), Arc::new(getter));
        self
    }

    /// Registers the setter of `attribute`.
    #[must_use]
    pub fn setter<F>(mut self, attribute: &str, setter: F) -> Self
    where
        F: Fn(&mut Attributes, SqlValue) + Send + Sync + 'static,
    {
        self.setters.insert(attribute.to_string(), Arc::new(setter));
        self
    }

    /// Returns whether no accessor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.getters.is_empty() && self.setters.is_empty()
    }

    pub(crate) fn get(&self, attribute: &str, input: GetterInput<'_>) -> Option<SqlValue> {
        self.getters.get(attribute).map(|getter| getter(input))
    }

    pub(crate) fn has_getter(&self, attribute: &str) -> bool {
        self.getters.contains_key(attribute)
    }

    /// Runs the setter of `attribute`; returns false when none exists.
    pub(crate) fn set(&self, attribute: &str, attributes: &mut Attributes, value: SqlValue) -> bool {
        match self.setters.get(attribute) {
            Some(setter) => {
                setter(attributes, value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut getters: Vec<&str> = self.getters.keys().map(String::as_str).collect();
        let mut setters: Vec<&str> = self.setters.keys().map(String::as_str).collect();
        getters.sort_unstable();
        setters.sort_unstable();
        f.debug_struct("Accessors")
            .field("getters", &getters)
            .field("setters", &setters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dispatch() {
        let accessors = Accessors::new()
            .getter("name", |input| match input.stored() {
                Some(SqlValue::Text(s)) => SqlValue::Text(s.to_uppercase()),
                _ => SqlValue::Null,
            })
            .setter("name", |attrs, value| {
                attrs.insert("name".into(), SqlValue::Text(format!("{value}").trim().to_string()));
            });

        let stored = SqlValue::Text("bolt".into());
        assert_eq!(
            accessors.get("name", GetterInput::Stored(&stored)),
            Some(SqlValue::Text("BOLT".into()))
        );
        assert_eq!(accessors.get("qty", GetterInput::Stored(&stored)), None);

        let mut attrs = Attributes::new();
        assert!(accessors.set("name", &mut attrs, SqlValue::Text("  nut ".into())));
        assert_eq!(attrs.get("name"), Some(&SqlValue::Text("nut".into())));
        assert!(!accessors.set("qty", &mut attrs, SqlValue::Int(1)));
        assert!(!accessors.is_empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let accessors = Accessors::new().getter("b", |_| SqlValue::Null).getter("a", |_| SqlValue::Null);
        assert_eq!(
            format!("{accessors:?}"),
            r#"Accessors { getters: ["a", "b"], setters: [] }"#
        );
    }
}
