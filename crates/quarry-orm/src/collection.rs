//! Ordered row sequences.

use std::ops::Index;

use serde::Serialize;

use crate::error::Result;
use crate::model::RowModel;

/// The rows returned by a query, in result order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RowCollection {
    rows: Vec<RowModel>,
}

impl RowCollection {
    /// Wraps already fetched rows.
    #[must_use]
    pub const fn new(rows: Vec<RowModel>) -> Self {
        Self { rows }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the first row.
    #[must_use]
    pub fn first(&self) -> Option<&RowModel> {
        self.rows.first()
    }

    /// Returns the last row.
    #[must_use]
    pub fn last(&self) -> Option<&RowModel> {
        self.rows.last()
    }

    /// Returns the row at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RowModel> {
        self.rows.get(index)
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, RowModel> {
        self.rows.iter()
    }

    /// Serializes the rows as a JSON array of attribute objects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Like [`to_json`](Self::to_json), indented.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Consumes the collection, returning the rows.
    #[must_use]
    pub fn into_vec(self) -> Vec<RowModel> {
        self.rows
    }
}

impl Index<usize> for RowCollection {
    type Output = RowModel;

    fn index(&self, index: usize) -> &RowModel {
        &self.rows[index]
    }
}

impl FromIterator<RowModel> for RowCollection {
    fn from_iter<I: IntoIterator<Item = RowModel>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RowCollection {
    type Item = RowModel;
    type IntoIter = std::vec::IntoIter<RowModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowCollection {
    type Item = &'a RowModel;
    type IntoIter = std::slice::Iter<'a, RowModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
