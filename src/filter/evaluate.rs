//! In-process evaluation of a [`Filter`](super::Filter), mirroring the SQL it
//! compiles to. Used by the in-memory store so both backends answer the same
//! filter object the same way.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::types::{Column, OrderTerm, Param, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(&'a str),
    Time(DateTime<Utc>),
}

impl<'a> FieldValue<'a> {
    fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Rows that can be filtered and sorted by column
pub trait Filterable {
    fn field(&self, column: Column) -> Option<FieldValue<'_>>;
}

impl Predicate {
    pub fn matches<R: Filterable>(&self, row: &R) -> bool {
        match self {
            Predicate::Eq(column, Param::Int(expected)) => {
                row.field(*column).and_then(|v| v.as_int()) == Some(*expected)
            }
            Predicate::Eq(column, Param::Text(expected)) => {
                row.field(*column).and_then(|v| v.as_text()) == Some(expected.as_str())
            }
            Predicate::Contains(columns, needle) => {
                let needle = needle.to_lowercase();
                columns.iter().any(|column| {
                    row.field(*column)
                        .and_then(|v| v.as_text())
                        .map(|text| text.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            }
            Predicate::Lt(column, bound) => row.field(*column).and_then(|v| v.as_int()).map_or(false, |v| v < *bound),
            Predicate::Gte(column, bound) => row.field(*column).and_then(|v| v.as_int()).map_or(false, |v| v >= *bound),
        }
    }
}

impl OrderTerm {
    pub fn compare<R: Filterable>(&self, a: &R, b: &R) -> Ordering {
        match self {
            OrderTerm::Column(column, direction) => {
                let ordering = match (a.field(*column), b.field(*column)) {
                    (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.to_lowercase().cmp(&y.to_lowercase()),
                    (x, y) => x.cmp(&y),
                };
                match direction {
                    super::types::SortDirection::Asc => ordering,
                    super::types::SortDirection::Desc => ordering.reverse(),
                }
            }
            OrderTerm::ExactMatch(column, value) => {
                let value = value.to_lowercase();
                let key = |row: &R| text_of(row, *column).map_or(false, |t| t.to_lowercase() == value);
                // true sorts first
                key(b).cmp(&key(a))
            }
            OrderTerm::PrefixMatch(column, value) => {
                let value = value.to_lowercase();
                let key = |row: &R| text_of(row, *column).map_or(false, |t| t.to_lowercase().starts_with(&value));
                key(b).cmp(&key(a))
            }
        }
    }
}

fn text_of<R: Filterable>(row: &R, column: Column) -> Option<&str> {
    row.field(column).and_then(|v| v.as_text())
}
