use thiserror::Error;

use super::types::{Column, Table};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Column {column:?} does not belong to table {table}")]
    ForeignColumn { column: Column, table: &'static str },

    #[error("Substring match needs at least one column")]
    EmptyColumnList,

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),
}

impl FilterError {
    pub fn foreign(column: Column, table: Table) -> Self {
        FilterError::ForeignColumn { column, table: table.name() }
    }
}
