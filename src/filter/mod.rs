pub mod error;
pub mod evaluate;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod types;

pub use error::FilterError;
pub use evaluate::{FieldValue, Filterable};
pub use filter::Filter;
pub use types::*;
