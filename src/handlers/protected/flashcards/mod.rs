pub mod card;
pub mod search;
pub mod set;
pub mod utils;

pub use card::{card_delete, card_get, card_patch, card_post};
pub use search::search_get;
pub use set::{set_delete, set_get, set_patch, set_post};
