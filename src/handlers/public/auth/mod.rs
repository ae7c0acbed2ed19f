pub mod register;
pub mod tokens;
pub mod utils;

pub use register::register_post;
pub use tokens::tokens_post;
