pub mod me;
pub mod my_sets;
pub mod profile;

pub use me::{me_get, me_patch, password_patch};
pub use my_sets::my_sets_get;
pub use profile::profile_get;
