pub mod composer;
pub mod counter;
pub mod guard;
pub mod principal;

pub use composer::{CardCountBucket, CardOrder, CardPagination, Paged, Pagination};
pub use counter::CounterMaintainer;
pub use guard::{parse_positive_id, GuardMode, SetGuard};
pub use principal::{Principal, PrincipalResolver};
