// Public handlers need no credential; protected ones sit behind
// `jwt_auth_middleware` and receive the resolved `Principal`.
pub mod protected;
pub mod public;
