pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{Claims, IssuedToken, TokenService};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT token expired")]
    Expired,

    #[error("Password hashing error: {0}")]
    Hashing(String),
}
