use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, expiry: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            exp: (now + expiry).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Signed credential handed back by `POST /auth/tokens`
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

/// HS256 signer/verifier for bearer credentials
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            expiry: Duration::hours(expiry_hours as i64),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn issue(&self, user_id: i64) -> Result<IssuedToken, AuthError> {
        let claims = Claims::new(user_id, self.expiry);
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AuthError::TokenGeneration("expiry out of range".to_string()))?;
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}
