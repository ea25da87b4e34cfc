//! JWT Access Token Service
//!
//! Validates bearer tokens to learn who the caller is. Tokens are signed with
//! a shared HS256 secret by whichever system authenticates users; this
//! service keeps no sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::models::{AccessTokenClaims, UserContext, ACCESS_TOKEN_TYPE};

/// Errors raised while issuing or validating tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// Token could not be signed
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    /// Token is malformed, expired, wrongly signed or of the wrong type
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;

/// JWT service for access token validation
#[derive(Clone)]
pub struct JwtService {
    /// JWT access token secret
    access_secret: String,
    /// Lifetime of tokens minted by `issue_access_token` (default: 1 hour)
    access_token_expires_in: Duration,
}

impl JwtService {
    /// Create a new JWT service instance
    pub fn new(access_secret: String) -> Self {
        Self {
            access_secret,
            access_token_expires_in: Duration::hours(1),
        }
    }

    /// Create a new JWT service with a custom token lifetime
    pub fn with_expiration(access_secret: String, access_expires_in: Duration) -> Self {
        Self {
            access_secret,
            access_token_expires_in: access_expires_in,
        }
    }

    /// Mint an access token for a user id with the shared secret
    pub fn issue_access_token(&self, user_id: i64) -> TokenResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims::new(user_id, now + self.access_token_expires_in, now);
        self.encode_access_token(&claims)
    }

    /// Validate an access token and extract user context
    pub fn validate_access_token(&self, token: &str) -> TokenResult<UserContext> {
        let claims = self.decode_access_token(token)?;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(TokenError::InvalidToken("Not an access token".into()));
        }

        UserContext::from_access_claims(&claims)
            .map_err(|_| TokenError::InvalidToken("Invalid user ID in token".into()))
    }

    /// Encode an access token with the given claims
    fn encode_access_token(&self, claims: &AccessTokenClaims) -> TokenResult<String> {
        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.access_secret.as_ref());

        encode(&header, claims, &encoding_key)
            .map_err(|e| TokenError::TokenGeneration(e.to_string()))
    }

    /// Decode and validate an access token
    fn decode_access_token(&self, token: &str) -> TokenResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.access_secret.as_ref());

        decode::<AccessTokenClaims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))
    }
}
