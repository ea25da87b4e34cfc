//! Authentication Models
//!
//! Access token claims and the authenticated identity derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type carried by every access token
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject - user ID
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID - unique token identifier
    pub jti: String,

    /// Token type (always "access" for access tokens)
    #[serde(rename = "type")]
    pub token_type: String,
}

impl AccessTokenClaims {
    /// Create new access token claims
    pub fn new(user_id: i64, expires_at: DateTime<Utc>, issued_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }
}

/// Identity of the caller, established before any service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Id of the authenticated user
    pub user_id: i64,

    /// JWT ID of the token that authenticated the request
    pub token_id: String,

    /// When the authenticating token stops being valid
    pub expires_at: DateTime<Utc>,
}

impl UserContext {
    /// Build the context from validated access token claims
    pub fn from_access_claims(claims: &AccessTokenClaims) -> Result<Self, std::num::ParseIntError> {
        let user_id = claims.sub.parse::<i64>()?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        Ok(Self {
            user_id,
            token_id: claims.jti.clone(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_access_claims_round_trip_into_context() {
        let now = Utc::now();
        let claims = AccessTokenClaims::new(42, now + Duration::hours(1), now);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.token_type, ACCESS_TOKEN_TYPE);

        let context = UserContext::from_access_claims(&claims).unwrap();
        assert_eq!(context.user_id, 42);
        assert_eq!(context.token_id, claims.jti);
        assert_eq!(context.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_context_rejects_non_numeric_subject() {
        let now = Utc::now();
        let mut claims = AccessTokenClaims::new(1, now + Duration::hours(1), now);
        claims.sub = "not-a-number".to_string();

        assert!(UserContext::from_access_claims(&claims).is_err());
    }
}
