/// Bearer-token validation (the Authenticator collaborator)
///
/// Tokens are signed with HS256 and carry the two facts the core needs
/// about a principal: the user ID and the super-admin flag. Token issuance
/// belongs to the external identity layer; `create_token` exists for tests
/// and tooling.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(Uuid::new_v4(), false);
/// let token = create_token(&claims, "a-secret-key-at-least-32-bytes-long!")?;
///
/// let validated = validate_token(&token, "a-secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every token
const ISSUER: &str = "taskhive";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// JWT claims
///
/// - `sub`: the user ID
/// - `is_super_admin`: global super-admin flag
/// - `iss` / `iat` / `exp`: standard claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Global super-admin flag
    pub is_super_admin: bool,

    /// Issuer - always "taskhive"
    pub iss: String,

    /// Issued-at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user, valid for 24 hours
    pub fn new(user_id: Uuid, is_super_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            is_super_admin,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(24)).timestamp(),
        }
    }
}

/// Signs a token for the given claims
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token's signature, expiration and issuer
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, true);
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
        assert!(validated.is_super_admin);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = Claims::new(Uuid::new_v4(), false);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-32-bytes-long!!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            is_super_admin: false,
            iss: ISSUER.to_string(),
            iat: (now - Duration::hours(48)).timestamp(),
            exp: (now - Duration::hours(24)).timestamp(),
        };
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token("not-a-token", SECRET).is_err());
    }
}
