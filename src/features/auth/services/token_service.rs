use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Claims, TokenUse};
use crate::features::users::models::User;

/// Minimum acceptable size for the JWT secret in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
/// Minimum number of unique bytes expected for the JWT secret.
const MIN_UNIQUE_JWT_BYTES: usize = 8;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT_SECRET must be at least {required} bytes, but {actual} bytes were provided")]
    SecretTooShort { actual: usize, required: usize },
    #[error("JWT_SECRET must contain at least {required} unique bytes; only {actual} found")]
    SecretLowEntropy { actual: usize, required: usize },
    #[error("Failed to encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
    #[error("System clock is before the Unix epoch")]
    Clock,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Access/refresh token pair handed out at login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and verifies HS256 tokens signed with the service secret
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        let secret = config.jwt_secret.as_bytes();
        validate_secret(secret)?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            leeway: config.jwt_leeway.as_secs(),
        })
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        let subject = AuthenticatedUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        };

        Ok(TokenPair {
            access: self.issue(&subject, TokenUse::Access)?,
            refresh: self.issue(&subject, TokenUse::Refresh)?,
        })
    }

    /// Exchange a refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self.verify(refresh_token, TokenUse::Refresh)?;
        Ok(self.issue(&AuthenticatedUser::from(&claims), TokenUse::Access)?)
    }

    pub fn verify_access(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.verify(token, TokenUse::Access)?;
        Ok(AuthenticatedUser::from(&claims))
    }

    fn issue(&self, user: &AuthenticatedUser, token_use: TokenUse) -> Result<String, TokenError> {
        let now = now_secs()?;
        let ttl = match token_use {
            TokenUse::Access => self.access_ttl,
            TokenUse::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            token_use,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + ttl.as_secs(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    fn verify(&self, token: &str, expected: TokenUse) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);
        validation.iss = Some(HashSet::from([self.issuer.clone()]));
        validation.leeway = self.leeway;
        validation.validate_exp = true;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?
            .claims;

        if claims.token_use != expected {
            return Err(AppError::Unauthorized(match expected {
                TokenUse::Access => "Token is not an access token".to_string(),
                TokenUse::Refresh => "Token is not a refresh token".to_string(),
            }));
        }

        Ok(claims)
    }
}

fn validate_secret(secret: &[u8]) -> Result<(), TokenError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(TokenError::SecretTooShort {
            actual: secret.len(),
            required: MIN_JWT_SECRET_LENGTH,
        });
    }

    let unique = secret.iter().copied().collect::<HashSet<_>>().len();
    if unique < MIN_UNIQUE_JWT_BYTES {
        return Err(TokenError::SecretLowEntropy {
            actual: unique,
            required: MIN_UNIQUE_JWT_BYTES,
        });
    }

    Ok(())
}

fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use chrono::Utc;
    use uuid::Uuid;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "civiclink".to_string(),
            audience: "civiclink-api".to_string(),
            access_token_ttl: Duration::from_secs(60),
            refresh_token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn service() -> TokenService {
        TokenService::new(&config("0123456789abcdef0123456789abcdef")).unwrap()
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "budi".to_string(),
            email: "budi@example.com".to_string(),
            password_hash: String::new(),
            role,
            profile_picture: None,
            date_joined: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rejects_short_secret() {
        let err = TokenService::new(&config("too-short")).err().unwrap();
        assert!(matches!(err, TokenError::SecretTooShort { actual: 9, .. }));
    }

    #[test]
    fn test_rejects_low_entropy_secret() {
        let err = TokenService::new(&config(&"a".repeat(MIN_JWT_SECRET_LENGTH)))
            .err()
            .unwrap();
        assert!(matches!(err, TokenError::SecretLowEntropy { actual: 1, .. }));
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let user = user(UserRole::Admin);
        let pair = service.issue_pair(&user).unwrap();

        let authenticated = service.verify_access(&pair.access).unwrap();
        assert_eq!(authenticated.id, user.id);
        assert_eq!(authenticated.username, "budi");
        assert!(authenticated.is_admin());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let service = service();
        let pair = service.issue_pair(&user(UserRole::Reporter)).unwrap();

        assert!(service.verify_access(&pair.refresh).is_err());
        assert!(service.refresh(&pair.access).is_err());
    }

    #[test]
    fn test_refresh_issues_usable_access_token() {
        let service = service();
        let user = user(UserRole::Reporter);
        let pair = service.issue_pair(&user).unwrap();

        let access = service.refresh(&pair.refresh).unwrap();
        let authenticated = service.verify_access(&access).unwrap();
        assert_eq!(authenticated.id, user.id);
        assert!(!authenticated.is_admin());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = TokenService::new(&config("fedcba9876543210fedcba9876543210")).unwrap();
        let pair = other.issue_pair(&user(UserRole::Reporter)).unwrap();

        assert!(service().verify_access(&pair.access).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service().verify_access("not.a.jwt").is_err());
    }
}
