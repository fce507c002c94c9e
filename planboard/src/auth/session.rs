//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AuthFailure, Error},
    types::UserId,
};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // Subject (numeric user ID)
    pub iat: i64,    // Issued at
    pub exp: i64,    // Expiration time
}

impl SessionClaims {
    pub fn new(user_id: UserId, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.jwt_expiry;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })
}

/// Create a JWT token for a user session
pub fn create_session_token(user_id: UserId, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(user_id, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());

    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify a JWT session token and return the user it was issued to
pub fn verify_session_token(token: &str, config: &Config) -> Result<UserId, Error> {
    use jsonwebtoken::errors::ErrorKind;

    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        // Client errors (401) - malformed tokens, invalid claims, expired tokens
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => Error::Unauthenticated {
            reason: AuthFailure::InvalidToken,
        },

        // Server errors (500) - key issues, internal failures
        ErrorKind::InvalidEcdsaKey
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::RsaFailedSigning
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat
        | ErrorKind::MissingAlgorithm
        | ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },

        _ => Error::Internal {
            operation: format!("JWT verification (unknown error): {e}"),
        },
    })?;

    token_data.claims.sub.parse::<UserId>().map_err(|_| Error::Unauthenticated {
        reason: AuthFailure::InvalidSubject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;

    fn encode_claims(claims: &SessionClaims, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_create_and_verify_session_token() {
        let config = create_test_config();

        let token = create_session_token(42, &config).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify_session_token(&token, &config).unwrap(), 42);
    }

    #[test]
    fn test_claims_use_configured_expiry() {
        let config = create_test_config();
        let claims = SessionClaims::new(7, &config);

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.exp - claims.iat, config.auth.jwt_expiry.as_secs() as i64);
    }

    #[test]
    fn test_verify_garbage_token() {
        let config = create_test_config();
        assert!(matches!(
            verify_session_token("invalid.token.here", &config),
            Err(Error::Unauthenticated {
                reason: AuthFailure::InvalidToken
            })
        ));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let mut config = create_test_config();
        let token = create_session_token(1, &config).unwrap();

        config.secret_key = Some("different-secret".to_string());
        assert!(matches!(
            verify_session_token(&token, &config),
            Err(Error::Unauthenticated {
                reason: AuthFailure::InvalidToken
            })
        ));
    }

    #[test]
    fn test_verify_expired_token() {
        let config = create_test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode_claims(&claims, config.secret_key.as_deref().unwrap());

        assert!(matches!(
            verify_session_token(&token, &config),
            Err(Error::Unauthenticated {
                reason: AuthFailure::InvalidToken
            })
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let config = create_test_config();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "alice".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode_claims(&claims, config.secret_key.as_deref().unwrap());

        assert!(matches!(
            verify_session_token(&token, &config),
            Err(Error::Unauthenticated {
                reason: AuthFailure::InvalidSubject
            })
        ));
    }

    #[test]
    fn test_missing_secret_is_internal() {
        let mut config = create_test_config();
        config.secret_key = None;
        assert!(matches!(create_session_token(1, &config), Err(Error::Internal { .. })));
    }
}
