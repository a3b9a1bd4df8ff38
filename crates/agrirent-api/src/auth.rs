//! Caller identity from HS256 bearer tokens.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use agrirent_core::config::AuthConfig;
use agrirent_core::error::AppError;
use agrirent_core::types::UserId;

/// Claims carried by a caller token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Verifies caller tokens.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate `token` and return the caller it identifies.
    pub fn verify(&self, token: &str) -> Result<UserId, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Caller token rejected");
            AppError::authentication("Invalid or expired token")
        })?;

        let user = UserId::new(data.claims.sub);
        if user.is_blank() {
            return Err(AppError::authentication("Token has no subject"));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            leeway_seconds: 0,
        }
    }

    fn token(secret: &str, sub: &str, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as u64;
        let claims = Claims {
            sub: sub.into(),
            exp,
            iat: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let verifier = JwtVerifier::new(&config());
        let user = verifier.verify(&token("test-secret", "U1", 600)).unwrap();
        assert_eq!(user, UserId::new("U1"));
    }

    #[test]
    fn test_rejects_bad_tokens() {
        let verifier = JwtVerifier::new(&config());
        assert!(verifier.verify(&token("other-secret", "U1", 600)).is_err());
        assert!(verifier.verify(&token("test-secret", "U1", -600)).is_err());
        assert!(verifier.verify(&token("test-secret", "", 600)).is_err());
        assert!(verifier.verify("garbage").is_err());
    }
}
