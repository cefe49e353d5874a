use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::claims::{UserClaims, UserContext};
use crate::domain::account::Account;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token could not be signed: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid(jsonwebtoken::errors::Error),
    #[error("token subject is not an account id")]
    Subject,
}

/// Response body of `accounts/token/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Signs and verifies HS256 access tokens with keys derived once from the secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: ttl_minutes.max(1) * 60,
        }
    }

    pub fn issue(&self, account: &Account) -> Result<IssuedToken, TokenError> {
        let iat = now_secs();
        let claims = UserClaims {
            sub: account.id.to_string(),
            name: account.username.clone(),
            iat,
            exp: iat + self.ttl_secs,
        };
        let access = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)?;
        Ok(IssuedToken {
            access,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_secs,
        })
    }

    pub fn verify(&self, token: &str) -> Result<UserContext, TokenError> {
        let data = decode::<UserClaims>(token, &self.decoding, &self.validation).map_err(TokenError::Invalid)?;
        UserContext::from_claims(data.claims).ok_or(TokenError::Subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account() -> Account {
        Account {
            id: 7,
            username: "asha".into(),
            email: "asha@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            college: String::new(),
            branch: String::new(),
            graduation_year: None,
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let service = TokenService::new("test-secret", 60);
        let token = service.issue(&account()).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let context = service.verify(&token.access).unwrap();
        assert_eq!(context.account_id, 7);
        assert_eq!(context.username, "asha");
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let token = TokenService::new("one", 60).issue(&account()).unwrap();
        assert!(matches!(
            TokenService::new("two", 60).verify(&token.access),
            Err(TokenError::Invalid(_))
        ));
        assert!(TokenService::new("one", 60).verify("garbage").is_err());
    }
}
