//! JWT issuing and verification

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Which credential a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User UUID
    pub sub: String,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// Access + refresh pair handed out by the token exchange
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            issuer: config.jwt_issuer.clone(),
            access_ttl_secs: config.access_token_ttl.as_secs() as i64,
            refresh_ttl_secs: config.refresh_token_ttl.as_secs() as i64,
        }
    }

    pub fn issue_pair(&self, user_id: &UserId) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenType::Access)?,
            refresh: self.issue(user_id, TokenType::Refresh)?,
        })
    }

    pub fn issue(&self, user_id: &UserId, token_type: TokenType) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            exp: now + ttl,
            iat: now,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature, issuer, expiry and token type
    ///
    /// Returns `None` for anything that does not check out; callers choose
    /// which error that becomes.
    pub fn verify(&self, token: &str, expected: TokenType) -> Option<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) if data.claims.token_type == expected => Some(data.claims),
            Ok(_) => {
                tracing::debug!(expected = ?expected, "Token type mismatch");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Token rejected");
                None
            }
        }
    }
}
