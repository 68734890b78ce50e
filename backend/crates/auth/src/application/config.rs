//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for confirmation codes (32 bytes)
    pub confirmation_secret: [u8; 32],
    /// Length of one confirmation time window
    pub confirmation_window: Duration,
    /// Number of windows a code stays valid (current one included)
    pub confirmation_max_windows: u32,
    /// JWT signing secret
    pub jwt_secret: Vec<u8>,
    /// JWT `iss` claim
    pub jwt_issuer: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Sender address on outgoing mail
    pub mail_from: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            confirmation_secret: [0u8; 32],
            confirmation_window: Duration::from_secs(3600), // 1 hour
            confirmation_max_windows: 72,                   // 3 days
            jwt_secret: Vec::new(),
            jwt_issuer: "review-api".to_string(),
            access_token_ttl: Duration::from_secs(24 * 3600), // 1 day
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            mail_from: "noreply@review-api.local".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secret() -> Self {
        let mut confirmation_secret = [0u8; 32];
        confirmation_secret.copy_from_slice(&platform::crypto::random_bytes(32));
        Self {
            confirmation_secret,
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (short-lived codes are annoying locally)
    pub fn development() -> Self {
        Self {
            confirmation_max_windows: 24 * 7,
            ..Self::with_random_secret()
        }
    }

    /// Total confirmation code lifetime
    pub fn confirmation_ttl(&self) -> Duration {
        self.confirmation_window * self.confirmation_max_windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.confirmation_secret, b.confirmation_secret);
        assert_ne!(a.jwt_secret, b.jwt_secret);
        assert_eq!(a.jwt_secret.len(), 32);
    }

    #[test]
    fn test_default_confirmation_ttl_is_three_days() {
        assert_eq!(
            AuthConfig::default().confirmation_ttl(),
            Duration::from_secs(72 * 3600)
        );
    }
}
