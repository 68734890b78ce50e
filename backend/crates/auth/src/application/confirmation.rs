//! Confirmation Code Issuer/Verifier
//!
//! A code is `HMAC-SHA256(secret, state_hash(user) || window)` truncated to
//! [`CODE_BYTES`] and encoded as unpadded URL-safe base64. Nothing is stored:
//! the verifier recomputes the code for the current window and the preceding
//! `max_windows - 1` windows. Because the state hash covers every persisted
//! user field, any change to the account invalidates codes issued before it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64_url, hmac_sha256, hmac_sha256_verify, to_base64_url};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::confirmation_code::ConfirmationCode;

/// Truncated MAC length (120 bits, 20 base64 characters)
pub const CODE_BYTES: usize = 15;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct ConfirmationCodes {
    secret: [u8; 32],
    window_secs: i64,
    max_windows: u32,
    clock: Arc<dyn Clock>,
}

impl ConfirmationCodes {
    pub fn new(secret: [u8; 32], window: Duration, max_windows: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            window_secs: (window.as_secs() as i64).max(1),
            max_windows: max_windows.max(1),
            clock,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.confirmation_secret,
            config.confirmation_window,
            config.confirmation_max_windows,
            Arc::new(SystemClock),
        )
    }

    /// Issue the code for the user's current state and the current window
    pub fn issue(&self, user: &User) -> ConfirmationCode {
        let window = self.current_window();
        let mac = hmac_sha256(&self.secret, &[&user.state_hash(), &window.to_be_bytes()]);
        ConfirmationCode::new(to_base64_url(&mac[..CODE_BYTES]))
    }

    /// Check a presented code against the user's current state
    ///
    /// Never errors: malformed input is simply `false`.
    pub fn verify(&self, user: &User, code: &ConfirmationCode) -> bool {
        let Ok(tag) = from_base64_url(code.as_str()) else {
            return false;
        };
        if tag.len() != CODE_BYTES {
            return false;
        }

        let state = user.state_hash();
        let current = self.current_window();
        let oldest = current - i64::from(self.max_windows) + 1;

        // Evaluate every window so timing does not reveal which one matched
        (oldest..=current).fold(false, |matched, window| {
            let ok = hmac_sha256_verify(&self.secret, &[&state, &window.to_be_bytes()], &tag);
            matched | ok
        })
    }

    fn current_window(&self) -> i64 {
        self.clock.now().timestamp().div_euclid(self.window_secs)
    }
}

impl std::fmt::Debug for ConfirmationCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationCodes")
            .field("window_secs", &self.window_secs)
            .field("max_windows", &self.max_windows)
            .finish_non_exhaustive()
    }
}
