//! Confirmation Code Value Object
//!
//! Opaque credential mailed at sign-up and presented at token exchange.
//! Never logged: `Debug` is redacted and there is no `Display`.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfirmationCode(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(ConfirmationCode::new("  abc \n").as_str(), "abc");
        assert!(ConfirmationCode::new("   ").is_empty());
    }

    #[test]
    fn test_debug_is_redacted() {
        let code = ConfirmationCode::new("secret-code");
        assert!(!format!("{:?}", code).contains("secret"));
    }
}
