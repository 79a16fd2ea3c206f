//! Email normalization and credential policy checks.

use std::sync::LazyLock;

use regex::Regex;

use keroosha_core::config::AuthConfig;
use keroosha_core::{ErrorCode, OpResult};

/// Permissive email shape: something@something.tld, tld of two or three letters.
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w.-]+@.+\.[a-z]{2,3}").expect("email pattern is a valid regex")
});

/// Validates the credentials supplied at registration and reset.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    /// Minimum password length, in characters.
    min_password_length: usize,
}

impl CredentialPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_password_length: config.password_min_length,
        }
    }

    /// Trims and lowercases an email.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Normalizes `email` and checks its shape.
    pub fn validate_email(&self, email: &str) -> OpResult<String> {
        let email = Self::normalize_email(email);
        if email.is_empty() || !EMAIL_SHAPE.is_match(&email) {
            return Err(ErrorCode::InvalidEmail);
        }
        Ok(email)
    }

    /// Rejects blank passwords and passwords shorter than the minimum.
    pub fn validate_password(&self, password: &str) -> OpResult<()> {
        if password.trim().is_empty() || password.chars().count() < self.min_password_length {
            return Err(ErrorCode::WeakPassword);
        }
        Ok(())
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self::new(&AuthConfig::default())
    }
}
