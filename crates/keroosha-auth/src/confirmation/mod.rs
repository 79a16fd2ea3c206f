//! Confirmation code issuance and account activation.

pub mod delivery;
pub mod service;

pub use delivery::{CodeDelivery, LogCodeDelivery};
pub use service::ConfirmationService;

use serde::{Deserialize, Serialize};

/// What a confirmation code lets its holder do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationCodeKind {
    /// Activate a freshly registered account.
    AccountConfirm,
    /// Set a new password on a confirmed account.
    ChangePassword,
}

impl ConfirmationCodeKind {
    /// Front-end route the link points at.
    pub fn path(&self) -> &'static str {
        match self {
            Self::AccountConfirm => "/confirm",
            Self::ChangePassword => "/change-password",
        }
    }

    /// Caption shown next to the link.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::AccountConfirm => "Follow the link below to confirm your account:",
            Self::ChangePassword => "Follow the link below to change your account password:",
        }
    }

    /// Full link for `code` under `base_url`.
    pub fn link(&self, base_url: &str, code: &str) -> String {
        format!("{}{}?code={}", base_url.trim_end_matches('/'), self.path(), code)
    }
}

impl std::fmt::Display for ConfirmationCodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountConfirm => write!(f, "account_confirm"),
            Self::ChangePassword => write!(f, "change_password"),
        }
    }
}
