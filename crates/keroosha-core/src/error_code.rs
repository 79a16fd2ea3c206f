//! Closed catalogue of business error codes.
//!
//! Every expected failure of an identity operation is one of these
//! variants. Each carries a stable identifier (`code()`) that transports
//! can match on, and a user-presentable description.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A business failure returned on the railway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorCode {
    /// Generic lookup miss.
    #[error("Nothing was found.")]
    NotFound,
    /// Registration hit an existing login.
    #[error("A user with this email is already registered.")]
    EmailIsAlreadyRegistered,
    /// No account matches the login or code.
    #[error("No user is registered with this email.")]
    UserNotFound,
    /// The account has not completed email confirmation.
    #[error(
        "The user is not confirmed. Please check your mailbox for the link that completes registration."
    )]
    UserNotConfirmed,
    /// The account is already confirmed.
    #[error("The user is already confirmed, you can sign in.")]
    UserAlreadyConfirmed,
    /// A confirmation or reset code was requested inside the throttle window.
    #[error(
        "A confirmation link has just been sent to your email. You can request another one a little later."
    )]
    UserConfirmationEmailSentTooOften,
    /// Password verification failed.
    #[error("Wrong password.")]
    InvalidPassword,
    /// A collaborator failed unexpectedly.
    #[error("Internal error, please contact the administrator.")]
    DatabaseError,
    /// Missing credentials or insufficient roles.
    #[error("Access denied.")]
    AccessDenied,
    /// The email does not look like an email address.
    #[error("Invalid email address.")]
    InvalidEmail,
    /// The password does not satisfy the policy.
    #[error("The password is too weak.")]
    WeakPassword,
}

impl ErrorCode {
    /// Every code in the catalogue.
    pub const ALL: [ErrorCode; 11] = [
        Self::NotFound,
        Self::EmailIsAlreadyRegistered,
        Self::UserNotFound,
        Self::UserNotConfirmed,
        Self::UserAlreadyConfirmed,
        Self::UserConfirmationEmailSentTooOften,
        Self::InvalidPassword,
        Self::DatabaseError,
        Self::AccessDenied,
        Self::InvalidEmail,
        Self::WeakPassword,
    ];

    /// Stable machine identifier of this code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::EmailIsAlreadyRegistered => "EmailIsAlreadyRegistered",
            Self::UserNotFound => "UserNotFound",
            Self::UserNotConfirmed => "UserNotConfirmed",
            Self::UserAlreadyConfirmed => "UserAlreadyConfirmed",
            Self::UserConfirmationEmailSentTooOften => "UserConfirmationEmailSentTooOften",
            Self::InvalidPassword => "InvalidPassword",
            Self::DatabaseError => "DatabaseError",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidEmail => "InvalidEmail",
            Self::WeakPassword => "WeakPassword",
        }
    }

    /// Human-readable description, suitable for end users.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Resolves a stable identifier back to its catalogue entry.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// `Code: Description` rendering used in logs.
    pub fn display_full(&self) -> FullDisplay<'_> {
        FullDisplay(self)
    }
}

/// Helper returned by [`ErrorCode::display_full`].
#[derive(Debug)]
pub struct FullDisplay<'a>(&'a ErrorCode);

impl fmt::Display for FullDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.code(), self.0)
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ErrorCode", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("description", &self.description())?;
        state.end()
    }
}
