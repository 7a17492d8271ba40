//! Mock authentication.
//!
//! No credentials are checked against anything: a filled-in form is accepted
//! and produces a local user.

use std::fmt;

use crate::model::{User, UserRole};

/// Length of the reset code accepted by the verify step.
pub const RESET_CODE_LEN: usize = 6;

/// Which form the auth screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
    Forgot,
    Verify,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome Back",
            AuthMode::Signup => "Create Account",
            AuthMode::Forgot => "Forgot Password",
            AuthMode::Verify => "Verify Code",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in to access your study notes and history.",
            AuthMode::Signup => "Start your journey with your personal AI tutor.",
            AuthMode::Forgot => "We will send a security code to your Gmail.",
            AuthMode::Verify => "Enter the 6-digit code sent to your inbox.",
        }
    }

    /// Form fields shown for this mode, in tab order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            AuthMode::Login => &[Field::Email, Field::Password],
            AuthMode::Signup => &[
                Field::Name,
                Field::Email,
                Field::Password,
                Field::ConfirmPassword,
            ],
            AuthMode::Forgot => &[Field::Email],
            AuthMode::Verify => &[Field::Code],
        }
    }

    /// Login <-> Signup toggle. Other modes return to Login.
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            _ => AuthMode::Login,
        }
    }
}

/// A single input on the auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Code,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email Address",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
            Field::Code => "Security Code",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

/// Raw form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub code: String,
}

/// Result of submitting the auth form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Authentication succeeded; enter the chat as this user.
    SignedIn(User),
    /// Move to another form, showing a success notice.
    Switch { mode: AuthMode, notice: &'static str },
    /// Stay on the form and show an error.
    Rejected(&'static str),
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthOutcome::SignedIn(user) => write!(f, "signed in as {}", user.name),
            AuthOutcome::Switch { notice, .. } => f.write_str(notice),
            AuthOutcome::Rejected(reason) => f.write_str(reason),
        }
    }
}

/// Validates the form for `mode`.
pub fn submit(mode: AuthMode, credentials: &Credentials) -> AuthOutcome {
    let name = credentials.name.trim();
    let email = credentials.email.trim();
    let password = credentials.password.as_str();
    let confirm = credentials.confirm_password.as_str();

    match mode {
        AuthMode::Login => {
            if email.is_empty() || password.is_empty() {
                return AuthOutcome::Rejected("Please fill in your email and password.");
            }
            let display = email.split('@').next().unwrap_or(email);
            AuthOutcome::SignedIn(student("u1", display, email))
        }
        AuthMode::Signup => {
            if name.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
                return AuthOutcome::Rejected("All fields are required for sign up.");
            }
            if password != confirm {
                return AuthOutcome::Rejected("Passwords do not match.");
            }
            AuthOutcome::SignedIn(student("u2", name, email))
        }
        AuthMode::Forgot => {
            if email.is_empty() {
                return AuthOutcome::Rejected("Please enter your email to get a code.");
            }
            AuthOutcome::Switch {
                mode: AuthMode::Verify,
                notice: "Reset code sent to your Gmail!",
            }
        }
        AuthMode::Verify => {
            if credentials.code.trim().chars().count() != RESET_CODE_LEN {
                return AuthOutcome::Rejected("Invalid 6-digit code.");
            }
            AuthOutcome::Switch {
                mode: AuthMode::Login,
                notice: "Code verified! Please set a new password.",
            }
        }
    }
}

fn student(id: &str, name: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role: UserRole::Student,
    }
}
