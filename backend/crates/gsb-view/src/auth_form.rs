use crate::{ViewError, ViewResult};

/// Shortest password the identity provider accepts at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Input of the sign-in / sign-up form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    pub fn sign_in(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::SignIn,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn sign_up(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::SignUp,
            email: email.into(),
            password: password.into(),
        }
    }

    /// Switch between sign-in and sign-up, keeping the typed e-mail
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.password.clear();
    }

    /// Returns the trimmed e-mail; the password is passed through untouched.
    #[track_caller]
    pub fn validate(&self) -> ViewResult<&str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ViewError::validation("email", "Email is required"));
        }
        if !email.contains('@') {
            return Err(ViewError::validation("email", "Enter a valid email address"));
        }

        if self.password.is_empty() {
            return Err(ViewError::validation("password", "Password is required"));
        }
        if self.mode == AuthMode::SignUp && self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ViewError::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }

        Ok(email)
    }
}
