//! Sign-in and registration form validation.

use crate::error::FieldError;

/// Which variant of the form is being submitted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Existing account
    #[default]
    Login,
    /// New account; the name field is shown
    Register,
}

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Raw values typed into the sign-in form
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    /// Display name, only used when registering
    pub name: String,
    /// Email
    pub email: String,
    /// Password
    pub password: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl CredentialsForm {
    /// A sign-in form
    #[must_use]
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// A registration form
    #[must_use]
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check every field, reporting at most one message per field
    ///
    /// # Errors
    ///
    /// Returns the failing fields in form order: name, email, password.
    pub fn validate(&self, mode: AuthMode) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if mode == AuthMode::Register && self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !looks_like_email(&self.email) {
            errors.push(FieldError::new("email", "Please enter a valid email"));
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`; the domain
/// needs a dot with something on both sides.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
