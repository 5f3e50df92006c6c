//! Checks run before auth requests leave the client

use serde::Serialize;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}

impl SignupForm {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(invalid("Please fill in all required fields"));
        }
        if self.password != self.confirm_password {
            return Err(invalid("Passwords do not match"));
        }
        if self.password.chars().count() < 6 {
            return Err(invalid("Password must be at least 6 characters long"));
        }
        Ok(())
    }
}

impl LoginForm {
    pub fn validate(&self) -> ClientResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(invalid("Please enter both email and password"));
        }
        Ok(())
    }
}

/// Reject blank path segments before they turn into a different route
pub(crate) fn require(label: &str, value: &str) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{label} is required")));
    }
    Ok(())
}
