//! Credential model types
//!
//! SECURITY: Credential types implement Drop to clear sensitive data.

use std::fmt;

use crate::utils::CredentialError;

/// Maximum accepted username length
const MAX_USERNAME_LEN: usize = 256;

/// Management endpoint username
///
/// Local accounts (`admin`) and remote-auth accounts (`ucs-LDAP\\jdoe`,
/// `jdoe@corp.example`) are passed through verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, CredentialError> {
        let username = username.into();

        if username.trim().is_empty() {
            return Err(CredentialError::EmptyUsername);
        }

        if username.len() > MAX_USERNAME_LEN {
            return Err(CredentialError::UsernameTooLong {
                max: MAX_USERNAME_LEN,
            });
        }

        Ok(Username(username))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Password that zeros memory on drop
///
/// SECURITY: This type never implements Display or Debug in a way that reveals the password.
pub struct SecureString(String);

impl Clone for SecureString {
    fn clone(&self) -> Self {
        SecureString(self.0.clone())
    }
}

impl SecureString {
    /// Create a new secure string
    pub fn new(password: impl Into<String>) -> Self {
        SecureString(password.into())
    }

    /// Get the password as a string slice
    ///
    /// Use this sparingly and only when building the login request.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        // SAFETY: We own this String and zero it in place; all-zero bytes are valid UTF-8
        unsafe {
            let bytes = self.0.as_bytes_mut();
            for byte in bytes {
                std::ptr::write_volatile(byte, 0);
            }
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SECURITY: Never reveal the password content
        write!(f, "SecureString(*** {} bytes ***)", self.0.len())
    }
}

/// Login credentials for a management endpoint
#[derive(Clone, Debug)]
pub struct Credentials {
    username: Username,
    password: SecureString,
}

impl Credentials {
    pub fn new(username: Username, password: SecureString) -> Self {
        Credentials { username, password }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &SecureString {
        &self.password
    }
}
