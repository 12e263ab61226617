use std::fmt;

use crate::domain::DomainError;

/// Environment variable holding the generation API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// API credential for the generation service.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Resolve the key through `lookup`; a missing or blank value is an error.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, DomainError>
    where
        L: Fn(&str) -> Option<String>,
    {
        match lookup(API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(DomainError::configuration(format!(
                "{API_KEY_VAR} not found in environment or .env file"
            ))),
        }
    }

    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = Credentials::from_lookup(|_| None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let err = Credentials::from_lookup(|_| Some("   ".to_string())).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn key_is_trimmed_and_redacted_in_debug() {
        let creds = Credentials::from_lookup(|name| {
            assert_eq!(name, API_KEY_VAR);
            Some(" secret-key \n".to_string())
        })
        .unwrap();
        assert_eq!(creds.api_key(), "secret-key");
        assert!(!format!("{creds:?}").contains("secret-key"));
    }
}
