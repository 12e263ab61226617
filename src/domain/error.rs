use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Start-up failure: the dispatcher cannot be built (e.g. missing API key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external generation call failed (network, auth, quota, bad payload).
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_their_variant_only() {
        let err = DomainError::configuration("GEMINI_API_KEY missing");
        assert!(err.is_configuration());
        assert!(!err.is_generation());

        let err = DomainError::generation("quota exhausted");
        assert!(err.is_generation());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn display_keeps_upstream_message() {
        let err = DomainError::generation("API returned 403 Forbidden: permission denied");
        assert_eq!(
            err.to_string(),
            "Generation error: API returned 403 Forbidden: permission denied"
        );
    }
}
