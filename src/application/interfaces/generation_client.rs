use async_trait::async_trait;

use crate::domain::{DomainError, GenerationParameters, ModelInfo};

/// Sends a fully built prompt to a text-generation service.
///
/// Implementors own transport, authentication and the vendor wire format.
/// [`crate::application::PromptDispatcher`] only hands over the final request
/// string and the sampling parameters.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate a response for `prompt` and return its text unmodified.
    ///
    /// Any upstream failure is returned as [`DomainError::Generation`]; a
    /// successful response with no text is `Ok(String::new())`.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParameters,
    ) -> Result<String, DomainError>;

    /// List the models available to the configured credential.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError>;

    /// Model identifier used for generation (for logging).
    fn model_name(&self) -> &str;
}
