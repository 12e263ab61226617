use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::application::GenerationClient;
use crate::domain::{DomainError, GenerationParameters, ModelInfo};

/// Offline [`GenerationClient`] that answers with the prompt it was given.
///
/// Counts and records every call so callers can verify what would have been
/// sent. `failing` turns every call into a generation error.
pub struct EchoGenerationClient {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl EchoGenerationClient {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

impl Default for EchoGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationClient for EchoGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParameters,
    ) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        debug!("Echoing {} char prompt", prompt.len());

        match &self.failure {
            Some(message) => Err(DomainError::generation(message.clone())),
            None => Ok(prompt.to_string()),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        Ok(vec![ModelInfo::new("models/echo")
            .with_display_name("Echo (offline)")
            .with_supported_methods(vec!["generateContent".to_string()])])
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_and_records_prompts() {
        let client = EchoGenerationClient::new();
        let params = GenerationParameters::default();

        let out = client.generate("ping", &params).await.unwrap();

        assert_eq!(out, "ping");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.last_prompt().as_deref(), Some("ping"));
    }

    #[tokio::test]
    async fn failing_client_still_counts_calls() {
        let client = EchoGenerationClient::failing("network unreachable");
        let params = GenerationParameters::default();

        let err = client.generate("ping", &params).await.unwrap_err();

        assert!(err.is_generation());
        assert_eq!(client.call_count(), 1);
    }
}
