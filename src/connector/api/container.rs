use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{GenerationClient, ListModelsUseCase, PromptDispatcher};
use crate::connector::adapter::{EchoGenerationClient, GeminiClient};

pub struct ContainerConfig {
    /// Answer every request offline by echoing the prompt; no API key needed.
    pub mock_llm: bool,
    /// Overrides `GEMINI_MODEL`.
    pub model: Option<String>,
    /// Overrides `GEMINI_BASE_URL`.
    pub base_url: Option<String>,
}

pub struct Container {
    dispatcher: Arc<PromptDispatcher>,
}

impl Container {
    /// Wire the dispatcher. Fails when no API key is configured, before any
    /// client is created.
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let dispatcher = if config.mock_llm {
            debug!("Using echo generation client");
            PromptDispatcher::new(Arc::new(EchoGenerationClient::new()))
        } else {
            let model = config.model.unwrap_or_else(GeminiClient::configured_model);
            let base_url = config
                .base_url
                .unwrap_or_else(GeminiClient::configured_base_url);
            debug!("Using Gemini model {} at {}", model, base_url);

            PromptDispatcher::initialize(
                |name| std::env::var(name).ok(),
                |credentials| {
                    Arc::new(GeminiClient::new(credentials, model, base_url))
                        as Arc<dyn GenerationClient>
                },
            )?
        };

        Ok(Self::with_dispatcher(Arc::new(dispatcher)))
    }

    pub fn with_dispatcher(dispatcher: Arc<PromptDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> Arc<PromptDispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn list_models_use_case(&self) -> ListModelsUseCase {
        ListModelsUseCase::new(self.dispatcher.client())
    }
}
