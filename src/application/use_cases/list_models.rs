use std::sync::Arc;

use crate::application::GenerationClient;
use crate::domain::{DomainError, ModelInfo};

pub struct ListModelsUseCase {
    client: Arc<dyn GenerationClient>,
}

impl ListModelsUseCase {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// All models, or only those that can serve `generateContent`.
    pub async fn execute(&self, generation_only: bool) -> Result<Vec<ModelInfo>, DomainError> {
        let models = self.client.list_models().await?;
        if !generation_only {
            return Ok(models);
        }
        Ok(models
            .into_iter()
            .filter(ModelInfo::supports_generation)
            .collect())
    }
}
