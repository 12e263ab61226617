use anyhow::Result;

use crate::domain::ModelInfo;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self, all: bool) -> Result<String> {
        let use_case = self.container.list_models_use_case();
        let models = use_case.execute(!all).await?;
        Ok(self.format_models(&models))
    }

    fn format_models(&self, models: &[ModelInfo]) -> String {
        if models.is_empty() {
            return "No models available.".to_string();
        }

        let mut output = format!("Available models:\n{}\n", "=".repeat(50));
        for model in models {
            match model.display_name() {
                Some(display) => output.push_str(&format!("- {} ({})\n", model.name(), display)),
                None => output.push_str(&format!("- {}\n", model.name())),
            }
        }
        output
    }
}
