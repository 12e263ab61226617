use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl GenerationParameters {
    pub fn new(temperature: f32, top_p: f32, top_k: u32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            top_p,
            top_k,
            max_output_tokens,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(0.7, 0.95, 40, 8192)
    }
}

/// A model advertised by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    name: String,
    display_name: Option<String>,
    supported_methods: Vec<String>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            supported_methods: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_supported_methods(mut self, methods: Vec<String>) -> Self {
        self.supported_methods = methods;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn supported_methods(&self) -> &[String] {
        &self.supported_methods
    }

    pub fn supports_generation(&self) -> bool {
        self.supported_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}
