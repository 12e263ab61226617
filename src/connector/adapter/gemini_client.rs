use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::GenerationClient;
use crate::domain::{Credentials, DomainError, GenerationParameters, ModelInfo};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_VERSION_PATH: &str = "/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// `generateContent` request payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: ApiGenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<&GenerationParameters> for ApiGenerationConfig {
    fn from(params: &GenerationParameters) -> Self {
        Self {
            temperature: params.temperature(),
            top_p: params.top_p(),
            top_k: params.top_k(),
            max_output_tokens: params.max_output_tokens(),
        }
    }
}

/// Subset of the `generateContent` response we read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the Gemini `generateContent` REST API.
///
/// Configuration comes from the environment, falling back to the public
/// endpoint and `gemini-2.5-flash`:
///
/// ```text
/// GEMINI_API_KEY=...              (required)
/// GEMINI_MODEL=gemini-2.5-flash
/// GEMINI_BASE_URL=https://generativelanguage.googleapis.com
/// ```
///
/// The underlying `reqwest::Client` keeps its default timeouts.
pub struct GeminiClient {
    client: reqwest::Client,
    credentials: Credentials,
    model: String,
    /// Base URL including the API version, e.g. `https://host/v1beta`.
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        credentials: Credentials,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let model: String = model.into();
        Self {
            client: reqwest::Client::new(),
            credentials,
            model: model.trim_start_matches("models/").to_string(),
            api_base: format!("{}{API_VERSION_PATH}", base.trim_end_matches('/')),
        }
    }

    pub fn configured_model() -> String {
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
    }

    pub fn configured_base_url() -> String {
        std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.api_base)
    }

    /// Concatenate the visible text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String, DomainError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!(" (prompt blocked: {r})"))
                .unwrap_or_default();
            return Err(DomainError::generation(format!(
                "GeminiClient: response contained no candidates{reason}"
            )));
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                debug!("GeminiClient: candidate finished with reason {reason}");
            }
        }

        Ok(candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }

    /// Turn a non-success response into an error carrying the upstream message.
    async fn status_error(response: reqwest::Response) -> DomainError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("GeminiClient: API returned {status}: {body}");

        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        if message.is_empty() {
            DomainError::generation(format!("GeminiClient: API returned {status}"))
        } else {
            DomainError::generation(format!("GeminiClient: API returned {status}: {message}"))
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParameters,
    ) -> Result<String, DomainError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: params.into(),
        };

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.credentials.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            DomainError::generation(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        Self::extract_text(api_response)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.models_url())
                .header(API_KEY_HEADER, self.credentials.api_key());
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await.map_err(|e| {
                DomainError::generation(format!("GeminiClient: request failed: {e}"))
            })?;

            if !response.status().is_success() {
                return Err(Self::status_error(response).await);
            }

            let page: ListModelsResponse = response.json().await.map_err(|e| {
                DomainError::generation(format!("GeminiClient: failed to parse model list: {e}"))
            })?;

            models.extend(page.models.into_iter().map(|m| {
                let mut info =
                    ModelInfo::new(m.name).with_supported_methods(m.supported_generation_methods);
                if let Some(display_name) = m.display_name {
                    info = info.with_display_name(display_name);
                }
                info
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("GeminiClient: listed {} models", models.len());
        Ok(models)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
