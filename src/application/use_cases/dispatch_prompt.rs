use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::application::GenerationClient;
use crate::domain::{Credentials, DomainError, GenerationParameters, Persona, TaskRequest};

/// Turns a [`TaskRequest`] into one outbound request string and returns the
/// model's reply.
///
/// Every request is `persona + "\n\n" + template(task)`. Calls are independent:
/// nothing is cached and no previous exchange is replayed. Upstream failures are
/// passed through untouched.
pub struct PromptDispatcher {
    persona: Persona,
    params: GenerationParameters,
    client: Arc<dyn GenerationClient>,
}

impl PromptDispatcher {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            persona: Persona::default(),
            params: GenerationParameters::default(),
            client,
        }
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Resolve the credential first and only then build the client handle.
    ///
    /// A missing credential fails here, before `connect` runs.
    pub fn initialize<L, F>(lookup: L, connect: F) -> Result<Self, DomainError>
    where
        L: Fn(&str) -> Option<String>,
        F: FnOnce(Credentials) -> Arc<dyn GenerationClient>,
    {
        let credentials = Credentials::from_lookup(lookup)?;
        Ok(Self::new(connect(credentials)))
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.params
    }

    pub fn client(&self) -> Arc<dyn GenerationClient> {
        Arc::clone(&self.client)
    }

    pub fn build_request(&self, task: &TaskRequest) -> String {
        self.persona.frame(&task.render())
    }

    pub async fn dispatch(&self, task: &TaskRequest) -> Result<String, DomainError> {
        let request = self.build_request(task);
        debug!(
            "Dispatching {} request ({} chars) to {}",
            task.kind(),
            request.len(),
            self.client.model_name()
        );

        let start_time = Instant::now();
        let response = self.client.generate(&request, &self.params).await?;

        debug!(
            "{} response received: {} chars in {:?}",
            task.kind(),
            response.len(),
            start_time.elapsed()
        );

        Ok(response)
    }

    pub async fn generate_questions(
        &self,
        topic: &str,
        difficulty: Option<&str>,
        count: Option<u32>,
    ) -> Result<String, DomainError> {
        self.dispatch(&TaskRequest::generate_questions(topic, difficulty, count)).await
    }

    pub async fn answer_question(&self, question: &str) -> Result<String, DomainError> {
        self.dispatch(&TaskRequest::answer_question(question)).await
    }

    pub async fn review_code(
        &self,
        code: &str,
        context: Option<&str>,
    ) -> Result<String, DomainError> {
        self.dispatch(&TaskRequest::review_code(code, context)).await
    }

    pub async fn solve_problem(&self, description: &str) -> Result<String, DomainError> {
        self.dispatch(&TaskRequest::solve_problem(description)).await
    }

    pub async fn chat(&self, message: &str) -> Result<String, DomainError> {
        self.dispatch(&TaskRequest::free_chat(message)).await
    }
}
