use std::path::PathBuf;

use anyhow::Result;
use tokio::io::AsyncReadExt;

use crate::domain::{DomainError, TaskRequest};

use super::super::Container;

pub struct TaskController<'a> {
    container: &'a Container,
}

impl<'a> TaskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn questions(
        &self,
        topic: String,
        difficulty: Option<String>,
        count: Option<u32>,
    ) -> Result<String> {
        self.run(TaskRequest::generate_questions(topic, difficulty.as_deref(), count)).await
    }

    pub async fn ask(&self, question: String) -> Result<String> {
        self.run(TaskRequest::answer_question(question)).await
    }

    pub async fn review(&self, file: Option<PathBuf>, context: Option<String>) -> Result<String> {
        let code = match file {
            Some(path) => tokio::fs::read_to_string(&path)
                .await
                .map_err(DomainError::from)?,
            None => {
                let mut code = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut code)
                    .await
                    .map_err(DomainError::from)?;
                code
            }
        };

        self.run(TaskRequest::review_code(code, context.as_deref())).await
    }

    pub async fn solve(&self, description: String) -> Result<String> {
        self.run(TaskRequest::solve_problem(description)).await
    }

    pub async fn chat(&self, message: String) -> Result<String> {
        self.run(TaskRequest::free_chat(message)).await
    }

    async fn run(&self, task: TaskRequest) -> Result<String> {
        if let Some(warning) = task.missing_input() {
            return Err(DomainError::invalid_input(warning).into());
        }

        let response = self.container.dispatcher().dispatch(&task).await?;
        Ok(response)
    }
}
