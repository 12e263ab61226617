use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{ModelsController, TaskController};

pub struct Router<'a> {
    task_controller: TaskController<'a>,
    models_controller: ModelsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            task_controller: TaskController::new(container),
            models_controller: ModelsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Questions {
                topic,
                difficulty,
                count,
            } => self.task_controller.questions(topic, difficulty, count).await,
            Commands::Ask { question } => self.task_controller.ask(question).await,
            Commands::Review { file, context } => self.task_controller.review(file, context).await,
            Commands::Solve { description } => self.task_controller.solve(description).await,
            Commands::Chat { message } => self.task_controller.chat(message).await,
            Commands::Models { all } => self.models_controller.list(all).await,
            Commands::Menu | Commands::Serve { .. } => {
                unreachable!("Interactive front ends are handled separately in main")
            }
        }
    }
}
