pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{GenerationClient, ListModelsUseCase, PromptDispatcher};

pub use cli::Commands;

pub use connector::{ConsoleMenu, EchoGenerationClient, GeminiClient, SessionStore, WebState};

pub use domain::{
    ChatHistoryEntry, Credentials, DomainError, GenerationParameters, ModelInfo, Persona, TaskKind,
    TaskRequest, Transcript,
};
