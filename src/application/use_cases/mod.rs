mod dispatch_prompt;
mod list_models;

pub use dispatch_prompt::*;
pub use list_models::*;
