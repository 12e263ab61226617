mod echo_generation;
mod gemini_client;

pub use echo_generation::*;
pub use gemini_client::*;
