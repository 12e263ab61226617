mod credentials;
mod generation;
mod persona;
mod task_request;
mod transcript;

pub use credentials::*;
pub use generation::*;
pub use persona::*;
pub use task_request::*;
pub use transcript::*;
