//! Browser front end: one page per task panel, sessions held in memory.

mod page;
mod server;
mod session;

pub use page::*;
pub use server::*;
pub use session::*;
