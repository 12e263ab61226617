pub mod models_controller;
pub mod task_controller;

pub use models_controller::ModelsController;
pub use task_controller::TaskController;
