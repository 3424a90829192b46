pub mod classifier;
pub mod engine;
pub mod error;
pub mod progress;
pub mod resolver;
pub mod validator;

pub use engine::SyncEngine;
pub use progress::print_progress;
