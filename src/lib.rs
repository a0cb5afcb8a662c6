pub mod config;
pub mod core;
pub mod docs;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use self::core::*;
pub use errors::app_error::{AppError, AppResult};
pub use routes::app::create_app;
pub use state::{AppState, StartupError};
