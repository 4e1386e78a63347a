//! services/api/src/error.rs
//!
//! Defines the error type returned by the server's startup path.
//! Request-level failures are turned into JSON bodies inside `web::rest`.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The environment did not describe a usable configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Creating the tests directory, binding the listener or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
