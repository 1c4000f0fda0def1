pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod models;
pub mod services;
pub mod vector_store;

pub mod env;
pub mod error;
pub mod logging;

pub use error::{PartMatchError, Result};
pub use logging::{init_logging, LoggingConfig};
