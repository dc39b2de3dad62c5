// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod staging;

// Re-export commonly used types
pub use config::{BrokerConfig, Config};
pub use error::{ConfigError, DispatchError, OrderError, QuoteError};
pub use execution::{Dispatcher, DispatchResult};
pub use models::{Ratio, Side};
