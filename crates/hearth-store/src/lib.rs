pub mod config;
pub mod error;
pub mod schema;
pub mod store;

pub use config::{CompletionConfig, EngineConfig};
pub use error::{Result, StoreError};
pub use store::{Store, StoreStats, default_data_dir};
