pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod gateway;
pub mod proto;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{FirestoreStore, MemoryStore};
pub use config::AppConfig;
pub use crate::core::service::GraphDataService;
pub use domain::model::{Document, GraphPoint, UserRecord};
pub use gateway::{GraphDataClient, RpcGraphClient};
pub use utils::error::{GraphError, Result};
