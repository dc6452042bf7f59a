pub mod aggregation;
pub mod service;

pub use crate::domain::model::{Document, GraphPoint, UserRecord};
pub use crate::domain::ports::{ConfigProvider, DocumentStore};
pub use crate::utils::error::Result;
