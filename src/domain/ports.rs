use crate::domain::model::Document;
use crate::utils::error::Result;

/// Read side of the document database.
pub trait DocumentStore: Send + Sync {
    /// Full scan of `collection`, no filter. Implementations follow any
    /// backend paging internally and return every document in scan order.
    fn scan(&self, collection: &str)
        -> impl std::future::Future<Output = Result<Vec<Document>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn collection(&self) -> &str;
    fn max_workers(&self) -> usize;
}
