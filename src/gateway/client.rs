use crate::proto::data_processing_service_client::DataProcessingServiceClient;
use crate::proto::{Empty, GraphDataResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

/// What the gateway needs from the aggregation service.
#[async_trait]
pub trait GraphDataClient: Send + Sync {
    async fn get_graph_data(&self) -> std::result::Result<GraphDataResponse, Status>;
}

/// gRPC client over one long-lived channel.
///
/// The channel connects lazily and is never re-created; clones share it.
#[derive(Debug, Clone)]
pub struct RpcGraphClient {
    inner: DataProcessingServiceClient<Channel>,
}

impl RpcGraphClient {
    /// Must be called inside a tokio runtime.
    pub fn connect_lazy(endpoint: &str) -> Result<Self> {
        let channel = Endpoint::from_shared(endpoint.to_string())?.connect_lazy();
        tracing::info!("🔌 Aggregation service channel prepared for {}", endpoint);

        Ok(Self {
            inner: DataProcessingServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl GraphDataClient for RpcGraphClient {
    async fn get_graph_data(&self) -> std::result::Result<GraphDataResponse, Status> {
        let mut client = self.inner.clone();
        let response = client.get_graph_data(Empty {}).await?;
        Ok(response.into_inner())
    }
}
