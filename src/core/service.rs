use crate::core::aggregation::collect_points;
use crate::core::{ConfigProvider, DocumentStore, Result};
use crate::proto::data_processing_service_server::{
    DataProcessingService, DataProcessingServiceServer,
};
use crate::proto::{Empty, GraphDataPoint, GraphDataResponse};
use crate::utils::error::GraphError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

/// `DataProcessingService` backed by a shared document store handle.
///
/// Calls are stateless; the semaphore caps how many scans run at once.
pub struct GraphDataService<S: DocumentStore> {
    store: Arc<S>,
    collection: String,
    workers: Arc<Semaphore>,
}

impl<S: DocumentStore + 'static> GraphDataService<S> {
    pub fn new<C: ConfigProvider>(store: Arc<S>, config: &C) -> Self {
        Self {
            store,
            collection: config.collection().to_string(),
            workers: Arc::new(Semaphore::new(config.max_workers().max(1))),
        }
    }

    /// Scan and assemble under a worker permit.
    pub async fn graph_data(&self) -> Result<GraphDataResponse> {
        let _permit = self
            .workers
            .acquire()
            .await
            .map_err(|e| GraphError::WorkerPoolError {
                message: e.to_string(),
            })?;

        let points = collect_points(self.store.as_ref(), &self.collection).await?;
        let data_points = points.into_iter().map(GraphDataPoint::from).collect();

        Ok(GraphDataResponse { data_points })
    }

    pub fn into_server(self) -> DataProcessingServiceServer<Self> {
        DataProcessingServiceServer::new(self)
    }

    pub async fn serve(
        self,
        addr: SocketAddr,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_with_listener(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send,
    ) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!("🚀 gRPC DataProcessingService listening on {}", addr);

        tonic::transport::Server::builder()
            .add_service(self.into_server())
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}

#[tonic::async_trait]
impl<S: DocumentStore + 'static> DataProcessingService for GraphDataService<S> {
    async fn get_graph_data(
        &self,
        _request: Request<Empty>,
    ) -> std::result::Result<Response<GraphDataResponse>, Status> {
        match self.graph_data().await {
            Ok(response) => {
                tracing::info!(
                    "GetGraphData returned {} points",
                    response.data_points.len()
                );
                Ok(Response::new(response))
            }
            Err(e) => {
                tracing::error!(
                    "❌ GetGraphData failed: {} (Category: {:?})",
                    e,
                    e.category()
                );
                Err(e.into_status())
            }
        }
    }
}
