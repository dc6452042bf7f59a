//! HTTP front end for the aggregation service.
//!
//! `GET /getgraphdata` makes exactly one `GetGraphData` call through the
//! shared client and re-renders the points as
//! `{"graph_data": [{"label": ..., "value": ...}]}`. A failed call becomes a
//! plain-text 500; nothing is retried.

pub mod client;
pub mod error;

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::domain::model::GraphPoint;
use crate::utils::error::Result;

pub use client::{GraphDataClient, RpcGraphClient};
pub use error::GatewayError;

pub const WELCOME_MESSAGE: &str = "Bienvenido al sistema de graficación con Flask, gRPC y Firestore.";

pub type SharedClient = Arc<dyn GraphDataClient>;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GraphDataBody {
    pub graph_data: Vec<GraphPoint>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EchoBody {
    pub data: String,
}

pub fn router(client: SharedClient) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/getgraphdata", get(graph_data_handler))
        .route("/getdata", post(echo_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}

async fn index_handler() -> &'static str {
    WELCOME_MESSAGE
}

async fn graph_data_handler(
    State(client): State<SharedClient>,
) -> std::result::Result<Json<GraphDataBody>, GatewayError> {
    let response = client.get_graph_data().await.map_err(|status| {
        error!("❌ GetGraphData call failed: {:?}: {}", status.code(), status.message());
        GatewayError::from(status)
    })?;

    let graph_data = response
        .data_points
        .into_iter()
        .map(GraphPoint::from)
        .collect();

    Ok(Json(GraphDataBody { graph_data }))
}

async fn echo_handler(Json(payload): Json<Value>) -> Json<EchoBody> {
    let query = query_text(payload.get("query"));

    let data = if query == "test" {
        "test response".to_string()
    } else {
        format!("You sent: {}", query)
    };

    Json(EchoBody { data })
}

// 非字串的 query 照樣回顯
fn query_text(query: Option<&Value>) -> String {
    match query {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
    }
}

pub async fn serve(
    router: Router,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_with_listener(router, listener, shutdown).await
}

pub async fn serve_with_listener(
    router: Router,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!("🌐 Gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Gateway stopped");
    Ok(())
}
