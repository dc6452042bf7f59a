use httpmock::prelude::*;
use score_graph::config::AppConfig;
use score_graph::gateway::{self, RpcGraphClient};
use score_graph::{FirestoreStore, GraphDataService};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn start_service(firestore_url: String) -> String {
    let mut config = AppConfig::default();
    config.store.base_url = firestore_url;
    config.store.project_id = Some("demo".to_string());
    config.service.max_workers = 4;

    let store = Arc::new(FirestoreStore::new(&config.store).unwrap());
    let service = GraphDataService::new(store, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        service
            .serve_with_listener(listener, std::future::pending())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

async fn start_gateway(service_endpoint: &str) -> String {
    let client = RpcGraphClient::connect_lazy(service_endpoint).unwrap();
    let router = gateway::router(Arc::new(client));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        gateway::serve_with_listener(router, listener, std::future::pending())
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

fn users_page(server: &MockServer, body: Value) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/demo/databases/(default)/documents/users");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

#[tokio::test]
async fn test_browser_request_flows_through_both_components() {
    let firestore = MockServer::start();
    let list_mock = users_page(
        &firestore,
        json!({
            "documents": [
                {
                    "name": "projects/demo/databases/(default)/documents/users/a",
                    "fields": {"name": {"stringValue": "User1"}, "score": {"doubleValue": 10.0}}
                },
                {
                    "name": "projects/demo/databases/(default)/documents/users/b",
                    "fields": {"name": {"stringValue": "User2"}, "score": {"integerValue": "20"}}
                },
                {"name": "projects/demo/databases/(default)/documents/users/empty"}
            ]
        }),
    );

    let service_endpoint = start_service(firestore.base_url()).await;
    let gateway_url = start_gateway(&service_endpoint).await;

    let response = reqwest::get(format!("{}/getgraphdata", gateway_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"graph_data":[{"label":"User1","value":10.0},{"label":"User2","value":20.0}]}"#
    );
    list_mock.assert();
}

#[tokio::test]
async fn test_malformed_score_surfaces_as_gateway_500() {
    let firestore = MockServer::start();
    users_page(
        &firestore,
        json!({
            "documents": [{
                "name": "projects/demo/databases/(default)/documents/users/a",
                "fields": {"name": {"stringValue": "User1"}, "score": {"stringValue": "plenty"}}
            }]
        }),
    );

    let service_endpoint = start_service(firestore.base_url()).await;
    let gateway_url = start_gateway(&service_endpoint).await;

    let response = reqwest::get(format!("{}/getgraphdata", gateway_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert!(body.starts_with("gRPC error:"));
    assert!(body.contains("Error processing document data"));
}

#[tokio::test]
async fn test_unreachable_service_is_500_per_request() {
    // grab a free port and release it so nothing is listening there
    let unused = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let gateway_url = start_gateway(&format!("http://{}", unused)).await;

    for _ in 0..2 {
        let response = reqwest::get(format!("{}/getgraphdata", gateway_url))
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body = response.text().await.unwrap();
        assert!(!body.is_empty());
        assert!(body.starts_with("gRPC error:"));
    }
}

#[tokio::test]
async fn test_store_outage_reports_unexpected_error() {
    let firestore = MockServer::start();
    firestore.mock(|when, then| {
        when.method(GET);
        then.status(503).body("UNAVAILABLE");
    });

    let service_endpoint = start_service(firestore.base_url()).await;
    let client = RpcGraphClient::connect_lazy(&service_endpoint).unwrap();

    let result = score_graph::GraphDataClient::get_graph_data(&client).await;
    let status = tokio_test::assert_err!(result);

    assert_eq!(status.code(), tonic::Code::Internal);
    assert!(status.message().starts_with("Unexpected error in GetGraphData:"));
    assert!(status.message().contains("503"));
}
