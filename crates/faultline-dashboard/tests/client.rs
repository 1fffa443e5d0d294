//! LogsClient against a live logs API

use std::sync::Arc;

use chrono::{Duration, Utc};
use faultline_core::{DeleteFilter, LogAdapter, LogLevel, NewLogEntry, QueryOptions};
use faultline_dashboard::{ClientError, LogsClient, QueryState};
use faultline_server::{HttpSettings, LogServer};
use faultline_storage::InMemoryLogAdapter;

/// Serve the API on an ephemeral port; returns the logs base URL
async fn spawn_server(store: Arc<InMemoryLogAdapter>, token: Option<&str>) -> String {
    let settings = HttpSettings {
        api_token: token.map(str::to_string),
        ..Default::default()
    };
    let app = LogServer::new(store, settings).app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/logs")
}

async fn seed(store: &InMemoryLogAdapter) {
    for i in 0..4 {
        store
            .create(NewLogEntry::new(LogLevel::Error, format!("render failed {i}")))
            .await
            .unwrap();
    }
    store
        .create(NewLogEntry::new(LogLevel::Info, "dashboard opened").with_user("u9", None, None))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_get_and_stats() {
    let store = Arc::new(InMemoryLogAdapter::new());
    seed(&store).await;
    let client = LogsClient::new(spawn_server(store.clone(), None).await);

    let mut query = QueryState::new(3);
    let page = client.list(&query.to_options()).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.logs.len(), 3);

    query.go_to(2, page.total);
    let second = client.list(&query.to_options()).await.unwrap();
    assert_eq!(second.logs.len(), 2);

    query.set_user_id("u9");
    let filtered = client.list(&query.to_options()).await.unwrap();
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.logs[0].message, "dashboard opened");

    let entry = client.get(&filtered.logs[0].id).await.unwrap();
    assert_eq!(entry, filtered.logs[0]);

    let stats = client.stats().await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.by_level.error, 4);
    assert_eq!(stats.last_24_hours, 5);
}

#[tokio::test]
async fn test_deletes() {
    let store = Arc::new(InMemoryLogAdapter::new());
    seed(&store).await;
    let client = LogsClient::new(spawn_server(store.clone(), None).await);

    let page = client.list(&QueryOptions::new()).await.unwrap();
    client.delete(&page.logs[0].id).await.unwrap();
    assert!(matches!(
        client.delete(&page.logs[0].id).await,
        Err(ClientError::NotFound)
    ));
    assert_eq!(store.len(), 4);

    let nothing = client.delete_many(&DeleteFilter::default()).await.unwrap();
    assert_eq!(nothing, 0);

    let filter =
        DeleteFilter::before(Utc::now() + Duration::minutes(1)).with_level(LogLevel::Error);
    let deleted = client.delete_many(&filter).await.unwrap();
    assert_eq!(deleted, 3);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_bearer_token() {
    let store = Arc::new(InMemoryLogAdapter::new());
    let base = spawn_server(store, Some("s3cret")).await;

    let anonymous = LogsClient::new(base.clone());
    assert!(matches!(anonymous.stats().await, Err(ClientError::Unauthorized)));

    let wrong = LogsClient::new(base.clone()).with_token(Some("nope".to_string()));
    assert!(matches!(wrong.stats().await, Err(ClientError::Unauthorized)));

    let authed = LogsClient::new(base).with_token(Some("s3cret".to_string()));
    assert_eq!(authed.stats().await.unwrap().total, 0);
}
