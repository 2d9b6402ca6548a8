//! The same guarantees over a real HTTP server and the background driver.

use super::insert;
use edit_client::{ClientConfig, CollabClient, HttpTransport, SyncDriver};
use edit_server::{Config, Reconciler};
use edit_types::DocId;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const DOC: DocId = DocId::new(1);

async fn start_server() -> (String, Arc<Reconciler>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let reconciler = Arc::new(Reconciler::new(Config::default()));
    tokio::spawn(edit_server::run(listener, Arc::clone(&reconciler)));
    (url, reconciler)
}

async fn start_client(url: &str) -> SyncDriver<HttpTransport> {
    let config = ClientConfig::new(url)
        .with_poll_interval(Duration::from_millis(10))
        .with_resync_interval(Duration::from_secs(3600))
        .with_connect_retry(Duration::from_millis(10));
    let transport = HttpTransport::new(url).unwrap();
    SyncDriver::start(Arc::new(CollabClient::new(config, transport))).await
}

/// Wait until `client` has replayed everything the server holds.
async fn caught_up(client: &CollabClient<HttpTransport>, reconciler: &Reconciler) -> bool {
    for _ in 0..500 {
        if client.last_seen().await == reconciler.head().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drivers_converge_over_http() {
    let (url, reconciler) = start_server().await;
    let a = start_client(&url).await;
    let b = start_client(&url).await;

    a.create_document("Untitled").await.unwrap();
    for _ in 0..500 {
        if a.client().working_document(DOC).await.is_some()
            && b.client().working_document(DOC).await.is_some()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(b.client().working_document(DOC).await.is_some());

    a.edit(DOC, &insert(0, "hello")).await.unwrap();
    b.edit(DOC, &insert(0, "> ")).await.unwrap();

    // Posts are asynchronous; wait for both to land, then for replay.
    for _ in 0..500 {
        if reconciler.head().await.value() == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(caught_up(a.client(), &reconciler).await);
    assert!(caught_up(b.client(), &reconciler).await);

    let server = reconciler.documents().await;
    assert_eq!(a.client().verified_documents().await, server);
    assert_eq!(b.client().verified_documents().await, server);
    let text = server.get(DOC).unwrap().content().text();
    assert!(text == "> hello" || text == "hello> ", "unexpected text {:?}", text);

    a.shutdown().await.unwrap();
    b.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_flushes_pending_posts() {
    let (url, reconciler) = start_server().await;
    let a = start_client(&url).await;
    a.create_document("doc").await.unwrap();
    a.shutdown().await.unwrap();

    assert_eq!(reconciler.head().await.value(), 1);
    assert_eq!(reconciler.clients_connected(), 1);
}
