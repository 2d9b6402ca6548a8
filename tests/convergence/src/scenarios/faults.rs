//! Malformed, lost and misdirected requests.

use super::insert;
use crate::harness::Cluster;
use edit_client::ClientError;
use edit_core::SyncEvent;
use edit_types::{
    Change, ChangeRequest, DocId, OperationType, PostResult, RequestPayload, StyleType, VersionId,
};

const DOC: DocId = DocId::new(1);

#[tokio::test]
async fn insert_without_text_is_rejected_and_not_logged() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();
    a.create_document("doc").await.unwrap();
    a.poll().await.unwrap();
    let mut events = a.subscribe();

    let mut request = ChangeRequest::from_change(
        Some(DOC),
        a.client_id().await.unwrap(),
        a.last_seen().await,
        &insert(0, "x"),
    );
    if let Some(RequestPayload::Insert { text, .. }) = &mut request.payload {
        *text = None;
    }
    let result = a.post(request).await.unwrap();

    assert_eq!(result, PostResult::Failure);
    assert_eq!(cluster.reconciler().head().await, VersionId::new(1));
    assert!(matches!(
        events.recv().await.unwrap(),
        SyncEvent::PostFailed { operation: OperationType::Insert, .. }
    ));
}

#[tokio::test]
async fn lost_post_is_healed_by_resync() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();
    let b = cluster.join().await.unwrap();
    a.create_document("doc").await.unwrap();
    a.poll().await.unwrap();
    a.submit(DOC, &insert(0, "kept")).await.unwrap();
    cluster.settle().await.unwrap();

    a.transport().drop_next_posts(1);
    let lost = a.submit(DOC, &insert(4, " lost")).await;
    assert!(matches!(lost, Err(ClientError::Transport(_))));
    assert_eq!(
        a.working_document(DOC).await.unwrap().content().text(),
        "kept lost"
    );

    b.submit(DOC, &insert(0, ">")).await.unwrap();
    cluster.settle().await.unwrap();

    // Verified replicas never saw the lost edit.
    cluster.check_converged().await.unwrap();
    assert_eq!(
        a.verified_document(DOC).await.unwrap().content().text(),
        ">kept"
    );
    assert_ne!(a.working_documents().await, a.verified_documents().await);

    a.resync().await;
    assert_eq!(a.working_documents().await, a.verified_documents().await);
}

#[tokio::test]
async fn edit_for_unknown_document_is_silently_ignored() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();

    let request = ChangeRequest::from_change(
        Some(DocId::new(77)),
        a.client_id().await.unwrap(),
        VersionId::zero(),
        &insert(0, "nowhere"),
    );

    assert_eq!(a.post(request).await.unwrap(), PostResult::Success);
    assert_eq!(cluster.reconciler().head().await, VersionId::zero());
    assert_eq!(a.poll().await.unwrap(), 0);
}

#[tokio::test]
async fn style_change_replays_without_shifting_positions() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();
    let b = cluster.join().await.unwrap();
    a.create_document("doc").await.unwrap();
    a.poll().await.unwrap();
    a.submit(DOC, &insert(0, "abcdef")).await.unwrap();
    cluster.settle().await.unwrap();

    a.submit(
        DOC,
        &Change::StyleChange {
            style_type: StyleType::Underline,
            is_enabling: true,
            position: 0,
            num_chars: 3,
        },
    )
    .await
    .unwrap();
    // B has not seen the restyle; its insert position is unaffected by it.
    b.submit(DOC, &insert(3, "-")).await.unwrap();
    cluster.settle().await.unwrap();

    cluster.check_converged().await.unwrap();
    for client in cluster.clients() {
        let doc = client.verified_document(DOC).await.unwrap();
        assert_eq!(doc.content().text(), "abc-def");
        assert!(doc.content().style_at(2).unwrap().underline);
        assert!(!doc.content().style_at(3).unwrap().underline);

        let working = client.working_document(DOC).await.unwrap();
        assert_eq!(working.content(), doc.content());
    }
}
