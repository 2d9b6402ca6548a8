//! Two-client walkthrough and concurrent edit races.

use super::{delete, insert};
use crate::harness::Cluster;
use edit_types::{ClientId, DocId, PostResult, VersionId};
use std::sync::Arc;

const DOC: DocId = DocId::new(1);

#[tokio::test]
async fn two_clients_converge_on_concurrent_delete_and_insert() {
    let mut cluster = Cluster::new();

    // Client A creates "Untitled" and types "hello".
    let a = cluster.join().await.unwrap();
    assert_eq!(a.client_id().await, Some(ClientId::new(1)));
    assert_eq!(a.create_document("Untitled").await.unwrap(), PostResult::Success);
    a.poll().await.unwrap();
    assert_eq!(a.last_seen().await, VersionId::new(1));
    assert_eq!(a.submit(DOC, &insert(0, "hello")).await.unwrap(), PostResult::Success);
    assert_eq!(cluster.reconciler().head().await, VersionId::new(2));
    a.poll().await.unwrap();

    // Client B joins and replays both records.
    let b = cluster.join().await.unwrap();
    assert_eq!(b.client_id().await, Some(ClientId::new(2)));
    assert_eq!(b.poll().await.unwrap(), 2);
    let doc = b.verified_document(DOC).await.unwrap();
    assert_eq!(doc.title(), "Untitled");
    assert_eq!(doc.content().text(), "hello");

    // B deletes the 'o' while A appends '!', both having seen version 2.
    let delete_op = delete(4, 1);
    let insert_op = insert(5, "!");
    let (deleted, inserted) = tokio::join!(
        b.submit(DOC, &delete_op),
        a.submit(DOC, &insert_op)
    );
    assert_eq!(deleted.unwrap(), PostResult::Success);
    assert_eq!(inserted.unwrap(), PostResult::Success);

    cluster.settle().await.unwrap();
    cluster.check_converged().await.unwrap();

    // Whichever was second got transformed against the first.
    for client in [&a, &b] {
        assert_eq!(
            client.verified_document(DOC).await.unwrap().content().text(),
            "hell!"
        );
        assert_eq!(
            client.working_document(DOC).await.unwrap().content().text(),
            "hell!"
        );
    }
}

#[tokio::test]
async fn unseen_remote_insert_shifts_local_insert() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();
    let b = cluster.join().await.unwrap();
    a.create_document("doc").await.unwrap();
    a.poll().await.unwrap();
    a.submit(DOC, &insert(0, "0123456789")).await.unwrap();
    cluster.settle().await.unwrap();

    // B inserts at 2; A, unaware, inserts at 5.
    b.submit(DOC, &insert(2, "abc")).await.unwrap();
    a.submit(DOC, &insert(5, "X")).await.unwrap();
    cluster.settle().await.unwrap();

    cluster.check_converged().await.unwrap();
    assert_eq!(
        a.verified_document(DOC).await.unwrap().content().text(),
        "01abc234X56789"
    );
    assert_eq!(
        a.working_document(DOC).await.unwrap().content().text(),
        "01abc234X56789"
    );
}

#[tokio::test]
async fn many_clients_race_on_one_document() {
    let mut cluster = Cluster::new();
    let owner = cluster.join().await.unwrap();
    owner.create_document("shared").await.unwrap();
    owner.poll().await.unwrap();
    owner.submit(DOC, &insert(0, "base text")).await.unwrap();
    for _ in 0..5 {
        cluster.join().await.unwrap();
    }
    cluster.settle().await.unwrap();

    let mut tasks = Vec::new();
    for (i, client) in cluster.clients().iter().enumerate() {
        let client = Arc::clone(client);
        tasks.push(tokio::spawn(async move {
            for round in 0..10 {
                let change = if (i + round) % 3 == 0 {
                    delete(round % 7, 2)
                } else {
                    insert((i * 3 + round) % 9, &i.to_string())
                };
                client.submit(DOC, &change).await.unwrap();
                if round % 4 == 0 {
                    client.poll().await.unwrap();
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    cluster.settle().await.unwrap();
    cluster.check_converged().await.unwrap();

    // Log is gap-free: record i has version i.
    let records = cluster.reconciler().get(VersionId::zero()).await;
    assert_eq!(records.len(), 2 + 6 * 10);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.version_id.value(), i as u64 + 1);
    }
}

#[tokio::test]
async fn edits_to_different_documents_do_not_interfere() {
    let mut cluster = Cluster::new();
    let a = cluster.join().await.unwrap();
    let b = cluster.join().await.unwrap();
    a.create_document("one").await.unwrap();
    b.create_document("two").await.unwrap();
    cluster.settle().await.unwrap();

    a.submit(DocId::new(1), &insert(0, "first")).await.unwrap();
    b.submit(DocId::new(2), &insert(0, "second")).await.unwrap();
    b.submit(DocId::new(1), &insert(0, ">")).await.unwrap();
    cluster.settle().await.unwrap();

    cluster.check_converged().await.unwrap();
    let documents = a.verified_documents().await;
    // B's insert at 0 lands after A's unseen insert at the same position.
    assert_eq!(documents.get(DocId::new(1)).unwrap().content().text(), "first>");
    assert_eq!(documents.get(DocId::new(2)).unwrap().content().text(), "second");
}
