//! Property tests: arbitrary interleavings of several clients.

use super::{delete, insert};
use crate::harness::Cluster;
use edit_types::{Change, DocId, StyleType};
use proptest::prelude::*;

const DOC: DocId = DocId::new(1);
const CLIENTS: usize = 3;

#[derive(Debug, Clone)]
enum Step {
    Insert(usize, usize, String),
    Delete(usize, usize, usize),
    Italic(usize, usize, usize),
    Poll(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0..CLIENTS, 0usize..12, "[a-z]{1,3}").prop_map(|(c, p, t)| Step::Insert(c, p, t)),
        3 => (0..CLIENTS, 0usize..12, 0usize..4).prop_map(|(c, p, n)| Step::Delete(c, p, n)),
        1 => (0..CLIENTS, 0usize..12, 0usize..4).prop_map(|(c, p, n)| Step::Italic(c, p, n)),
        3 => (0..CLIENTS).prop_map(Step::Poll),
    ]
}

fn run(steps: Vec<Step>) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;

    runtime.block_on(async move {
        let mut cluster = Cluster::new();
        for _ in 0..CLIENTS {
            cluster.join().await.map_err(|e| e.to_string())?;
        }
        let clients = cluster.clients().to_vec();
        clients[0]
            .create_document("prop")
            .await
            .map_err(|e| e.to_string())?;
        cluster.settle().await.map_err(|e| e.to_string())?;

        for step in steps {
            let (client, change) = match step {
                Step::Insert(c, p, t) => (c, insert(p, &t)),
                Step::Delete(c, p, n) => (c, delete(p, n)),
                Step::Italic(c, p, n) => (
                    c,
                    Change::StyleChange {
                        style_type: StyleType::Italic,
                        is_enabling: p % 2 == 0,
                        position: p,
                        num_chars: n,
                    },
                ),
                Step::Poll(c) => {
                    clients[c].poll().await.map_err(|e| e.to_string())?;
                    continue;
                }
            };
            clients[client]
                .submit(DOC, &change)
                .await
                .map_err(|e| e.to_string())?;
        }

        cluster.settle().await.map_err(|e| e.to_string())?;
        cluster.check_converged().await?;

        for client in &clients {
            client.resync().await;
            if client.working_documents().await != client.verified_documents().await {
                return Err("working model differs from verified after resync".into());
            }
        }
        Ok(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every client that replays the whole log holds the server's documents.
    #[test]
    fn prop_replicas_converge(steps in proptest::collection::vec(arb_step(), 0..40)) {
        prop_assert_eq!(run(steps), Ok(()));
    }
}
