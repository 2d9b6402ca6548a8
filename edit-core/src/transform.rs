//! Position transformation against edits the requester has not seen.
//!
//! A client computes an edit position against its own view of the document,
//! which lags the server by every record committed after the client's
//! `last_seen` version. Before the server applies the edit it walks those
//! records and shifts the position past them:
//!
//! ```text
//! Insert at ip, length L:   ip <= p            =>  p += L
//! Delete at dp, n chars:    dp + n <= p        =>  p -= n
//!                           dp < p < dp + n    =>  p = dp
//! ```
//!
//! The requester's own records are skipped (its view already contains them)
//! and StyleChange records never move positions. Overlapping edits resolve
//! last-committed-wins; this is not an intention-preserving merge.

use edit_types::{Change, ClientId, DocId, VersionId};

use crate::ChangeLog;

/// Transform `position` for a request from `client_id` on `doc_id` that was
/// made with `last_seen` as its newest absorbed version.
pub fn transform_position(
    log: &ChangeLog,
    position: usize,
    doc_id: DocId,
    last_seen: VersionId,
    client_id: ClientId,
) -> usize {
    log.since(last_seen)
        .iter()
        .filter(|record| record.doc_id == doc_id && record.client_id != client_id)
        .fold(position, |p, record| match &record.change {
            Change::Insert {
                position: ip, text, ..
            } => {
                if *ip <= p {
                    p.saturating_add(text.chars().count())
                } else {
                    p
                }
            }
            Change::Delete {
                position: dp,
                num_chars: n,
            } => {
                if dp.saturating_add(*n) <= p {
                    p - n
                } else if *dp < p {
                    *dp
                } else {
                    p
                }
            }
            Change::NewDoc { .. } | Change::StyleChange { .. } => p,
        })
}

/// Transform an Insert or Delete to its final position. Other changes are
/// returned unchanged.
pub fn transform_change(
    log: &ChangeLog,
    change: &Change,
    doc_id: DocId,
    last_seen: VersionId,
    client_id: ClientId,
) -> Change {
    match change {
        Change::Insert { position, .. } | Change::Delete { position, .. } => change.at(
            transform_position(log, *position, doc_id, last_seen, client_id),
        ),
        Change::NewDoc { .. } | Change::StyleChange { .. } => change.clone(),
    }
}
