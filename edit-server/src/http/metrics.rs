//! Prometheus metrics endpoint.

use crate::reconciler::Reconciler;
use axum::{http::header::CONTENT_TYPE, response::IntoResponse, Extension};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Prometheus metrics handler.
///
/// Returns metrics in Prometheus text format.
/// Includes both gauges (current state) and counters (monotonic since startup).
pub async fn metrics_handler(
    Extension(reconciler): Extension<Arc<Reconciler>>,
) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        render(&reconciler).await,
    )
}

async fn render(reconciler: &Reconciler) -> String {
    let m = reconciler.metrics();

    // Gauges — current state
    let clients = reconciler.clients_connected();
    let documents = reconciler.document_count().await;
    let head = reconciler.head().await.value();

    // Counters — monotonic since startup
    let connects = m.connects_total.load(Ordering::Relaxed);
    let posts = m.posts_total.load(Ordering::Relaxed);
    let rejected = m.posts_rejected.load(Ordering::Relaxed);
    let ignored = m.posts_ignored.load(Ordering::Relaxed);
    let polls = m.polls_total.load(Ordering::Relaxed);
    let served = m.records_served.load(Ordering::Relaxed);

    format!(
        r#"# HELP quill_clients_connected Client ids handed out
# TYPE quill_clients_connected gauge
quill_clients_connected {clients}

# HELP quill_documents Number of documents
# TYPE quill_documents gauge
quill_documents {documents}

# HELP quill_log_head Newest change log version
# TYPE quill_log_head gauge
quill_log_head {head}

# HELP quill_info Server information
# TYPE quill_info gauge
quill_info{{version="{version}"}} 1

# HELP quill_connects_total Total connect requests handled
# TYPE quill_connects_total counter
quill_connects_total {connects}

# HELP quill_posts_total Total change requests received
# TYPE quill_posts_total counter
quill_posts_total {posts}

# HELP quill_posts_rejected_total Change requests rejected as malformed
# TYPE quill_posts_rejected_total counter
quill_posts_rejected_total {rejected}

# HELP quill_posts_ignored_total Change requests for unknown documents
# TYPE quill_posts_ignored_total counter
quill_posts_ignored_total {ignored}

# HELP quill_polls_total Total get requests served
# TYPE quill_polls_total counter
quill_polls_total {polls}

# HELP quill_records_served_total Total change records returned by get
# TYPE quill_records_served_total counter
quill_records_served_total {served}
"#,
        version = env!("CARGO_PKG_VERSION"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn render_reports_counters() {
        let reconciler = Reconciler::new(Config::default());
        reconciler.connect();
        reconciler.connect();

        let body = render(&reconciler).await;

        assert!(body.contains("# TYPE quill_log_head gauge"));
        assert!(body.contains("quill_clients_connected 2\n"));
        assert!(body.contains("quill_connects_total 2\n"));
        assert!(body.contains("quill_posts_total 0\n"));
    }
}
