//! HTTP request/response tracing middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Opens an `INFO` span per request, tagged with the worker id.
#[derive(Debug, Clone, Copy)]
pub struct WorkerMakeSpan {
    worker_id: Option<usize>,
}

impl<B> MakeSpan<B> for WorkerMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            worker = ?self.worker_id,
        )
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// Responses are logged at `INFO` with status and latency in milliseconds:
///
/// ```text
/// INFO request{method=GET uri=/1 version=HTTP/1.1 worker=Some(2)}: finished processing request latency=1 ms status=301
/// ```
pub fn layer(
    worker_id: Option<usize>,
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, WorkerMakeSpan> {
    TraceLayer::new_for_http()
        .make_span_with(WorkerMakeSpan { worker_id })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
