//! Request logging and panic recovery hooks for the router's layers.

use std::any::Any;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
    response::IntoResponse,
};
use tracing::Span;

use crate::error::ApiError;

pub fn make_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = tracing::field::Empty,
    )
}

/// Logs the outcome of a request; never touches the response.
pub fn log_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    let latency_ms = latency.as_secs_f64() * 1000.0;
    span.record("status", tracing::field::display(status));
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "request completed");
    } else {
        tracing::info!(%status, latency_ms, "request completed");
    }
}

pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let msg = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Unexpected(msg).into_response()
}
