use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

struct ErrorEvent<'a> {
    status: u16,
    method: &'a str,
    uri: &'a str,
    request_id: &'a str,
    latency_ms: u64,
}

/// Logs every 4xx/5xx response with a preview of its body. The body is
/// buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let event = ErrorEvent {
        status: status.as_u16(),
        method: &method,
        uri: &uri,
        request_id: &request_id,
        latency_ms: start.elapsed().as_millis() as u64,
    };
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, preview)) => {
            event.log(&preview);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            event.log_unreadable(&err);
            Response::from_parts(parts, Body::empty())
        }
    }
}

async fn buffer_body(body: Body) -> Result<(Bytes, String), AxumError> {
    let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES).await?;
    Ok((bytes.clone(), preview(&bytes)))
}

fn preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

impl ErrorEvent<'_> {
    fn log(&self, body: &str) {
        let ErrorEvent {
            status,
            method,
            uri,
            request_id,
            latency_ms,
        } = *self;
        if status >= 500 {
            tracing::error!(status, method, uri, request_id, latency_ms, body, "Request failed");
        } else {
            tracing::warn!(status, method, uri, request_id, latency_ms, body, "Request rejected");
        }
    }

    fn log_unreadable(&self, err: &AxumError) {
        let ErrorEvent {
            status,
            method,
            uri,
            request_id,
            latency_ms,
        } = *self;
        if status >= 500 {
            tracing::error!(
                status,
                method,
                uri,
                request_id,
                latency_ms,
                error = ?err,
                "Failed to read error response body"
            );
        } else {
            tracing::warn!(
                status,
                method,
                uri,
                request_id,
                latency_ms,
                error = ?err,
                "Failed to read error response body"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_logged_whole() {
        let bytes = Bytes::from_static(br#"{"error":"nope"}"#);
        assert_eq!(preview(&bytes), r#"{"error":"nope"}"#);
    }

    #[test]
    fn long_bodies_are_truncated() {
        let bytes = Bytes::from(vec![b'a'; MAX_LOGGED_BODY_BYTES + 10]);
        let text = preview(&bytes);
        let suffix = format!("(truncated, {} bytes total)", MAX_LOGGED_BODY_BYTES + 10);
        assert!(text.ends_with(&suffix));
        assert!(text.starts_with(&"a".repeat(MAX_LOGGED_BODY_BYTES)));
    }
}
