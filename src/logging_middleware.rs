// src/logging_middleware.rs
//! Middleware for logging JSON request and response bodies at debug level

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, enabled, Level};

/// Bodies larger than this are passed through unlogged
const MAX_LOGGED_BODY: usize = 64 * 1024;

/// Only JSON bodies are buffered; multipart uploads and served files stream through
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

fn small_enough(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map(|len| len <= MAX_LOGGED_BODY)
        .unwrap_or(true)
}

fn pretty(bytes: &[u8]) -> Option<String> {
    let body_str = std::str::from_utf8(bytes).ok()?;
    let pretty = serde_json::from_str::<serde_json::Value>(body_str)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body_str.to_string());
    Some(pretty)
}

/// Logs JSON request and response bodies when debug logging is enabled
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_json(request.headers()) && small_enough(request.headers()) {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

        if let Some(body) = pretty(&bytes).filter(|b| !b.is_empty()) {
            debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "Request");
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        debug!(method = %request.method(), uri = %request.uri(), "Request (body not logged)");
        request
    };

    let response = next.run(request).await;

    if !is_json(response.headers()) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if bytes.len() <= MAX_LOGGED_BODY {
        if let Some(body) = pretty(&bytes).filter(|b| !b.is_empty()) {
            debug!(status = %parts.status, response_body = %body, "Response");
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_only_json_bodies_are_buffered() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=x"),
        );
        assert!(!is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));
    }

    #[test]
    fn test_large_declared_bodies_are_skipped() {
        let mut headers = HeaderMap::new();
        assert!(small_enough(&headers));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("10485760"));
        assert!(!small_enough(&headers));
    }

    #[test]
    fn test_pretty_prints_json() {
        assert_eq!(pretty(br#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(pretty(b"plain").unwrap(), "plain");
        assert!(pretty(&[0xff, 0xfe]).is_none());
    }
}
