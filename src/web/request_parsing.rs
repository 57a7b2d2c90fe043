// Request parsing utilities for HTTP requests

use hyper::body::{Bytes, HttpBody};
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Request};
use serde_json::Value;

use super::error::ServiceError;

/// Largest request body accepted, in bytes. A feature record is a few hundred.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Reject requests whose Content-Type is not JSON (`application/json` or `application/*+json`).
pub fn require_json_content_type(req: &Request<Body>) -> Result<(), ServiceError> {
    let mime = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let is_json = mime == "application/json"
        || (mime.starts_with("application/") && mime.ends_with("+json"));
    if is_json {
        Ok(())
    } else {
        Err(ServiceError::InputError(
            "Did not attempt to load JSON data because the request Content-Type was not 'application/json'."
                .to_string(),
        ))
    }
}

/// Read the whole request body, up to `MAX_BODY_BYTES`.
pub async fn read_body(req: Request<Body>) -> Result<Bytes, ServiceError> {
    let too_large = || {
        ServiceError::InputError(format!(
            "Request body exceeds the {MAX_BODY_BYTES} byte limit"
        ))
    };

    let mut body = req.into_body();
    // Content-Length, when sent, is the exact lower bound
    if body.size_hint().lower() > MAX_BODY_BYTES as u64 {
        return Err(too_large());
    }

    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk
            .map_err(|e| ServiceError::InputError(format!("Failed to read request body: {e}")))?;
        if buf.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buf))
}

/// Parse a request body as a single JSON document.
pub fn parse_json_value(bytes: &[u8]) -> Result<Value, ServiceError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::InputError("Request body is empty".to_string()));
    }
    serde_json::from_slice(bytes).map_err(|e| ServiceError::InputError(format!("Invalid JSON format: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content_type: Option<&str>, body: Body) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/predict");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(body).unwrap()
    }

    #[test]
    fn test_parse_json_value_object() {
        let value = parse_json_value(br#"{"DM": 90.1, "CP": "12"}"#).unwrap();
        assert_eq!(value["DM"], 90.1);
        assert_eq!(value["CP"], "12");
    }

    #[test]
    fn test_parse_json_value_invalid() {
        let err = parse_json_value(b"{not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_parse_json_value_empty() {
        let err = parse_json_value(b"  \n").unwrap_err();
        assert_eq!(err.to_string(), "Request body is empty");
    }

    #[test]
    fn test_json_content_types_accepted() {
        for ct in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON",
            "application/vnd.api+json",
        ] {
            assert!(
                require_json_content_type(&request(Some(ct), Body::empty())).is_ok(),
                "{ct}"
            );
        }
    }

    #[test]
    fn test_other_content_types_rejected() {
        for ct in [Some("text/plain"), Some("application/x-www-form-urlencoded"), None] {
            let err = require_json_content_type(&request(ct, Body::empty())).unwrap_err();
            assert!(matches!(err, ServiceError::InputError(_)));
            assert!(err.to_string().contains("application/json"));
        }
    }

    #[tokio::test]
    async fn test_read_body() {
        let req = request(None, Body::from("{}"));
        assert_eq!(&read_body(req).await.unwrap()[..], b"{}");
    }

    #[tokio::test]
    async fn test_read_body_rejects_oversized_body() {
        let req = request(None, Body::from(vec![b' '; MAX_BODY_BYTES + 1]));
        let err = read_body(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::InputError(_)));
        assert!(err.to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_read_body_rejects_oversized_stream() {
        // No declared length: the limit is enforced while reading chunks.
        let (mut sender, body) = Body::channel();
        tokio::spawn(async move {
            for _ in 0..=MAX_BODY_BYTES / 1024 {
                if sender.send_data(Bytes::from(vec![b' '; 1024])).await.is_err() {
                    break;
                }
            }
        });
        let err = read_body(request(None, body)).await.unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_read_body_at_limit() {
        let req = request(None, Body::from(vec![b' '; MAX_BODY_BYTES]));
        assert_eq!(read_body(req).await.unwrap().len(), MAX_BODY_BYTES);
    }
}
