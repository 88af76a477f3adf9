//! Request payload extractors
//!
//! Handlers feed DTO constructors an untyped JSON object. These extractors
//! build that object from the body or the query string and turn malformed
//! input into the usual `{error, message}` 400 instead of axum's plain-text
//! rejections.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts, HeaderMap},
    Form,
};
use bytes::Bytes;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Request body as a JSON object
///
/// Accepts `application/json` and `application/x-www-form-urlencoded`. An
/// empty body yields `{}`.
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

/// Query string as a JSON object of strings
#[derive(Debug, Clone, Default)]
pub struct QueryObject(pub Value);

pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn strings_to_object(map: HashMap<String, String>) -> Value {
    Value::Object(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid form body: {}", e)))?;
            return Ok(Payload(strings_to_object(fields)));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid body: {}", e)))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(Value::Object(Map::new())));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value @ Value::Object(_)) => Ok(Payload(value)),
            Ok(_) => Err(ApiError::BadRequest("Body must be a JSON object".to_string())),
            Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", e))),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(fields) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e)))?;

        Ok(QueryObject(strings_to_object(fields)))
    }
}

/// Overlays `fields` on `base`, replacing existing keys
pub fn merge<I, K>(base: Value, fields: I) -> Value
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut object = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    for (key, value) in fields {
        object.insert(key.into(), value);
    }

    Value::Object(object)
}

/// Copies every key of `overlay` onto `base`
pub fn overlay(base: Value, overlay: Value) -> Value {
    match overlay {
        Value::Object(map) => merge(base, map),
        _ => base,
    }
}

/// Parses a path id; malformed ids are a 400
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    async fn payload(content_type: Option<&str>, body: &'static str) -> Result<Value, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        Payload::from_request(request, &()).await.map(|Payload(v)| v)
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_object() {
        assert_eq!(payload(None, "").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_json_body() {
        let value = payload(Some("application/json"), r#"{"name":"Board"}"#).await.unwrap();
        assert_eq!(value["name"], "Board");
    }

    #[tokio::test]
    async fn test_rejects_malformed_and_non_object_json() {
        assert!(matches!(
            payload(Some("application/json"), "{oops").await,
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            payload(Some("application/json"), "[1,2]").await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_form_body() {
        let value = payload(Some("application/x-www-form-urlencoded"), "token=abc&password=123456")
            .await
            .unwrap();
        assert_eq!(value, json!({ "token": "abc", "password": "123456" }));
    }

    #[tokio::test]
    async fn test_query_object() {
        let request = axum::http::Request::builder()
            .uri("/api/tasks?boardId=b&page=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let QueryObject(value) = QueryObject::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(value, json!({ "boardId": "b", "page": "2" }));
    }

    #[test]
    fn test_merge_overrides() {
        let merged = merge(json!({ "userId": "spoofed", "name": "B" }), [("userId", json!("real"))]);
        assert_eq!(merged, json!({ "userId": "real", "name": "B" }));

        let merged = overlay(json!({ "boardId": "body" }), json!({ "boardId": "query" }));
        assert_eq!(merged["boardId"], "query");
    }
}
