use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::logic::Resolver;
use crate::model::{IdentifierClass, MockResponse};
use crate::store::FixtureStore;

pub type AppState<S> = Arc<Resolver<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatternSummary {
    pub pattern: String,
    pub fixture: String,
    pub placeholders: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegistryStatsResponse {
    pub identifiers: BTreeMap<IdentifierClass, usize>,
    pub total: usize,
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub async fn registry_stats<S: FixtureStore>(
    State(resolver): State<AppState<S>>,
) -> Json<RegistryStatsResponse> {
    let identifiers = resolver.registry().stats();
    let total = identifiers.values().sum();
    Json(RegistryStatsResponse { identifiers, total })
}

/// Catalog patterns in declaration order
pub async fn list_patterns<S: FixtureStore>(
    State(resolver): State<AppState<S>>,
) -> Json<ListResponse<PatternSummary>> {
    let items: Vec<PatternSummary> = resolver
        .catalog()
        .iter()
        .map(|entry| PatternSummary {
            pattern: entry.pattern.to_string(),
            fixture: entry.fixture.clone(),
            placeholders: entry
                .pattern
                .placeholder_names()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    Json(ListResponse {
        total: items.len(),
        items,
    })
}

/// Everything that is not an admin route is a mocked director call.
///
/// Reads are answered from fixtures; writes are acknowledged and echo their JSON body.
pub async fn mock_request<S: FixtureStore>(
    State(resolver): State<AppState<S>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path();

    match method {
        Method::GET | Method::HEAD => resolver.resolve(path).await.into_response(),
        Method::POST | Method::PUT | Method::PATCH => {
            let request_data = match parse_request_body(&body) {
                Ok(data) => data,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::new(&format!("Invalid JSON body: {}", e))),
                    )
                        .into_response()
                }
            };

            Json(json!({
                "status": "success",
                "message": format!("Mock {} to {}", method, path),
                "request_data": request_data,
            }))
            .into_response()
        }
        Method::DELETE => Json(json!({
            "status": "success",
            "message": format!("Mock DELETE to {}", path),
        }))
        .into_response(),
        _ => (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(ErrorResponse::new(&format!("Method {} is not mocked", method))),
        )
            .into_response(),
    }
}

/// Empty and `null` bodies become `{}`.
fn parse_request_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }

    match serde_json::from_slice(body)? {
        Value::Null => Ok(json!({})),
        data => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_body() {
        assert_eq!(parse_request_body(b"").unwrap(), json!({}));
        assert_eq!(parse_request_body(b"  \n").unwrap(), json!({}));
        assert_eq!(parse_request_body(b"null").unwrap(), json!({}));
        assert_eq!(
            parse_request_body(br#"{"name": "Hub-Gateways"}"#).unwrap(),
            json!({"name": "Hub-Gateways"})
        );
        assert!(parse_request_body(b"{oops").is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "healthy");
        assert!(!health.timestamp.is_empty());
    }
}
