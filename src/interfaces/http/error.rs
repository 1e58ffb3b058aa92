//! Error responder — maps resolution failures to HTTP responses
//!
//! The mapping is identical for every pipeline: same kind, same status,
//! same body shape. Error responses always close the connection.
//!
//! | kind              | status | body                                  |
//! |-------------------|--------|---------------------------------------|
//! | TooFewSegments    | 400    | empty                                 |
//! | InvalidIdentifier | 400    | `{"description":"Invalid <Kind>Id!"}` |
//! | EntityNotFound    | 404    | `{"description":"Unknown <Kind>Id!"}` |

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::application::resolve::{FailureKind, ResolutionFailure};
use crate::domain::DomainError;

/// Server identity sent on every rendered error response
pub const SERVER_IDENTITY: &str = concat!("RoamingHub/", env!("CARGO_PKG_VERSION"));

/// Current timestamp in IMF-fixdate form for the `Date` header
fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

impl IntoResponse for ResolutionFailure {
    fn into_response(self) -> Response {
        let kind_label = match self.kind {
            FailureKind::TooFewSegments => "too_few_segments",
            FailureKind::InvalidIdentifier => "invalid_identifier",
            FailureKind::EntityNotFound => "entity_not_found",
        };
        metrics::counter!("resolution_failures_total", "kind" => kind_label).increment(1);

        let common = [
            (header::SERVER, SERVER_IDENTITY.to_string()),
            (header::DATE, http_date()),
            (header::CONNECTION, "close".to_string()),
        ];

        match self.kind {
            FailureKind::TooFewSegments => {
                (StatusCode::BAD_REQUEST, common, ()).into_response()
            }
            FailureKind::InvalidIdentifier => (
                StatusCode::BAD_REQUEST,
                common,
                Json(json!({
                    "description": format!("Invalid {}Id!", self.entity_kind.name())
                })),
            )
                .into_response(),
            FailureKind::EntityNotFound => (
                StatusCode::NOT_FOUND,
                common,
                Json(json!({
                    "description": format!("Unknown {}Id!", self.entity_kind.name())
                })),
            )
                .into_response(),
        }
    }
}

/// Render a domain operation error. Same header discipline as resolution
/// failures.
pub fn domain_error_response(err: &DomainError) -> Response {
    let status = match err {
        DomainError::NotFound { .. } | DomainError::NoActiveSession(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidId(_) | DomainError::InvalidCdr(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) | DomainError::EvseOutOfService(_) => StatusCode::CONFLICT,
        DomainError::Seed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        [
            (header::SERVER, SERVER_IDENTITY.to_string()),
            (header::DATE, http_date()),
            (header::CONNECTION, "close".to_string()),
        ],
        Json(json!({ "description": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::directory::EntityDirectory;
    use crate::application::resolve::{resolve, RN, RN_POOL, RN_SESSION};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Option<serde_json::Value> {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).expect("json body"))
        }
    }

    #[tokio::test]
    async fn too_few_segments_renders_empty_400() {
        let directory = EntityDirectory::new();
        let failure = resolve(&directory, RN, &[]).unwrap_err();
        let response = failure.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONNECTION).map(|v| v.as_bytes()),
            Some(&b"close"[..])
        );
        assert!(response.headers().contains_key(header::SERVER));
        assert!(response.headers().contains_key(header::DATE));
        assert!(body_json(response).await.is_none());
    }

    #[tokio::test]
    async fn invalid_identifier_names_the_kind() {
        let directory = EntityDirectory::new();
        let failure = resolve(&directory, RN, &["!!invalid!!"]).unwrap_err();
        let response = failure.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .map(|v| v.to_str().unwrap_or_default()),
            Some("application/json")
        );
        let body = body_json(response).await.expect("json body");
        assert_eq!(body["description"], "Invalid RoamingNetworkId!");
    }

    #[tokio::test]
    async fn unknown_pool_renders_404_with_kind_name() {
        let directory = EntityDirectory::new();
        let network = std::sync::Arc::new(crate::domain::models::RoamingNetwork::new(
            crate::domain::identifiers::RoamingNetworkId::parse("DE*GEF").expect("id"),
            "Prod",
        ));
        directory.add_network(network);

        let failure = resolve(&directory, RN_POOL, &["DE*GEF", "UNKNOWNPOOL"]).unwrap_err();
        let response = failure.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await.expect("json body");
        assert_eq!(body["description"], "Unknown ChargingPoolId!");
    }

    #[tokio::test]
    async fn rendering_is_uniform_across_pipelines() {
        let directory = EntityDirectory::new();

        // same failing root, three different pipelines: identical response
        for pipeline in [RN, RN_POOL, RN_SESSION] {
            let segments: Vec<&str> = std::iter::repeat("!!bad!!")
                .take(pipeline.len())
                .collect();
            let failure = resolve(&directory, pipeline, &segments).unwrap_err();
            let response = failure.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await.expect("json body");
            assert_eq!(body["description"], "Invalid RoamingNetworkId!");
        }
    }
}
