//! Request extractors whose rejections render as `AppError` bodies
//!
//! axum's own `Json`/`Query`/`Path` reject with plain-text 4xx responses;
//! these wrappers keep every failure on the `{ code, message, details }` shape.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

/// JSON body extractor and response
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    let code = match &rejection {
        JsonRejection::JsonDataError(_) if message.contains("missing field") => {
            ErrorCode::RequiredField
        }
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            ErrorCode::InvalidFormat
        }
        _ => ErrorCode::InvalidRequest,
    };
    tracing::debug!(code = %code, "Rejected JSON body: {message}");
    AppError::with_message(code, message)
}

/// Query string extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
            })
    }
}

/// Path parameter extractor
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Path(value)| Self(value))
            .map_err(|rejection: PathRejection| {
                AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::routing::{get, post};
    use http::{StatusCode, header};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Serialize)]
    struct Payload {
        date: String,
        #[serde(default)]
        member_ids: Vec<i64>,
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        active: Option<bool>,
    }

    fn router() -> Router {
        Router::new()
            .route("/echo", post(|Json(p): Json<Payload>| async move { Json(p) }))
            .route(
                "/filter",
                get(|Query(f): Query<Filter>| async move { format!("{:?}", f.active) }),
            )
            .route(
                "/items/{id}",
                get(|Path(id): Path<i64>| async move { id.to_string() }),
            )
    }

    async fn send(request: http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    fn post_json(body: &str) -> http::Request<Body> {
        http::Request::builder()
            .method("POST")
            .uri("/echo")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_field_is_required_field() {
        let (status, body) = send(post_json(r#"{"member_ids":[1]}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 7);
        assert!(body["message"].as_str().unwrap().contains("date"));
    }

    #[tokio::test]
    async fn test_wrong_type_and_bad_syntax_are_invalid_format() {
        let (status, body) = send(post_json(r#"{"date":"2025-03-01","member_ids":"x"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);

        let (status, body) = send(post_json(r#"{"date":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_invalid_request() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from(r#"{"date":"2025-03-01"}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 5);
    }

    #[tokio::test]
    async fn test_valid_body_round_trips_as_json() {
        let (status, body) = send(post_json(r#"{"date":"2025-03-01"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2025-03-01");
        assert_eq!(body["member_ids"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_query_and_path_rejections_are_json() {
        let request = http::Request::builder()
            .uri("/filter?active=maybe")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);

        let request = http::Request::builder()
            .uri("/items/abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 6);
    }
}
