use std::convert::Infallible;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor whose rejections use the `{error}` body of `AppError`
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(json_rejection_to_error)
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        // Well-formed JSON with a wrong field type, e.g. `"units": "two"`
        JsonRejection::JsonDataError(err) => {
            AppError::BadRequest(format!("Invalid request body: {}", err.body_text()))
        }
        JsonRejection::JsonSyntaxError(err) => {
            AppError::BadRequest(format!("Invalid JSON syntax: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected Content-Type: application/json".to_string())
        }
        other => AppError::BadRequest(format!("Failed to read request body: {}", other)),
    }
}

/// Query string extractor that never rejects.
///
/// A query string that fails to deserialize as a whole (a repeated key, for
/// instance) yields `T::default()`, i.e. no filters.
pub struct LenientQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!("Ignoring malformed query string: {}", rejection.body_text());
                Ok(Self(T::default()))
            }
        }
    }
}

/// Reads the user placed in request extensions by the auth middleware
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Deserialize)]
    struct Body {
        units: i32,
    }

    async fn echo(AppJson(body): AppJson<Body>) -> String {
        body.units.to_string()
    }

    fn server() -> TestServer {
        TestServer::new(Router::new().route("/echo", post(echo))).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let response = server().post("/echo").json(&json!({ "units": 3 })).await;
        response.assert_status_ok();
        response.assert_text("3");
    }

    #[tokio::test]
    async fn test_wrong_type_is_error_body() {
        let response = server()
            .post("/echo")
            .json(&json!({ "units": "three" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_syntax_error() {
        let response = server()
            .post("/echo")
            .bytes("{ units: ".into())
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[derive(Deserialize, Default)]
    struct Filter {
        status: Option<String>,
    }

    async fn status(LenientQuery(filter): LenientQuery<Filter>) -> String {
        filter.status.unwrap_or_else(|| "none".to_string())
    }

    #[tokio::test]
    async fn test_lenient_query() {
        let server = TestServer::new(Router::new().route("/list", axum::routing::get(status)))
            .unwrap();

        server.get("/list?status=open").await.assert_text("open");
        server.get("/list").await.assert_text("none");

        // Duplicate keys fail to deserialize and fall back to the default
        let response = server.get("/list?status=all&status=pending").await;
        response.assert_status_ok();
        response.assert_text("none");
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        async fn me(user: AuthenticatedUser) -> String {
            user.account_id
        }

        let server = TestServer::new(Router::new().route("/me", axum::routing::get(me))).unwrap();
        server
            .get("/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
