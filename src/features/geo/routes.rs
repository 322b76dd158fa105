use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::geo::handlers;
use crate::features::geo::services::GeoService;

/// Create routes for the geo feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<GeoService>) -> Router {
    Router::new()
        .route("/api/geo/divisions", get(handlers::list_divisions))
        .route(
            "/api/geo/divisions/{division}/districts",
            get(handlers::list_districts),
        )
        .route(
            "/api/geo/districts/{district}/upazilas",
            get(handlers::list_upazilas),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    fn server() -> TestServer {
        TestServer::new(routes(Arc::new(GeoService::bangladesh().unwrap()))).unwrap()
    }

    #[tokio::test]
    async fn test_list_divisions() {
        let response = server().get("/api/geo/divisions").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["divisions"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_list_districts_unknown_division() {
        let response = server().get("/api/geo/divisions/Atlantis/districts").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["error"], "Division 'Atlantis' not found");
    }

    #[tokio::test]
    async fn test_list_upazilas() {
        let response = server().get("/api/geo/districts/dhaka/upazilas").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["district"], "Dhaka");
        assert!(body["upazilas"]
            .as_array()
            .unwrap()
            .iter()
            .any(|u| u == "Savar"));
    }
}
