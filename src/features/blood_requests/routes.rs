use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::blood_requests::handlers::{admin_handler, donor_handler};
use crate::features::blood_requests::services::BloodRequestService;

/// Create routes for the blood requests feature
///
/// Note: This feature requires authentication. Admin routes also require the
/// admin role.
pub fn routes(service: Arc<BloodRequestService>) -> Router {
    Router::new()
        .route(
            "/api/admin/requests",
            get(admin_handler::list_requests).put(admin_handler::update_request_status),
        )
        .route("/api/admin/requests/{id}", get(admin_handler::get_request))
        .route(
            "/api/donor/requests",
            get(donor_handler::list_requests).post(donor_handler::create_request),
        )
        .route("/api/donor/requests/{id}", get(donor_handler::get_request))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::blood_requests::repositories::InMemoryBloodRequestRepository;
    use crate::features::geo::GeoService;
    use crate::shared::test_helpers::{
        create_admin_user, create_donor_user, create_volunteer_user, with_user,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn service() -> Arc<BloodRequestService> {
        Arc::new(BloodRequestService::new(
            Arc::new(InMemoryBloodRequestRepository::new()),
            Arc::new(GeoService::bangladesh().unwrap()),
        ))
    }

    fn server_as(service: &Arc<BloodRequestService>, user: AuthenticatedUser) -> TestServer {
        TestServer::new(with_user(routes(service.clone()), user)).unwrap()
    }

    fn new_request() -> Value {
        json!({
            "patientName": "Rahima Begum",
            "bloodGroup": "B+",
            "units": 2,
            "urgency": "urgent",
            "hospital": "Dhaka Medical College Hospital",
            "division": "Dhaka",
            "district": "Dhaka",
            "contactNumber": "01711-223344"
        })
    }

    async fn submit(server: &TestServer) -> String {
        let response = server.post("/api/donor/requests").json(&new_request()).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        body["request"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_unauthenticated_is_rejected() {
        let server = TestServer::new(routes(service())).unwrap();

        let response = server.get("/api/donor/requests").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.get("/api/admin/requests").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_and_fulfil() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());
        let admin = server_as(&svc, create_admin_user());

        let id = submit(&donor).await;

        let response = admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": id, "status": "fulfilled" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["request"]["status"], "fulfilled");
        assert_eq!(body["request"]["fulfilledBy"], "test-admin");
        assert!(body["request"]["fulfilledAt"].is_string());

        // Fulfilled requests leave the donor's default listing
        let listed: Value = donor.get("/api/donor/requests").await.json();
        assert_eq!(listed["requests"].as_array().unwrap().len(), 0);
        assert_eq!(listed["stats"]["total"], 1);
        assert_eq!(listed["stats"]["fulfilled"], 1);
        assert!(listed["stats"].get("cancelled").is_none());
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());

        let mut body = new_request();
        body["bloodGroup"] = json!("X+");
        let response = donor.post("/api/donor/requests").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert!(error["error"].as_str().unwrap().contains("bloodGroup"));

        let mut body = new_request();
        body["units"] = json!(0);
        let response = donor.post("/api/donor/requests").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());

        let response = donor
            .post("/api/donor/requests")
            .json(&json!({ "units": "two" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_admin_gets_current_role() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());
        let volunteer = server_as(&svc, create_volunteer_user());

        let id = submit(&donor).await;

        let response = volunteer
            .put("/api/admin/requests")
            .json(&json!({ "requestId": id, "status": "fulfilled" }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["currentRole"], "volunteer");

        let response = donor.get("/api/admin/requests").await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["currentRole"], "donor");

        // Still pending
        let fetched: Value = donor.get(&format!("/api/donor/requests/{}", id)).await.json();
        assert_eq!(fetched["request"]["status"], "pending");
    }

    #[tokio::test]
    async fn test_terminal_transition_conflict() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());
        let admin = server_as(&svc, create_admin_user());

        let id = submit(&donor).await;
        admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": id, "status": "cancelled" }))
            .await
            .assert_status_ok();

        let response = admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": id, "status": "fulfilled" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], "Cannot change status from cancelled to fulfilled");
    }

    #[tokio::test]
    async fn test_update_status_bad_target_and_unknown_id() {
        let svc = service();
        let admin = server_as(&svc, create_admin_user());

        let unknown = "0190a0b0-0000-7000-8000-000000000000";

        let response = admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": unknown, "status": "pending" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": unknown, "status": "active" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_listing_filters_and_stats() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());
        let admin = server_as(&svc, create_admin_user());

        submit(&donor).await;
        let mut other = new_request();
        other["bloodGroup"] = json!("AB-");
        other["urgency"] = json!("normal");
        donor.post("/api/donor/requests").json(&other).await;

        let response = admin
            .get("/api/admin/requests")
            .add_query_param("bloodGroup", "AB-")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["bloodGroup"], "AB-");
        // Admins see requester contact details
        assert_eq!(requests[0]["requesterEmail"], "test-donor@example.com");

        assert_eq!(body["stats"]["total"], 2);
        assert_eq!(body["stats"]["pending"], 2);
        assert_eq!(body["stats"]["active"], 0);
        assert_eq!(body["stats"]["urgent"], 1);
    }

    #[tokio::test]
    async fn test_repeated_filter_key_falls_back_to_defaults() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());
        let admin = server_as(&svc, create_admin_user());

        let open = submit(&donor).await;
        let closed = submit(&donor).await;
        admin
            .put("/api/admin/requests")
            .json(&json!({ "requestId": closed, "status": "cancelled" }))
            .await
            .assert_status_ok();

        let response = donor.get("/api/donor/requests?status=all&status=pending").await;
        response.assert_status_ok();

        // Same as an unfiltered donor listing: open requests only
        let body: Value = response.json();
        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["id"], open.as_str());
        assert_eq!(body["stats"]["total"], 2);

        let response = admin.get("/api/admin/requests?bloodGroup=B%2B&bloodGroup=O-").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["requests"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_donor_cannot_see_others_contact_details() {
        let svc = service();
        let owner = server_as(&svc, create_donor_user());
        let mut stranger_user = create_donor_user();
        stranger_user.account_id = "someone-else".to_string();
        let stranger = server_as(&svc, stranger_user);

        let id = submit(&owner).await;

        let body: Value = stranger
            .get(&format!("/api/donor/requests/{}", id))
            .await
            .json();
        assert_eq!(body["request"]["requesterName"], "test-donor name");
        assert!(body["request"].get("requesterEmail").is_none());
        assert!(body["request"].get("requesterMobile").is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_request() {
        let svc = service();
        let donor = server_as(&svc, create_donor_user());

        donor
            .get("/api/donor/requests/not-a-uuid")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
