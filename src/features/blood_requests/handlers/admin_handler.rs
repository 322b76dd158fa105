use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, LenientQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::CallerRole;
use crate::features::blood_requests::dtos::{
    RequestFilterDto, RequestListResponse, RequestResponse, UpdateRequestStatusDto,
};
use crate::features::blood_requests::services::BloodRequestService;
use crate::shared::types::ErrorResponse;

/// List all blood requests (admin view)
#[utoipa::path(
    get,
    path = "/api/admin/requests",
    params(RequestFilterDto),
    responses(
        (status = 200, description = "Requests with full stats", body = RequestListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_requests(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BloodRequestService>>,
    LenientQuery(filter): LenientQuery<RequestFilterDto>,
) -> Result<Json<RequestListResponse>> {
    let response = service
        .list_requests(&filter, CallerRole::Admin, Some(&user.account_id))
        .await?;
    Ok(Json(response))
}

/// Change the status of a blood request
#[utoipa::path(
    put,
    path = "/api/admin/requests",
    request_body = UpdateRequestStatusDto,
    responses(
        (status = 200, description = "Status changed", body = RequestResponse),
        (status = 400, description = "Invalid target status", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 409, description = "Transition not allowed from the current status", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_request_status(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BloodRequestService>>,
    AppJson(dto): AppJson<UpdateRequestStatusDto>,
) -> Result<Json<RequestResponse>> {
    let request = service.update_status(dto, &user).await?;
    Ok(Json(RequestResponse { request }))
}

/// Get any blood request by ID
#[utoipa::path(
    get,
    path = "/api/admin/requests/{id}",
    params(
        ("id" = String, Path, description = "Blood request ID")
    ),
    responses(
        (status = 200, description = "Request found", body = RequestResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_request(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<BloodRequestService>>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>> {
    let request = service
        .get_request(&id, CallerRole::Admin, Some(&user.account_id))
        .await?;
    Ok(Json(RequestResponse { request }))
}
