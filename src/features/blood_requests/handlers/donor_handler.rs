use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, LenientQuery};
use crate::features::auth::model::{AuthenticatedUser, CallerRole};
use crate::features::blood_requests::dtos::{
    CreateBloodRequestDto, RequestFilterDto, RequestListResponse, RequestResponse,
};
use crate::features::blood_requests::services::BloodRequestService;
use crate::shared::types::ErrorResponse;

/// List blood requests (donor view, open requests by default)
#[utoipa::path(
    get,
    path = "/api/donor/requests",
    params(RequestFilterDto),
    responses(
        (status = 200, description = "Requests with summary stats", body = RequestListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "donor"
)]
pub async fn list_requests(
    user: AuthenticatedUser,
    State(service): State<Arc<BloodRequestService>>,
    LenientQuery(filter): LenientQuery<RequestFilterDto>,
) -> Result<Json<RequestListResponse>> {
    let response = service
        .list_requests(&filter, CallerRole::Donor, Some(&user.account_id))
        .await?;
    Ok(Json(response))
}

/// Submit a new blood request
#[utoipa::path(
    post,
    path = "/api/donor/requests",
    request_body = CreateBloodRequestDto,
    responses(
        (status = 201, description = "Request created as pending", body = RequestResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "donor"
)]
pub async fn create_request(
    user: AuthenticatedUser,
    State(service): State<Arc<BloodRequestService>>,
    AppJson(dto): AppJson<CreateBloodRequestDto>,
) -> Result<(StatusCode, Json<RequestResponse>)> {
    let request = service.create_request(dto, Some(&user)).await?;
    Ok((StatusCode::CREATED, Json(RequestResponse { request })))
}

/// Get an open request, or one of the caller's own
#[utoipa::path(
    get,
    path = "/api/donor/requests/{id}",
    params(
        ("id" = String, Path, description = "Blood request ID")
    ),
    responses(
        (status = 200, description = "Request found", body = RequestResponse),
        (status = 404, description = "Request not found or not visible", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "donor"
)]
pub async fn get_request(
    user: AuthenticatedUser,
    State(service): State<Arc<BloodRequestService>>,
    Path(id): Path<String>,
) -> Result<Json<RequestResponse>> {
    let request = service
        .get_request(&id, CallerRole::Donor, Some(&user.account_id))
        .await?;
    Ok(Json(RequestResponse { request }))
}
