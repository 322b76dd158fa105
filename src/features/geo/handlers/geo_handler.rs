use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::geo::dtos::{DistrictListResponse, DivisionListResponse, UpazilaListResponse};
use crate::features::geo::services::GeoService;
use crate::shared::types::ErrorResponse;

/// List all divisions
#[utoipa::path(
    get,
    path = "/api/geo/divisions",
    responses(
        (status = 200, description = "List of divisions", body = DivisionListResponse),
    ),
    tag = "geo"
)]
pub async fn list_divisions(
    State(service): State<Arc<GeoService>>,
) -> Result<Json<DivisionListResponse>> {
    Ok(Json(DivisionListResponse {
        divisions: service.list_divisions(),
    }))
}

/// List districts of a division
#[utoipa::path(
    get,
    path = "/api/geo/divisions/{division}/districts",
    params(
        ("division" = String, Path, description = "Division name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Districts in the division", body = DistrictListResponse),
        (status = 404, description = "Division not found", body = ErrorResponse)
    ),
    tag = "geo"
)]
pub async fn list_districts(
    State(service): State<Arc<GeoService>>,
    Path(division): Path<String>,
) -> Result<Json<DistrictListResponse>> {
    let districts = service.list_districts(&division)?;
    Ok(Json(DistrictListResponse { districts }))
}

/// List upazilas of a district
#[utoipa::path(
    get,
    path = "/api/geo/districts/{district}/upazilas",
    params(
        ("district" = String, Path, description = "District name (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Upazilas in the district", body = UpazilaListResponse),
        (status = 404, description = "District not found", body = ErrorResponse)
    ),
    tag = "geo"
)]
pub async fn list_upazilas(
    State(service): State<Arc<GeoService>>,
    Path(district): Path<String>,
) -> Result<Json<UpazilaListResponse>> {
    let (district, upazilas) = service.list_upazilas(&district)?;
    Ok(Json(UpazilaListResponse { district, upazilas }))
}
