use crate::core::error::Result;
use crate::features::auth::dto::{MeEnvelope, MeResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ErrorResponse;
use axum::Json;

/// Resolve the identity behind the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = MeEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<MeEnvelope>> {
    Ok(Json(MeEnvelope {
        user: MeResponseDto::from(user),
    }))
}
