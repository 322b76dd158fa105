use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub user_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    /// Highest named role (admin > volunteer > donor)
    pub role: Option<String>,
    pub is_admin: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            role: user.primary_role(),
            is_admin: user.is_admin(),
            user_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

/// Envelope for /api/auth/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeEnvelope {
    pub user: MeResponseDto,
}
