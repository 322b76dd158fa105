//! Role-based authorization guards for the application.
//!
//! These guards extract the authenticated user and verify they have the required roles.
//!
//! Roles:
//! - admin: sees every blood request and may change request status
//! - volunteer: coordinates donations, same request rights as a donor
//! - donor: browses open requests and submits new ones
//!
//! Any authenticated user gets the donor view; only admins pass `RequireAdmin`.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for checking if user is an admin.
///
/// Rejects with 403 and the caller's current role otherwise.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden {
                message: "Admin access required".to_string(),
                current_role: user.primary_role(),
            });
        }

        Ok(RequireAdmin(user.clone()))
    }
}
