use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_DONOR, ROLE_VOLUNTEER};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
    /// Session UID (only present for interactive OIDC flows, not for token exchange)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Capability tier used by the request lifecycle.
///
/// Only two tiers matter for blood requests: admins may mutate status, everybody
/// else gets the donor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Admin,
    Donor,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    pub fn is_volunteer(&self) -> bool {
        self.has_role(ROLE_VOLUNTEER)
    }

    pub fn is_donor(&self) -> bool {
        self.has_role(ROLE_DONOR)
    }

    pub fn caller_role(&self) -> CallerRole {
        if self.is_admin() {
            CallerRole::Admin
        } else {
            CallerRole::Donor
        }
    }

    /// Highest named role, reported back in 403 responses
    pub fn primary_role(&self) -> Option<String> {
        if self.is_admin() {
            Some(ROLE_ADMIN.to_string())
        } else if self.is_volunteer() {
            Some(ROLE_VOLUNTEER.to_string())
        } else if self.is_donor() {
            Some(ROLE_DONOR.to_string())
        } else {
            self.roles.first().cloned()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}
