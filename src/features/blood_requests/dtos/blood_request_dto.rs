use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::CallerRole;
use crate::features::blood_requests::models::{
    BloodGroup, BloodRequest, BloodRequestStatus, RequestCounts, Urgency,
};

// =============================================================================
// QUERY DTOs
// =============================================================================

/// Query params for listing blood requests.
///
/// Every field is a raw string: unrecognized values are ignored instead of
/// rejected.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RequestFilterDto {
    /// A+, A-, B+, B-, AB+, AB-, O+ or O-
    pub blood_group: Option<String>,
    /// pending, active, fulfilled, cancelled, open or all.
    /// Donor listings default to open requests.
    pub status: Option<String>,
    /// urgent or normal
    pub urgency: Option<String>,
    /// Division name
    pub division: Option<String>,
    /// District name
    pub district: Option<String>,
    /// Case-insensitive search over patient, hospital, address and contact
    pub search: Option<String>,
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request DTO for submitting a blood request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodRequestDto {
    #[validate(length(max = 255, message = "patientName must not exceed 255 characters"))]
    pub patient_name: Option<String>,

    /// One of A+, A-, B+, B-, AB+, AB-, O+, O-
    #[validate(required(message = "bloodGroup is required"))]
    pub blood_group: Option<String>,

    #[validate(
        required(message = "units is required"),
        range(min = 1, message = "units must be at least 1")
    )]
    pub units: Option<i32>,

    /// urgent or normal (default)
    pub urgency: Option<String>,

    #[validate(length(max = 255, message = "hospital must not exceed 255 characters"))]
    pub hospital: Option<String>,

    #[validate(length(max = 100, message = "division must not exceed 100 characters"))]
    pub division: Option<String>,

    #[validate(length(max = 100, message = "district must not exceed 100 characters"))]
    pub district: Option<String>,

    #[validate(length(max = 100, message = "upazila must not exceed 100 characters"))]
    pub upazila: Option<String>,

    #[validate(length(max = 500, message = "address must not exceed 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 2000, message = "description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "contactPerson must not exceed 255 characters"))]
    pub contact_person: Option<String>,

    #[validate(required(message = "contactNumber is required"))]
    pub contact_number: Option<String>,

    /// Need-by date (YYYY-MM-DD)
    pub required_date: Option<NaiveDate>,
}

/// Request DTO for an admin status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestStatusDto {
    #[serde(default)]
    pub request_id: Option<String>,
    /// active, fulfilled or cancelled
    #[serde(default)]
    pub status: Option<String>,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// Response DTO for a blood request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestDto {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub blood_group: Option<BloodGroup>,
    /// Blood group, or "Unknown"
    pub blood_group_label: String,
    pub units: i32,
    pub urgency: Urgency,
    pub status: BloodRequestStatus,
    pub is_open: bool,
    /// Open and past the required date
    pub is_overdue: bool,
    pub hospital: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_mobile: Option<String>,
    pub required_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_at: Option<DateTime<Utc>>,
}

impl BloodRequestDto {
    /// Shape a request for one viewer.
    ///
    /// Donors only see requester email and mobile on requests they created.
    pub fn for_viewer(
        r: BloodRequest,
        view: CallerRole,
        viewer_id: Option<&str>,
        today: NaiveDate,
    ) -> Self {
        let owns = viewer_id.is_some() && r.requester_id.as_deref() == viewer_id;
        let show_private = view == CallerRole::Admin || owns;

        Self {
            blood_group_label: r.blood_group_label().to_string(),
            is_open: r.status.is_open(),
            is_overdue: r.is_overdue(today),
            id: r.id,
            patient_name: r.patient_name,
            blood_group: r.blood_group,
            units: r.units,
            urgency: r.urgency,
            status: r.status,
            hospital: r.hospital,
            division: r.division,
            district: r.district,
            upazila: r.upazila,
            address: r.address,
            description: r.description,
            contact_person: r.contact_person,
            contact_number: r.contact_number,
            requester_name: r.requester_name,
            requester_email: r.requester_email.filter(|_| show_private),
            requester_mobile: r.requester_mobile.filter(|_| show_private),
            required_date: r.required_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
            fulfilled_by: r.fulfilled_by,
            fulfilled_at: r.fulfilled_at,
        }
    }
}

/// Aggregate counts shown above request listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatsDto {
    pub total: i64,
    /// Admin: status = pending. Donor: open requests (pending or active).
    pub pending: i64,
    pub fulfilled: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<i64>,
    /// Open requests marked urgent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent: Option<i64>,
}

impl RequestStatsDto {
    pub fn for_view(counts: RequestCounts, view: CallerRole) -> Self {
        match view {
            CallerRole::Admin => Self {
                total: counts.total,
                pending: counts.pending,
                fulfilled: counts.fulfilled,
                active: Some(counts.active),
                cancelled: Some(counts.cancelled),
                urgent: Some(counts.urgent_open),
            },
            CallerRole::Donor => Self {
                total: counts.total,
                pending: counts.open(),
                fulfilled: counts.fulfilled,
                active: None,
                cancelled: None,
                urgent: None,
            },
        }
    }
}

/// Response body for request listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestListResponse {
    pub requests: Vec<BloodRequestDto>,
    pub stats: RequestStatsDto,
}

/// Response body wrapping a single request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestResponse {
    pub request: BloodRequestDto,
}
