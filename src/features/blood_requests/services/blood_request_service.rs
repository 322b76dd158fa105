use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, CallerRole};
use crate::features::blood_requests::dtos::{
    BloodRequestDto, CreateBloodRequestDto, RequestFilterDto, RequestListResponse,
    RequestStatsDto, UpdateRequestStatusDto,
};
use crate::features::blood_requests::models::{
    BloodGroup, BloodRequest, BloodRequestStatus, NewBloodRequest, PlaceMatch, RequestQuery,
    StatusScope, StatusTransition, Urgency,
};
use crate::features::blood_requests::repositories::BloodRequestRepository;
use crate::features::geo::GeoService;
use crate::shared::constants::STATUS_FILTER_ALL;
use crate::shared::types::non_blank;
use crate::shared::validation::PHONE_REGEX;

/// Service owning the blood request lifecycle
pub struct BloodRequestService {
    repository: Arc<dyn BloodRequestRepository>,
    geo: Arc<GeoService>,
}

/// Trim, and drop empty strings
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl BloodRequestService {
    pub fn new(repository: Arc<dyn BloodRequestRepository>, geo: Arc<GeoService>) -> Self {
        Self { repository, geo }
    }

    // =========================================================================
    // LISTING
    // =========================================================================

    /// Turn raw filter input into a store query.
    ///
    /// Unrecognized values drop out rather than fail. Without a usable status
    /// the donor view falls back to open requests; `status=all` lifts that.
    pub fn build_query(&self, filter: &RequestFilterDto, view: CallerRole) -> RequestQuery {
        let default_scope = match view {
            CallerRole::Admin => StatusScope::Any,
            CallerRole::Donor => StatusScope::Open,
        };

        let status = match non_blank(filter.status.as_deref()) {
            Some(s) if s.eq_ignore_ascii_case(STATUS_FILTER_ALL) => StatusScope::Any,
            Some(s) if s.eq_ignore_ascii_case("open") => StatusScope::Open,
            Some(s) => s
                .parse::<BloodRequestStatus>()
                .map(StatusScope::Only)
                .unwrap_or(default_scope),
            None => default_scope,
        };

        // Not trimmed first: a "+" decoded to a trailing space still parses
        let blood_group = filter
            .blood_group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .and_then(|g| g.parse::<BloodGroup>().ok());

        let urgency =
            non_blank(filter.urgency.as_deref()).and_then(|u| u.parse::<Urgency>().ok());

        let division = non_blank(filter.division.as_deref())
            .and_then(|d| self.geo.division_spellings(d))
            .map(|(name, aliases)| PlaceMatch::new(name, aliases));
        let district = non_blank(filter.district.as_deref())
            .and_then(|d| {
                self.geo
                    .district_spellings(d, division.as_ref().map(|p| p.name.as_str()))
            })
            .map(|(name, aliases)| PlaceMatch::new(name, aliases));

        RequestQuery {
            blood_group,
            status,
            urgency,
            division,
            district,
            search: non_blank(filter.search.as_deref()).map(str::to_string),
            search_requester: view == CallerRole::Admin,
        }
    }

    /// List requests for one view, with stats over the whole collection
    pub async fn list_requests(
        &self,
        filter: &RequestFilterDto,
        view: CallerRole,
        viewer_id: Option<&str>,
    ) -> Result<RequestListResponse> {
        let query = self.build_query(filter, view);
        let requests = self.repository.list(&query).await?;
        let counts = self.repository.counts().await?;

        tracing::debug!(
            "Listed blood requests: view={:?}, matched={}, total={}",
            view,
            requests.len(),
            counts.total
        );

        let today = today();
        Ok(RequestListResponse {
            requests: requests
                .into_iter()
                .map(|r| BloodRequestDto::for_viewer(r, view, viewer_id, today))
                .collect(),
            stats: RequestStatsDto::for_view(counts, view),
        })
    }

    /// Get one request.
    ///
    /// Donors see open requests and their own; anything else reads as missing.
    pub async fn get_request(
        &self,
        request_id: &str,
        view: CallerRole,
        viewer_id: Option<&str>,
    ) -> Result<BloodRequestDto> {
        let request = self.find(request_id).await?;

        let owns = viewer_id.is_some() && request.requester_id.as_deref() == viewer_id;
        if view == CallerRole::Donor && !request.status.is_open() && !owns {
            return Err(not_found(request_id));
        }

        Ok(BloodRequestDto::for_viewer(request, view, viewer_id, today()))
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Submit a new request in `pending`, attributed to the requester if known
    pub async fn create_request(
        &self,
        dto: CreateBloodRequestDto,
        requester: Option<&AuthenticatedUser>,
    ) -> Result<BloodRequestDto> {
        let new = self.to_new_request(dto, requester)?;
        let request = self.repository.insert(new).await?;

        tracing::info!(
            "Blood request created: id={}, group={}, units={}, patient={}, requester={}",
            request.id,
            request.blood_group_label(),
            request.units,
            request.patient_display_name(),
            request.requester_id.as_deref().unwrap_or("-")
        );

        let view = requester.map_or(CallerRole::Donor, |u| u.caller_role());
        let viewer_id = requester.map(|u| u.account_id.as_str());
        Ok(BloodRequestDto::for_viewer(request, view, viewer_id, today()))
    }

    fn to_new_request(
        &self,
        dto: CreateBloodRequestDto,
        requester: Option<&AuthenticatedUser>,
    ) -> Result<NewBloodRequest> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let blood_group = dto
            .blood_group
            .as_deref()
            .unwrap_or_default()
            .parse::<BloodGroup>()
            .map_err(|_| {
                AppError::Validation(
                    "bloodGroup must be one of A+, A-, B+, B-, AB+, AB-, O+, O-".to_string(),
                )
            })?;

        let units = dto
            .units
            .ok_or_else(|| AppError::Validation("units is required".to_string()))?;

        let contact_number = clean(dto.contact_number)
            .ok_or_else(|| AppError::Validation("contactNumber is required".to_string()))?;
        if !PHONE_REGEX.is_match(&contact_number) {
            return Err(AppError::Validation(
                "contactNumber must be a valid phone number".to_string(),
            ));
        }

        let urgency = match non_blank(dto.urgency.as_deref()) {
            Some(u) => u.parse::<Urgency>().map_err(|_| {
                AppError::Validation("urgency must be 'urgent' or 'normal'".to_string())
            })?,
            None => Urgency::default(),
        };

        // Known places are stored under their canonical spelling so filters match
        let division = clean(dto.division)
            .map(|d| self.geo.normalize_division(&d).unwrap_or(d));
        let district = clean(dto.district).map(|d| {
            self.geo
                .normalize_district(&d, division.as_deref())
                .unwrap_or(d)
        });

        Ok(NewBloodRequest {
            patient_name: clean(dto.patient_name),
            blood_group,
            units,
            urgency,
            hospital: clean(dto.hospital),
            division,
            district,
            upazila: clean(dto.upazila),
            address: clean(dto.address),
            description: clean(dto.description),
            contact_person: clean(dto.contact_person),
            contact_number,
            requester_id: requester.map(|u| u.account_id.clone()),
            requester_name: requester.and_then(|u| u.name.clone()),
            requester_email: requester.and_then(|u| u.email.clone()),
            requester_mobile: requester.and_then(|u| u.phone_number.clone()),
            required_date: dto.required_date,
        })
    }

    // =========================================================================
    // STATUS LIFECYCLE
    // =========================================================================

    /// Apply an admin status change.
    ///
    /// Checks run in order: caller role, target status, request existence,
    /// transition table. A rejected change leaves the request untouched.
    pub async fn update_status(
        &self,
        dto: UpdateRequestStatusDto,
        caller: &AuthenticatedUser,
    ) -> Result<BloodRequestDto> {
        if caller.caller_role() != CallerRole::Admin {
            return Err(AppError::Forbidden {
                message: "Only admins can change request status".to_string(),
                current_role: caller.primary_role(),
            });
        }

        let target = parse_target_status(dto.status.as_deref())?;

        // A missing id resolves to nothing, like an unknown one
        let request_id = dto.request_id.as_deref().unwrap_or_default();
        let current = self.find(request_id).await?;

        if !current.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let transition =
            StatusTransition::new(current.status, target, &caller.account_id, Utc::now());
        let updated = match self.repository.transition(current.id, &transition).await? {
            Some(updated) => updated,
            None => return Err(self.explain_lost_race(current.id, target).await),
        };

        tracing::info!(
            "Blood request status changed: id={}, {} -> {}, by={}",
            updated.id,
            transition.from,
            transition.to,
            caller.account_id
        );

        Ok(BloodRequestDto::for_viewer(
            updated,
            CallerRole::Admin,
            Some(&caller.account_id),
            today(),
        ))
    }

    /// The row changed between read and write; report what it changed into
    async fn explain_lost_race(&self, id: Uuid, target: BloodRequestStatus) -> AppError {
        match self.repository.find_by_id(id).await {
            Ok(Some(now)) if !now.status.can_transition_to(target) => {
                tracing::warn!(
                    "Concurrent status change on {}: now {}, wanted {}",
                    id,
                    now.status,
                    target
                );
                AppError::InvalidTransition {
                    from: now.status,
                    to: target,
                }
            }
            Ok(Some(_)) => AppError::Conflict(format!(
                "Blood request {} was modified concurrently, retry the change",
                id
            )),
            Ok(None) => not_found(&id.to_string()),
            Err(e) => e,
        }
    }

    async fn find(&self, request_id: &str) -> Result<BloodRequest> {
        // A malformed id cannot resolve to anything
        let id = Uuid::parse_str(request_id.trim()).map_err(|_| not_found(request_id))?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(request_id))
    }
}

fn not_found(request_id: &str) -> AppError {
    AppError::NotFound(format!("Blood request '{}' not found", request_id))
}

/// Admins may move requests into active, fulfilled or cancelled only
fn parse_target_status(raw: Option<&str>) -> Result<BloodRequestStatus> {
    let raw =
        non_blank(raw).ok_or_else(|| AppError::Validation("status is required".to_string()))?;

    match raw.parse::<BloodRequestStatus>() {
        Ok(BloodRequestStatus::Pending) | Err(_) => Err(AppError::Validation(format!(
            "status must be one of active, fulfilled, cancelled (got '{}')",
            raw
        ))),
        Ok(status) => Ok(status),
    }
}
