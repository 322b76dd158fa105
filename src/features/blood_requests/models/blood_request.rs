use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{UNKNOWN_BLOOD_GROUP, UNKNOWN_PATIENT};

/// Request status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "blood_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BloodRequestStatus {
    Pending,
    Active,
    Fulfilled,
    Cancelled,
}

impl BloodRequestStatus {
    pub const ALL: [BloodRequestStatus; 4] = [
        BloodRequestStatus::Pending,
        BloodRequestStatus::Active,
        BloodRequestStatus::Fulfilled,
        BloodRequestStatus::Cancelled,
    ];

    /// Open requests still need donors
    pub fn is_open(self) -> bool {
        matches!(self, BloodRequestStatus::Pending | BloodRequestStatus::Active)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }

    /// Statuses reachable from `self` through an admin action
    pub fn allowed_next(self) -> &'static [BloodRequestStatus] {
        match self {
            BloodRequestStatus::Pending => &[
                BloodRequestStatus::Active,
                BloodRequestStatus::Fulfilled,
                BloodRequestStatus::Cancelled,
            ],
            BloodRequestStatus::Active => {
                &[BloodRequestStatus::Fulfilled, BloodRequestStatus::Cancelled]
            }
            BloodRequestStatus::Fulfilled | BloodRequestStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: BloodRequestStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BloodRequestStatus::Pending => "pending",
            BloodRequestStatus::Active => "active",
            BloodRequestStatus::Fulfilled => "fulfilled",
            BloodRequestStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for BloodRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown status '{}'", s))
    }
}

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "blood_group")]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    #[sqlx(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    #[sqlx(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    #[sqlx(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    #[sqlx(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    #[sqlx(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    #[sqlx(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    #[sqlx(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    #[sqlx(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = String;

    /// Accepts "ab+", " O- " and the URL-decoded "A " that an unescaped `+`
    /// turns into inside a query string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = if s.ends_with(' ') && !trimmed.ends_with(['+', '-']) {
            format!("{}+", trimmed)
        } else {
            trimmed.to_string()
        };

        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("Unknown blood group '{}'", s.trim()))
    }
}

/// How soon the blood is needed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "request_urgency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    #[default]
    Normal,
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Urgency::Urgent),
            "normal" => Ok(Urgency::Normal),
            _ => Err(format!("Unknown urgency '{}'", s)),
        }
    }
}

/// Database model for a blood request
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BloodRequest {
    pub id: Uuid,
    pub patient_name: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub units: i32,
    pub urgency: Urgency,
    pub status: BloodRequestStatus,
    pub hospital: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub requester_id: Option<String>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub requester_mobile: Option<String>,
    pub required_date: Option<NaiveDate>,
    pub fulfilled_by: Option<String>,
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    pub fn patient_display_name(&self) -> &str {
        self.patient_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_PATIENT)
    }

    pub fn blood_group_label(&self) -> &'static str {
        self.blood_group
            .map(BloodGroup::as_str)
            .unwrap_or(UNKNOWN_BLOOD_GROUP)
    }

    /// Open and past its need-by date. Display only; never changes status.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.required_date.is_some_and(|date| date < today)
    }
}

/// Data for inserting a new request; status and timestamps are set by the store
#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    pub patient_name: Option<String>,
    pub blood_group: BloodGroup,
    pub units: i32,
    pub urgency: Urgency,
    pub hospital: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: String,
    pub requester_id: Option<String>,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub requester_mobile: Option<String>,
    pub required_date: Option<NaiveDate>,
}

/// A validated status change, applied only if the row still has `from`
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub from: BloodRequestStatus,
    pub to: BloodRequestStatus,
    pub fulfilled_by: Option<String>,
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub at: DateTime<Utc>,
}

impl StatusTransition {
    /// Build a transition, stamping fulfilment fields when moving into `fulfilled`
    pub fn new(
        from: BloodRequestStatus,
        to: BloodRequestStatus,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Self {
        let fulfilled = to == BloodRequestStatus::Fulfilled;
        Self {
            from,
            to,
            fulfilled_by: fulfilled.then(|| actor.to_string()),
            fulfilled_at: fulfilled.then_some(at),
            at,
        }
    }

    pub fn apply(&self, request: &mut BloodRequest) {
        request.status = self.to;
        request.updated_at = self.at;
        if self.to == BloodRequestStatus::Fulfilled {
            request.fulfilled_by = self.fulfilled_by.clone();
            request.fulfilled_at = self.fulfilled_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BloodRequestStatus::*;

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Fulfilled));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Fulfilled));
        assert!(Active.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for terminal in [Fulfilled, Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.allowed_next().is_empty());
            for next in BloodRequestStatus::ALL {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse::<BloodRequestStatus>(), Ok(Pending));
        assert_eq!(" Fulfilled ".parse::<BloodRequestStatus>(), Ok(Fulfilled));
        assert!("done".parse::<BloodRequestStatus>().is_err());
        assert!("all".parse::<BloodRequestStatus>().is_err());
    }

    #[test]
    fn test_status_serde_rejects_unknown() {
        assert_eq!(
            serde_json::from_str::<BloodRequestStatus>("\"active\"").unwrap(),
            Active
        );
        assert!(serde_json::from_str::<BloodRequestStatus>("\"open\"").is_err());
    }

    #[test]
    fn test_blood_group_parse() {
        assert_eq!("A+".parse::<BloodGroup>(), Ok(BloodGroup::APositive));
        assert_eq!("ab-".parse::<BloodGroup>(), Ok(BloodGroup::AbNegative));
        assert_eq!(" O- ".parse::<BloodGroup>(), Ok(BloodGroup::ONegative));
        // "+" decoded as space in a query string
        assert_eq!("B ".parse::<BloodGroup>(), Ok(BloodGroup::BPositive));
        assert!("C+".parse::<BloodGroup>().is_err());
        assert!("".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_blood_group_serde_labels() {
        assert_eq!(
            serde_json::to_string(&BloodGroup::AbPositive).unwrap(),
            "\"AB+\""
        );
        assert_eq!(
            serde_json::from_str::<BloodGroup>("\"O-\"").unwrap(),
            BloodGroup::ONegative
        );
    }

    #[test]
    fn test_urgency_parse_and_default() {
        assert_eq!(Urgency::default(), Urgency::Normal);
        assert_eq!("URGENT".parse::<Urgency>(), Ok(Urgency::Urgent));
        assert!("asap".parse::<Urgency>().is_err());
    }

    #[test]
    fn test_transition_into_fulfilled_stamps_fields() {
        let at = Utc::now();
        let t = StatusTransition::new(Active, Fulfilled, "admin-1", at);
        assert_eq!(t.fulfilled_by.as_deref(), Some("admin-1"));
        assert_eq!(t.fulfilled_at, Some(at));

        let t = StatusTransition::new(Pending, Cancelled, "admin-1", at);
        assert!(t.fulfilled_by.is_none());
        assert!(t.fulfilled_at.is_none());
    }
}
