use super::{BloodGroup, BloodRequest, BloodRequestStatus, Urgency};

/// Which statuses a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScope {
    Any,
    /// pending or active
    Open,
    Only(BloodRequestStatus),
}

impl StatusScope {
    pub fn includes(self, status: BloodRequestStatus) -> bool {
        match self {
            StatusScope::Any => true,
            StatusScope::Open => status.is_open(),
            StatusScope::Only(only) => only == status,
        }
    }
}

/// A division or district filter.
///
/// Stored rows may carry an older spelling ("Chittagong" for "Chattogram"),
/// so every known spelling of the place matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceMatch {
    pub name: String,
    pub aliases: Vec<String>,
}

impl PlaceMatch {
    pub fn new(name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            aliases,
        }
    }

    /// Canonical name first, then the aliases
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn matches(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| {
            let v = v.trim();
            self.spellings().any(|s| s.eq_ignore_ascii_case(v))
        })
    }
}

impl From<&str> for PlaceMatch {
    fn from(name: &str) -> Self {
        Self::new(name, Vec::new())
    }
}

/// Parsed, validated listing criteria handed to the store.
///
/// Search is matched case-insensitively as a substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestQuery {
    pub blood_group: Option<BloodGroup>,
    pub status: StatusScope,
    pub urgency: Option<Urgency>,
    pub division: Option<PlaceMatch>,
    pub district: Option<PlaceMatch>,
    pub search: Option<String>,
    /// Admin search also covers requester name and email
    pub search_requester: bool,
}

impl Default for RequestQuery {
    fn default() -> Self {
        Self {
            blood_group: None,
            status: StatusScope::Any,
            urgency: None,
            division: None,
            district: None,
            search: None,
            search_requester: false,
        }
    }
}

impl RequestQuery {
    /// In-process evaluation of the query, mirrored by the SQL builder
    pub fn matches(&self, request: &BloodRequest) -> bool {
        if !self.status.includes(request.status) {
            return false;
        }
        if self.blood_group.is_some() && request.blood_group != self.blood_group {
            return false;
        }
        if self.urgency.is_some_and(|u| u != request.urgency) {
            return false;
        }
        if !place_matches(self.division.as_ref(), request.division.as_deref()) {
            return false;
        }
        if !place_matches(self.district.as_ref(), request.district.as_deref()) {
            return false;
        }
        match self.search.as_deref() {
            Some(term) => self
                .search_fields(request)
                .any(|field| contains_ignore_case(field, term)),
            None => true,
        }
    }

    fn search_fields<'a>(&self, r: &'a BloodRequest) -> impl Iterator<Item = &'a str> + 'a {
        let requester = if self.search_requester {
            [r.requester_name.as_deref(), r.requester_email.as_deref()]
        } else {
            [None, None]
        };

        [
            r.patient_name.as_deref(),
            r.hospital.as_deref(),
            r.address.as_deref(),
            r.contact_person.as_deref(),
            r.contact_number.as_deref(),
        ]
        .into_iter()
        .chain(requester)
        .flatten()
    }
}

/// `None` filter matches anything
fn place_matches(filter: Option<&PlaceMatch>, value: Option<&str>) -> bool {
    filter.map_or(true, |place| place.matches(value))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Per-status counts over the whole collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub total: i64,
    pub pending: i64,
    pub active: i64,
    pub fulfilled: i64,
    pub cancelled: i64,
    /// Open requests marked urgent
    pub urgent_open: i64,
}

impl RequestCounts {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a BloodRequest>) -> Self {
        requests.into_iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                BloodRequestStatus::Pending => acc.pending += 1,
                BloodRequestStatus::Active => acc.active += 1,
                BloodRequestStatus::Fulfilled => acc.fulfilled += 1,
                BloodRequestStatus::Cancelled => acc.cancelled += 1,
            }
            if r.status.is_open() && r.urgency == Urgency::Urgent {
                acc.urgent_open += 1;
            }
            acc
        })
    }

    pub fn open(&self) -> i64 {
        self.pending + self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn request(status: BloodRequestStatus, urgency: Urgency) -> BloodRequest {
        let now = Utc::now();
        BloodRequest {
            id: Uuid::now_v7(),
            patient_name: Some("Karim Uddin".to_string()),
            blood_group: Some(BloodGroup::BNegative),
            units: 1,
            urgency,
            status,
            hospital: Some("Rajshahi Medical College".to_string()),
            division: Some("Rajshahi".to_string()),
            district: Some(" Bogura ".to_string()),
            upazila: None,
            address: None,
            description: None,
            contact_person: None,
            contact_number: Some("01811000000".to_string()),
            requester_id: Some("acc-9".to_string()),
            requester_name: Some("Nasrin Akter".to_string()),
            requester_email: Some("nasrin@example.org".to_string()),
            requester_mobile: None,
            required_date: None,
            fulfilled_by: None,
            fulfilled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_scope() {
        assert!(StatusScope::Open.includes(BloodRequestStatus::Active));
        assert!(!StatusScope::Open.includes(BloodRequestStatus::Cancelled));
        assert!(StatusScope::Any.includes(BloodRequestStatus::Fulfilled));
        assert!(!StatusScope::Only(BloodRequestStatus::Pending)
            .includes(BloodRequestStatus::Active));
    }

    #[test]
    fn test_location_match_ignores_case_and_padding() {
        let r = request(BloodRequestStatus::Pending, Urgency::Normal);
        let query = RequestQuery {
            division: Some("rajshahi".into()),
            district: Some("Bogura".into()),
            ..Default::default()
        };
        assert!(query.matches(&r));

        let elsewhere = RequestQuery {
            district: Some("Naogaon".into()),
            ..Default::default()
        };
        assert!(!elsewhere.matches(&r));
    }

    #[test]
    fn test_location_match_accepts_stored_alias() {
        let mut r = request(BloodRequestStatus::Pending, Urgency::Normal);
        r.division = Some("Chittagong".to_string());
        r.district = None;

        let query = RequestQuery {
            division: Some(PlaceMatch::new(
                "Chattogram",
                vec!["Chittagong".to_string()],
            )),
            ..Default::default()
        };
        assert!(query.matches(&r));

        // A district filter never matches a row without a district
        let with_district = RequestQuery {
            district: Some("Cumilla".into()),
            ..query
        };
        assert!(!with_district.matches(&r));
    }

    #[test]
    fn test_requester_fields_only_searched_for_admins() {
        let r = request(BloodRequestStatus::Pending, Urgency::Normal);
        let mut query = RequestQuery {
            search: Some("NASRIN".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&r));

        query.search_requester = true;
        assert!(query.matches(&r));
    }

    #[test]
    fn test_counts_tally() {
        let requests = [
            request(BloodRequestStatus::Pending, Urgency::Urgent),
            request(BloodRequestStatus::Active, Urgency::Urgent),
            request(BloodRequestStatus::Fulfilled, Urgency::Urgent),
            request(BloodRequestStatus::Cancelled, Urgency::Normal),
        ];

        let counts = RequestCounts::tally(&requests);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.open(), 2);
        assert_eq!(counts.fulfilled, 1);
        // Fulfilled urgent requests no longer count as urgent
        assert_eq!(counts.urgent_open, 2);
    }
}
