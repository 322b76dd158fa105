use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BloodRequestRepository;
use crate::core::error::Result;
use crate::features::blood_requests::models::{
    BloodRequest, BloodRequestStatus, NewBloodRequest, RequestCounts, RequestQuery,
    StatusTransition,
};

/// Process-local store for development and tests
#[derive(Default)]
pub struct InMemoryBloodRequestRepository {
    requests: RwLock<HashMap<Uuid, BloodRequest>>,
}

impl InMemoryBloodRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed existing rows as-is (legacy or admin-entered data)
    #[cfg(test)]
    pub async fn with_requests(requests: impl IntoIterator<Item = BloodRequest>) -> Self {
        let repo = Self::new();
        {
            let mut guard = repo.requests.write().await;
            for request in requests {
                guard.insert(request.id, request);
            }
        }
        repo
    }
}

#[async_trait]
impl BloodRequestRepository for InMemoryBloodRequestRepository {
    async fn insert(&self, new: NewBloodRequest) -> Result<BloodRequest> {
        let now = Utc::now();
        let request = BloodRequest {
            id: Uuid::now_v7(),
            patient_name: new.patient_name,
            blood_group: Some(new.blood_group),
            units: new.units,
            urgency: new.urgency,
            status: BloodRequestStatus::Pending,
            hospital: new.hospital,
            division: new.division,
            district: new.district,
            upazila: new.upazila,
            address: new.address,
            description: new.description,
            contact_person: new.contact_person,
            contact_number: Some(new.contact_number),
            requester_id: new.requester_id,
            requester_name: new.requester_name,
            requester_email: new.requester_email,
            requester_mobile: new.requester_mobile,
            required_date: new.required_date,
            fulfilled_by: None,
            fulfilled_at: None,
            created_at: now,
            updated_at: now,
        };

        self.requests
            .write()
            .await
            .insert(request.id, request.clone());

        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BloodRequest>> {
        Ok(self.requests.read().await.get(&id).cloned())
    }

    async fn list(&self, query: &RequestQuery) -> Result<Vec<BloodRequest>> {
        let guard = self.requests.read().await;
        let mut items: Vec<BloodRequest> =
            guard.values().filter(|r| query.matches(r)).cloned().collect();
        items.sort_by_key(|r| Reverse((r.created_at, r.id)));
        Ok(items)
    }

    async fn counts(&self) -> Result<RequestCounts> {
        Ok(RequestCounts::tally(self.requests.read().await.values()))
    }

    async fn transition(
        &self,
        id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<BloodRequest>> {
        // The write guard spans the check and the update
        let mut guard = self.requests.write().await;
        match guard.get_mut(&id) {
            Some(request) if request.status == transition.from => {
                transition.apply(request);
                Ok(Some(request.clone()))
            }
            _ => Ok(None),
        }
    }
}
