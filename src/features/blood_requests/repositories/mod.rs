//! Persistence for blood requests.
//!
//! The service only talks to [`BloodRequestRepository`]. Implementations must
//! apply [`BloodRequestRepository::transition`] atomically: the status check
//! and the write happen as one step, so two racing transitions on the same
//! request cannot both succeed.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::blood_requests::models::{
    BloodRequest, NewBloodRequest, RequestCounts, RequestQuery, StatusTransition,
};

pub use memory::InMemoryBloodRequestRepository;
pub use postgres::PgBloodRequestRepository;

#[async_trait]
pub trait BloodRequestRepository: Send + Sync {
    /// Persist a new request in `pending`
    async fn insert(&self, new: NewBloodRequest) -> Result<BloodRequest>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BloodRequest>>;

    /// Matching requests, newest first (ties broken by id, descending)
    async fn list(&self, query: &RequestQuery) -> Result<Vec<BloodRequest>>;

    /// Counts over the whole collection, ignoring any filter
    async fn counts(&self) -> Result<RequestCounts>;

    /// Compare-and-set status change.
    ///
    /// Returns `None` when no row with `id` currently has `transition.from`
    /// (missing, or changed concurrently).
    async fn transition(
        &self,
        id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<BloodRequest>>;
}
