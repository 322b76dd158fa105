use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::BloodRequestRepository;
use crate::core::error::{AppError, Result};
use crate::features::blood_requests::models::{
    BloodRequest, BloodRequestStatus, NewBloodRequest, PlaceMatch, RequestCounts, RequestQuery,
    StatusScope, StatusTransition,
};

const COLUMNS: &str = r#"
    id, patient_name, blood_group, units, urgency, status,
    hospital, division, district, upazila, address, description,
    contact_person, contact_number,
    requester_id, requester_name, requester_email, requester_mobile,
    required_date, fulfilled_by, fulfilled_at, created_at, updated_at
"#;

/// PostgreSQL-backed store
pub struct PgBloodRequestRepository {
    pool: PgPool,
}

impl PgBloodRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// `column` equals any spelling of `place`, ignoring case and padding
fn push_place(builder: &mut QueryBuilder<'_, Postgres>, column: &str, place: &PlaceMatch) {
    builder.push(" AND LOWER(TRIM(").push(column).push(")) IN (");
    for (i, spelling) in place.spellings().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push_bind(spelling.to_lowercase());
    }
    builder.push(")");
}

/// Append the WHERE clause for `query`; mirrors `RequestQuery::matches`
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &RequestQuery) {
    builder.push(" WHERE TRUE");

    match query.status {
        StatusScope::Any => {}
        StatusScope::Open => {
            builder
                .push(" AND status IN (")
                .push_bind(BloodRequestStatus::Pending)
                .push(", ")
                .push_bind(BloodRequestStatus::Active)
                .push(")");
        }
        StatusScope::Only(status) => {
            builder.push(" AND status = ").push_bind(status);
        }
    }

    if let Some(group) = query.blood_group {
        builder.push(" AND blood_group = ").push_bind(group);
    }
    if let Some(urgency) = query.urgency {
        builder.push(" AND urgency = ").push_bind(urgency);
    }
    if let Some(division) = &query.division {
        push_place(builder, "division", division);
    }
    if let Some(district) = &query.district {
        push_place(builder, "district", district);
    }
    if let Some(term) = &query.search {
        let pattern = like_pattern(term);
        let mut fields = vec![
            "patient_name",
            "hospital",
            "address",
            "contact_person",
            "contact_number",
        ];
        if query.search_requester {
            fields.extend(["requester_name", "requester_email"]);
        }

        builder.push(" AND (");
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(field)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        builder.push(")");
    }
}

#[async_trait]
impl BloodRequestRepository for PgBloodRequestRepository {
    async fn insert(&self, new: NewBloodRequest) -> Result<BloodRequest> {
        let sql = format!(
            r#"
            INSERT INTO blood_requests (
                id, patient_name, blood_group, units, urgency, status,
                hospital, division, district, upazila, address, description,
                contact_person, contact_number,
                requester_id, requester_name, requester_email, requester_mobile,
                required_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {COLUMNS}
            "#
        );

        let request = sqlx::query_as::<_, BloodRequest>(&sql)
            .bind(Uuid::now_v7())
            .bind(new.patient_name)
            .bind(new.blood_group)
            .bind(new.units)
            .bind(new.urgency)
            .bind(BloodRequestStatus::Pending)
            .bind(new.hospital)
            .bind(new.division)
            .bind(new.district)
            .bind(new.upazila)
            .bind(new.address)
            .bind(new.description)
            .bind(new.contact_person)
            .bind(new.contact_number)
            .bind(new.requester_id)
            .bind(new.requester_name)
            .bind(new.requester_email)
            .bind(new.requester_mobile)
            .bind(new.required_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create blood request: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BloodRequest>> {
        let sql = format!("SELECT {COLUMNS} FROM blood_requests WHERE id = $1");

        sqlx::query_as::<_, BloodRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get blood request by ID: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, query: &RequestQuery) -> Result<Vec<BloodRequest>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM blood_requests"
        ));
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC, id DESC");

        builder
            .build_query_as::<BloodRequest>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list blood requests: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn counts(&self) -> Result<RequestCounts> {
        let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'active'),
                COUNT(*) FILTER (WHERE status = 'fulfilled'),
                COUNT(*) FILTER (WHERE status = 'cancelled'),
                COUNT(*) FILTER (WHERE urgency = 'urgent' AND status IN ('pending', 'active'))
            FROM blood_requests
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count blood requests: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(RequestCounts {
            total: row.0,
            pending: row.1,
            active: row.2,
            fulfilled: row.3,
            cancelled: row.4,
            urgent_open: row.5,
        })
    }

    async fn transition(
        &self,
        id: Uuid,
        transition: &StatusTransition,
    ) -> Result<Option<BloodRequest>> {
        // Guarding on the expected status makes check-and-write a single statement
        let sql = format!(
            r#"
            UPDATE blood_requests
            SET
                status = $3,
                fulfilled_by = COALESCE($4, fulfilled_by),
                fulfilled_at = COALESCE($5, fulfilled_at),
                updated_at = $6
            WHERE id = $1 AND status = $2
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, BloodRequest>(&sql)
            .bind(id)
            .bind(transition.from)
            .bind(transition.to)
            .bind(transition.fulfilled_by.as_deref())
            .bind(transition.fulfilled_at)
            .bind(transition.at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update blood request status: {:?}", e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::blood_requests::models::{BloodGroup, Urgency};

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("dhaka"), "%dhaka%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_push_filters_open_scope() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM blood_requests");
        push_filters(
            &mut builder,
            &RequestQuery {
                status: StatusScope::Open,
                ..Default::default()
            },
        );
        assert_eq!(
            builder.sql(),
            "SELECT id FROM blood_requests WHERE TRUE AND status IN ($1, $2)"
        );
    }

    #[test]
    fn test_push_filters_all_criteria() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM blood_requests");
        push_filters(
            &mut builder,
            &RequestQuery {
                blood_group: Some(BloodGroup::ONegative),
                status: StatusScope::Only(BloodRequestStatus::Fulfilled),
                urgency: Some(Urgency::Urgent),
                division: Some(PlaceMatch::new("Chattogram", vec!["Chittagong".to_string()])),
                district: Some("Cumilla".into()),
                search: Some("medical".to_string()),
                search_requester: true,
            },
        );

        let sql = builder.sql();
        assert!(sql.contains("status = $1"));
        assert!(sql.contains("blood_group = $2"));
        assert!(sql.contains("urgency = $3"));
        assert!(sql.contains("LOWER(TRIM(division)) IN ($4, $5)"));
        assert!(sql.contains("LOWER(TRIM(district)) IN ($6)"));
        assert!(sql.contains("patient_name ILIKE $7"));
        assert!(sql.contains("requester_email ILIKE $13"));
    }

    #[test]
    fn test_push_filters_donor_search_skips_requester_fields() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM blood_requests");
        push_filters(
            &mut builder,
            &RequestQuery {
                search: Some("rahim".to_string()),
                ..Default::default()
            },
        );

        assert!(!builder.sql().contains("requester_name"));
    }
}
