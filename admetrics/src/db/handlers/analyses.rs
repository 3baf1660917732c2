use crate::db::{
    errors::Result,
    models::analyses::{AnalysisCreateDBRequest, AnalysisDBResponse},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

/// Filter for history reads.
#[derive(Debug, Clone, Default)]
pub struct AnalysisHistoryFilter {
    /// Scope to one correlation key; None reads across all records.
    pub user_id: Option<String>,
    /// Record to leave out, used to drop the just-written record from the
    /// embedded history of the same request.
    pub exclude: Option<Uuid>,
    pub limit: i64,
}

// Database entity model for an analysis row
#[derive(Debug, Clone, FromRow)]
struct AnalysisRow {
    pub id: Uuid,
    pub ad_spend: Decimal,
    pub revenue: Decimal,
    pub conversions: i64,
    pub roi: Decimal,
    pub cpa: Option<Decimal>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for AnalysisDBResponse {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            ad_spend: row.ad_spend,
            revenue: row.revenue,
            conversions: row.conversions,
            roi: row.roi,
            cpa: row.cpa,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// Repository for the `analyses` table.
///
/// Records are immutable: there is deliberately no update or delete here.
pub struct Analyses<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Analyses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Persist a new analysis record and return it with its generated id
    /// and timestamp.
    pub async fn create(&mut self, request: &AnalysisCreateDBRequest) -> Result<AnalysisDBResponse> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO analyses (ad_spend, revenue, conversions, roi, cpa, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, ad_spend, revenue, conversions, roi, cpa, user_id, created_at
            "#,
        )
        .bind(request.ad_spend)
        .bind(request.revenue)
        .bind(request.conversions)
        .bind(request.roi)
        .bind(request.cpa)
        .bind(request.user_id.as_deref())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(AnalysisDBResponse::from(row))
    }

    /// List the most recent records, newest first.
    ///
    /// With no `user_id` in the filter this reads across all records, which
    /// is the documented fallback for unscoped history requests.
    pub async fn list_recent(&mut self, filter: &AnalysisHistoryFilter) -> Result<Vec<AnalysisDBResponse>> {
        let rows = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT id, ad_spend, revenue, conversions, roi, cpa, user_id, created_at
            FROM analyses
            WHERE ($1::uuid IS NULL OR id <> $1)
              AND ($2::text IS NULL OR user_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(filter.exclude)
        .bind(filter.user_id.as_deref())
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(AnalysisDBResponse::from).collect())
    }

    /// Count records, optionally scoped to one user. Used by tests to verify
    /// that rejected submissions persist nothing.
    pub async fn count(&mut self, user_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM analyses
            WHERE ($1::text IS NULL OR user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(count)
    }
}
