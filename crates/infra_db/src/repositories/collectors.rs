//! Collector repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::CollectorId;
use domain_party::{Collector, CollectorStatus};

use crate::error::DatabaseError;

/// Repository for the collector registry
#[derive(Debug, Clone)]
pub struct CollectorRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CollectorRow {
    id: Uuid,
    full_name: String,
    phone: Option<String>,
    zone: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CollectorRow {
    fn into_collector(self) -> Result<Collector, DatabaseError> {
        let status: CollectorStatus = self.status.parse().map_err(DatabaseError::corrupt)?;
        Ok(Collector {
            id: CollectorId::from(self.id),
            full_name: self.full_name,
            phone: self.phone,
            zone: self.zone,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CollectorRepository {
    /// Creates a new CollectorRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new collector
    pub async fn create(&self, collector: &Collector) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO collectors (id, full_name, phone, zone, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::from(collector.id))
        .bind(&collector.full_name)
        .bind(&collector.phone)
        .bind(&collector.zone)
        .bind(collector.status.as_str())
        .bind(collector.created_at)
        .bind(collector.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Loads a collector by ID
    pub async fn find(&self, id: CollectorId) -> Result<Collector, DatabaseError> {
        let row: Option<CollectorRow> = sqlx::query_as(
            "SELECT id, full_name, phone, zone, status, created_at, updated_at \
             FROM collectors WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| DatabaseError::not_found("Collector", id))?
            .into_collector()
    }

    /// Lists all collectors
    pub async fn list(&self) -> Result<Vec<Collector>, DatabaseError> {
        let rows: Vec<CollectorRow> = sqlx::query_as(
            "SELECT id, full_name, phone, zone, status, created_at, updated_at \
             FROM collectors ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CollectorRow::into_collector).collect()
    }

    /// Persists changes to an existing collector
    pub async fn update(&self, collector: &Collector) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE collectors
            SET full_name = $1, phone = $2, zone = $3, status = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&collector.full_name)
        .bind(&collector.phone)
        .bind(&collector.zone)
        .bind(collector.status.as_str())
        .bind(collector.updated_at)
        .bind(Uuid::from(collector.id))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Collector", collector.id));
        }
        Ok(())
    }
}
