use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;

use crate::models::{PartnerServiceRow, PARTNER_SERVICES_TABLE};

/// Error reported by a table store, carrying the store's own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::new(db_err.message()),
            other => StoreError::new(other.to_string()),
        }
    }
}

/// Write side of the partner services table.
///
/// One call inserts exactly one row. Callers that write several rows get no
/// atomicity across calls.
#[async_trait]
pub trait PartnerServiceStore: Send + Sync {
    async fn insert_partner_service(&self, row: &PartnerServiceRow) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store.
pub struct PgPartnerServiceStore {
    pool: PgPool,
}

impl PgPartnerServiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerServiceStore for PgPartnerServiceStore {
    async fn insert_partner_service(&self, row: &PartnerServiceRow) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (
                partner_id, name, address, number, website, email,
                service_name, service_enabled, pricing_info, protocol_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
            PARTNER_SERVICES_TABLE
        );

        sqlx::query(&sql)
            .bind(&row.partner_id)
            .bind(row.name.as_deref())
            .bind(&row.address)
            .bind(row.number.as_deref())
            .bind(row.website.as_deref())
            .bind(row.email.as_deref())
            .bind(&row.service_name)
            .bind(row.service_enabled)
            .bind(&row.pricing_info)
            .bind(&row.protocol_info)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Inserted partner service row: partner_id={}, service={}",
            row.partner_id,
            row.service_name
        );
        Ok(())
    }
}
