//! Transport repository for database operations.

use sqlx::SqlitePool;

use veloport_core::{TransportId, TransportKind, TransportStatus};

use super::RepositoryError;
use crate::models::{FleetStats, Transport, TransportFields};

/// Internal row type for transport queries.
#[derive(Debug, sqlx::FromRow)]
struct TransportRow {
    id: i64,
    kind: String,
    model: String,
    status: String,
    price_per_hour: f64,
    location: Option<String>,
}

impl TryFrom<TransportRow> for Transport {
    type Error = RepositoryError;

    fn try_from(row: TransportRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<TransportKind>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid transport kind in database: {e}"))
        })?;

        let status = row.status.parse::<TransportStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid transport status in database: {e}"))
        })?;

        Ok(Self {
            id: TransportId::new(row.id),
            kind,
            model: row.model,
            status,
            price_per_hour: row.price_per_hour,
            location: row.location,
        })
    }
}

/// Repository for transport database operations.
pub struct TransportRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TransportRepository<'a> {
    /// Create a new transport repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List transports, optionally restricted to a single status.
    ///
    /// Results are ordered oldest first so the list is stable across
    /// edits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        status: Option<TransportStatus>,
    ) -> Result<Vec<Transport>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, TransportRow>(
                    r"
                    SELECT id, kind, model, status, price_per_hour, location
                    FROM transports
                    WHERE status = ?1
                    ORDER BY id ASC
                    ",
                )
                .bind(status.as_str())
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TransportRow>(
                    r"
                    SELECT id, kind, model, status, price_per_hour, location
                    FROM transports
                    ORDER BY id ASC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a transport by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(
        &self,
        id: TransportId,
    ) -> Result<Option<Transport>, RepositoryError> {
        let row = sqlx::query_as::<_, TransportRow>(
            r"
            SELECT id, kind, model, status, price_per_hour, location
            FROM transports
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a transport record from validated fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: &TransportFields) -> Result<Transport, RepositoryError> {
        let row = sqlx::query_as::<_, TransportRow>(
            r"
            INSERT INTO transports (kind, model, status, price_per_hour, location)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, kind, model, status, price_per_hour, location
            ",
        )
        .bind(fields.kind.as_str())
        .bind(&fields.model)
        .bind(fields.status.as_str())
        .bind(fields.price_per_hour)
        .bind(fields.location.as_deref())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace every field of an existing transport record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: TransportId,
        fields: &TransportFields,
    ) -> Result<Transport, RepositoryError> {
        let row = sqlx::query_as::<_, TransportRow>(
            r"
            UPDATE transports
            SET kind = ?1, model = ?2, status = ?3, price_per_hour = ?4, location = ?5
            WHERE id = ?6
            RETURNING id, kind, model, status, price_per_hour, location
            ",
        )
        .bind(fields.kind.as_str())
        .bind(&fields.model)
        .bind(fields.status.as_str())
        .bind(fields.price_per_hour)
        .bind(fields.location.as_deref())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a transport by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the record doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: TransportId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM transports
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fleet availability counts, computed at call time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<FleetStats, RepositoryError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT status, COUNT(*)
            FROM transports
            GROUP BY status
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut stats = FleetStats::default();
        for (status, count) in rows {
            stats.total += count;
            match status.parse::<TransportStatus>() {
                Ok(TransportStatus::Available) => stats.available += count,
                Ok(TransportStatus::Rented) => stats.rented += count,
                Ok(TransportStatus::Maintenance) => stats.maintenance += count,
                Err(e) => {
                    return Err(RepositoryError::DataCorruption(format!(
                        "invalid transport status in database: {e}"
                    )));
                }
            }
        }

        Ok(stats)
    }
}
