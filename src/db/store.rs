use async_trait::async_trait;
use sqlx::PgPool;
use std::time::{Duration, Instant};

use crate::error::ReconcileError;
use crate::models::{LedgerRow, LedgerUpdate, ListScope, StockRow, StockUpload};
use crate::service::{LedgerReader, LedgerWriter, StockListProvider};

/// Ledger and stock uploads in Postgres.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
    chunk_size: usize,
    write_timeout: Duration,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool, chunk_size: usize, write_timeout: Duration) -> Self {
        Self {
            pool,
            chunk_size: chunk_size.max(1),
            write_timeout,
        }
    }

    /// Rolls back unless every update matched exactly one row.
    async fn write_all(&self, scope: &ListScope, updates: &[LedgerUpdate]) -> Result<u64, ReconcileError> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for chunk in updates.chunks(self.chunk_size) {
            let mut query_builder = sqlx::QueryBuilder::new(
                "UPDATE t_material_item AS t SET
                    committed_qty = v.committed_qty,
                    outstanding_qty = v.outstanding_qty,
                    lifecycle_status = v.lifecycle_status,
                    last_upload_id = v.last_upload_id,
                    updated_at = v.updated_at
                FROM (",
            );

            query_builder.push_values(chunk, |mut b, u| {
                b.push_bind(u.item_id)
                    .push_bind(to_db_qty(u.committed_quantity))
                    .push_bind(to_db_qty(u.outstanding_quantity))
                    .push_bind(u.lifecycle_status.as_str())
                    .push_bind(u.upload_id)
                    .push_bind(u.reconciled_at);
            });

            query_builder.push(
                ") AS v(item_id, committed_qty, outstanding_qty, lifecycle_status, last_upload_id, updated_at)
                WHERE t.item_id = v.item_id AND t.client_id = ",
            );
            query_builder.push_bind(&scope.client_id);
            query_builder.push(" AND t.project_id = ");
            query_builder.push_bind(&scope.project_id);
            query_builder.push(" AND t.list_id = ");
            query_builder.push_bind(&scope.list_id);
            query_builder.push(" AND NOT t.terceirizado");

            let result = query_builder.build().execute(&mut *tx).await?;
            tracing::debug!("{}: chunk of {} updates, {} rows", scope, chunk.len(), result.rows_affected());
            affected += result.rows_affected();
        }

        if affected != updates.len() as u64 {
            tx.rollback().await?;
            return Err(ReconcileError::PartialWrite {
                expected: updates.len(),
                written: affected,
            });
        }

        tx.commit().await?;
        Ok(affected)
    }
}

/// Quantities are read from BIGINT columns and only ever clamped down, so
/// they always fit back into one.
fn to_db_qty(q: u64) -> i64 {
    debug_assert!(q <= i64::MAX as u64, "quantity {} exceeds BIGINT", q);
    i64::try_from(q).unwrap_or(i64::MAX)
}

#[async_trait]
impl LedgerReader for PgLedgerStore {
    async fn load_ledger(&self, scope: &ListScope) -> Result<Vec<LedgerRow>, ReconcileError> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT item_id, code, required_qty, committed_qty, outstanding_qty,
                   lifecycle_status, terceirizado, last_upload_id
            FROM t_material_item
            WHERE client_id = $1
              AND project_id = $2
              AND list_id = $3
            ORDER BY code, item_id
            "#,
        )
        .bind(&scope.client_id)
        .bind(&scope.project_id)
        .bind(&scope.list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl StockListProvider for PgLedgerStore {
    async fn latest_upload(&self, scope: &ListScope) -> Result<Option<StockUpload>, ReconcileError> {
        let upload_id = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT max(upload_id)
            FROM t_stock_upload_row
            WHERE client_id = $1
              AND project_id = $2
              AND list_id = $3
            "#,
        )
        .bind(&scope.client_id)
        .bind(&scope.project_id)
        .bind(&scope.list_id)
        .fetch_one(&self.pool)
        .await?;

        let Some(upload_id) = upload_id else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT code, quantity
            FROM t_stock_upload_row
            WHERE client_id = $1
              AND project_id = $2
              AND list_id = $3
              AND upload_id = $4
            ORDER BY row_no
            "#,
        )
        .bind(&scope.client_id)
        .bind(&scope.project_id)
        .bind(&scope.list_id)
        .bind(upload_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(StockUpload { upload_id, rows }))
    }
}

#[async_trait]
impl LedgerWriter for PgLedgerStore {
    /// One transaction per update set.
    async fn apply_updates(
        &self,
        scope: &ListScope,
        updates: &[LedgerUpdate],
    ) -> Result<u64, ReconcileError> {
        if updates.is_empty() {
            return Ok(0);
        }

        let start = Instant::now();
        match tokio::time::timeout(self.write_timeout, self.write_all(scope, updates)).await {
            Ok(Ok(affected)) => {
                tracing::info!(
                    "✓ {}: UPDATE ok, {} rows, took {:?}",
                    scope,
                    affected,
                    start.elapsed()
                );
                Ok(affected)
            }
            Ok(Err(e)) => {
                tracing::error!("✗ {}: UPDATE failed after {:?}: {}", scope, start.elapsed(), e);
                Err(e)
            }
            Err(_) => {
                tracing::error!("✗ {}: UPDATE timed out (>{}s)", scope, self.write_timeout.as_secs());
                Err(ReconcileError::Timeout(self.write_timeout.as_secs()))
            }
        }
    }
}
