use chrono::Utc;
use std::path::PathBuf;

use crate::db::export;
use crate::error::ReconcileError;
use crate::models::{ComparisonLine, LedgerRow, ListScope, ReconcileStats};
use crate::service::collaborators::{LedgerReader, LedgerWriter, StockListProvider};
use crate::service::comparison::compare_lists;
use crate::service::reconciler::{self, prepare_entries, ReconcileOutcome};
use crate::service::snapshot_index::StockSnapshotIndex;

/// Necessity reconciliation over a ledger store.
///
/// Fetch ledger + latest stock list, run the pure engine, write the changed
/// entries as one batch.
pub struct ReconcileService<S> {
    store: S,
    export_dir: Option<PathBuf>,
}

impl<S> ReconcileService<S>
where
    S: LedgerReader + StockListProvider + LedgerWriter,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            export_dir: None,
        }
    }

    /// Also write every non-empty update set as CSV under `dir`.
    pub fn with_export_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.export_dir = dir;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load(&self, scope: &ListScope) -> Result<(Vec<LedgerRow>, StockSnapshotIndex), ReconcileError> {
        let (rows, upload) = futures::try_join!(
            self.store.load_ledger(scope),
            self.store.latest_upload(scope)
        )?;

        let index = match upload {
            Some(upload) => {
                tracing::debug!(
                    "[Reconcile] {}: loaded {} ledger rows, upload {} with {} rows",
                    scope,
                    rows.len(),
                    upload.upload_id,
                    upload.rows.len()
                );
                StockSnapshotIndex::from_upload(&upload)
            }
            None => StockSnapshotIndex::empty(),
        };
        Ok((rows, index))
    }

    /// Computes the update set without writing it.
    pub async fn preview(&self, scope: &ListScope) -> Result<ReconcileOutcome, ReconcileError> {
        let (rows, index) = self.load(scope).await?;
        Ok(reconciler::reconcile(scope, rows, &index))
    }

    /// Reconciles one scope and persists the changed entries.
    pub async fn reconcile(&self, scope: &ListScope) -> Result<ReconcileStats, ReconcileError> {
        let outcome = self.preview(scope).await?;
        if outcome.updates.is_empty() {
            return Ok(outcome.stats);
        }

        let written = self.store.apply_updates(scope, &outcome.updates).await?;
        if written != outcome.updates.len() as u64 {
            tracing::warn!(
                "[Reconcile] {}: {} updates computed but {} ledger rows written",
                scope,
                outcome.updates.len(),
                written
            );
        } else {
            tracing::info!("[Reconcile] {}: wrote {} ledger entries", scope, written);
        }

        if let Some(dir) = &self.export_dir {
            let path = dir.join(format!(
                "{}_{}_{}_{}.csv",
                scope.client_id,
                scope.project_id,
                scope.list_id,
                Utc::now().format("%Y%m%d%H%M%S")
            ));
            export::export_updates(&outcome.updates, &path)?;
            tracing::info!("[Reconcile] {}: update set exported to {}", scope, path.display());
        }

        Ok(outcome.stats)
    }

    /// Runs scopes in order, stopping at the first failure.
    pub async fn reconcile_many(&self, scopes: &[ListScope]) -> Result<Vec<ReconcileStats>, ReconcileError> {
        let mut all_stats = Vec::with_capacity(scopes.len());

        for scope in scopes {
            match self.reconcile(scope).await {
                Ok(stats) => all_stats.push(stats),
                Err(e) => {
                    tracing::error!("[Reconcile] {}: failed: {}", scope, e);
                    return Err(e);
                }
            }
        }

        Ok(all_stats)
    }

    /// Item OK / buy additional / return to stock report. Writes nothing.
    pub async fn compare(&self, scope: &ListScope) -> Result<Vec<ComparisonLine>, ReconcileError> {
        let (rows, index) = self.load(scope).await?;
        let mut stats = ReconcileStats::default();
        let entries = prepare_entries(rows, &mut stats);
        Ok(compare_lists(&entries, &index))
    }
}
