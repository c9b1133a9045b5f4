use async_trait::async_trait;

use crate::error::ReconcileError;
use crate::models::{LedgerRow, LedgerUpdate, ListScope, StockUpload};

/// Current ledger rows for a scope, terceirizado rows included.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn load_ledger(&self, scope: &ListScope) -> Result<Vec<LedgerRow>, ReconcileError>;
}

/// Most recent stock upload for a scope; `None` when nothing was uploaded yet.
#[async_trait]
pub trait StockListProvider: Send + Sync {
    async fn latest_upload(&self, scope: &ListScope) -> Result<Option<StockUpload>, ReconcileError>;
}

/// Durably applies an update set, keyed by `item_id`. Returns the number of
/// rows written; an update set that cannot be applied in full is an error.
///
/// No version check: concurrent runs over one scope are last-writer-wins.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn apply_updates(
        &self,
        scope: &ListScope,
        updates: &[LedgerUpdate],
    ) -> Result<u64, ReconcileError>;
}
