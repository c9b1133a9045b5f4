use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LifecycleStatus, ListScope};

/// New values for one ledger entry that changed during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    pub item_id: i64,
    pub code: String,
    pub required_quantity: u64,
    pub previous_committed: u64,
    pub committed_quantity: u64,
    pub outstanding_quantity: u64,
    pub lifecycle_status: LifecycleStatus,
    /// quantity taken from the snapshot in this run
    pub drawn: u64,
    /// upload the quantities were drawn from
    pub upload_id: Option<i64>,
    pub reconciled_at: DateTime<Utc>,
}

/// Per-scope run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub scope: Option<ListScope>,
    pub total_rows: usize,
    pub terceirizado_rows: usize,
    pub skipped_rows: usize,
    pub upload_id: Option<i64>,
    pub stock_rows: usize,
    pub skipped_stock_rows: usize,
    pub updated: usize,
    pub fully_committed: usize,
    pub partially_committed: usize,
    pub total_drawn: u64,
}
