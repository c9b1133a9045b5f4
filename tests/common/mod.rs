#![allow(dead_code)]

use async_trait::async_trait;
use necessity_reconcile::models::{LedgerRow, LedgerUpdate, ListScope, StockRow, StockUpload};
use necessity_reconcile::service::{LedgerReader, LedgerWriter, StockListProvider};
use necessity_reconcile::ReconcileError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory ledger + uploads standing in for Postgres.
///
/// Writes follow the Postgres store: matched by `item_id` within the scope,
/// all or nothing.
#[derive(Default)]
pub struct MemoryStore {
    ledger: Mutex<HashMap<ListScope, Vec<LedgerRow>>>,
    uploads: Mutex<HashMap<ListScope, StockUpload>>,
    next_upload_id: AtomicI64,
    next_item_id: AtomicI64,
    fail_writes_for: Mutex<Option<ListScope>>,
    /// row deleted between the read and the write of a run
    vanish_on_write: Mutex<Option<i64>>,
    pub write_calls: AtomicUsize,
    pub fail_all_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item and returns its `item_id`.
    pub fn put_item(&self, scope: &ListScope, code: &str, required: i64, committed: i64) -> i64 {
        self.put_row(
            scope,
            LedgerRow {
                item_id: 0,
                code: Some(code.to_string()),
                required_qty: required,
                committed_qty: committed,
                outstanding_qty: Some((required - committed).max(0)),
                lifecycle_status: None,
                terceirizado: false,
                last_upload_id: None,
            },
        )
    }

    /// Stores `row` under a fresh `item_id`, which is returned.
    pub fn put_row(&self, scope: &ListScope, mut row: LedgerRow) -> i64 {
        row.item_id = self.next_item_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item_id = row.item_id;
        self.ledger
            .lock()
            .unwrap()
            .entry(scope.clone())
            .or_default()
            .push(row);
        item_id
    }

    /// New upload for `scope`, replacing the previous one as the latest.
    pub fn upload(&self, scope: &ListScope, rows: &[(&str, i64)]) -> i64 {
        let upload_id = self.next_upload_id.fetch_add(1, Ordering::SeqCst) + 1;
        let rows = rows.iter().map(|(c, q)| StockRow::new(*c, *q)).collect();
        self.uploads
            .lock()
            .unwrap()
            .insert(scope.clone(), StockUpload { upload_id, rows });
        upload_id
    }

    pub fn fail_writes_for(&self, scope: &ListScope) {
        *self.fail_writes_for.lock().unwrap() = Some(scope.clone());
    }

    pub fn vanish_on_write(&self, item_id: i64) {
        *self.vanish_on_write.lock().unwrap() = Some(item_id);
    }

    /// First row stored with exactly `code`.
    pub fn row(&self, scope: &ListScope, code: &str) -> LedgerRow {
        self.rows(scope, code).remove(0)
    }

    /// All rows stored with exactly `code`, in insertion order.
    pub fn rows(&self, scope: &ListScope, code: &str) -> Vec<LedgerRow> {
        self.ledger.lock().unwrap()[scope]
            .iter()
            .filter(|r| r.code.as_deref() == Some(code))
            .cloned()
            .collect()
    }

    pub fn writes(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerReader for MemoryStore {
    async fn load_ledger(&self, scope: &ListScope) -> Result<Vec<LedgerRow>, ReconcileError> {
        Ok(self.ledger.lock().unwrap().get(scope).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl StockListProvider for MemoryStore {
    async fn latest_upload(&self, scope: &ListScope) -> Result<Option<StockUpload>, ReconcileError> {
        Ok(self.uploads.lock().unwrap().get(scope).cloned())
    }
}

#[async_trait]
impl LedgerWriter for MemoryStore {
    async fn apply_updates(
        &self,
        scope: &ListScope,
        updates: &[LedgerUpdate],
    ) -> Result<u64, ReconcileError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.fail_all_writes.load(Ordering::SeqCst)
            || self.fail_writes_for.lock().unwrap().as_ref() == Some(scope);
        if failing {
            return Err(ReconcileError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut ledger = self.ledger.lock().unwrap();
        let rows = ledger.entry(scope.clone()).or_default();
        if let Some(gone) = self.vanish_on_write.lock().unwrap().take() {
            rows.retain(|r| r.item_id != gone);
        }

        let positions: Vec<Option<usize>> = updates
            .iter()
            .map(|u| {
                rows.iter()
                    .position(|r| r.item_id == u.item_id && !r.terceirizado)
            })
            .collect();
        let written = positions.iter().flatten().count() as u64;
        if written != updates.len() as u64 {
            return Err(ReconcileError::PartialWrite {
                expected: updates.len(),
                written,
            });
        }

        for (u, pos) in updates.iter().zip(positions) {
            if let Some(pos) = pos {
                let row = &mut rows[pos];
                row.committed_qty = u.committed_quantity as i64;
                row.outstanding_qty = Some(u.outstanding_quantity as i64);
                row.lifecycle_status = Some(u.lifecycle_status.as_str().to_string());
                row.last_upload_id = u.upload_id;
            }
        }
        Ok(written)
    }
}
