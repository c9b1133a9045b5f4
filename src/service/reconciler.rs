use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::{LedgerEntry, LedgerRow, LedgerUpdate, LifecycleStatus, ListScope, ReconcileStats};
use crate::service::snapshot_index::StockSnapshotIndex;
use crate::service::status::derive_status;

/// Update set plus summary for one scope
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub updates: Vec<LedgerUpdate>,
    pub stats: ReconcileStats,
}

/// Drops terceirizado rows and malformed rows, counting both.
pub fn prepare_entries(rows: Vec<LedgerRow>, stats: &mut ReconcileStats) -> Vec<LedgerEntry> {
    stats.total_rows += rows.len();
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        if row.terceirizado {
            stats.terceirizado_rows += 1;
            continue;
        }
        match LedgerEntry::try_from(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                stats.skipped_rows += 1;
                tracing::warn!("skipping ledger row: {}", e);
            }
        }
    }
    entries
}

/// Walks `entries` once against `index` and returns only the entries whose
/// committed quantity or status changed.
///
/// Terceirizado entries are ignored. Entries without a snapshot match never
/// change. An entry already reconciled against the index's upload draws
/// nothing, so a second run over the same upload is a no-op.
pub fn reconcile_entries(
    entries: &[LedgerEntry],
    index: &StockSnapshotIndex,
    now: DateTime<Utc>,
) -> Vec<LedgerUpdate> {
    // quantity already drawn per snapshot code during this run
    let mut drawn_by_code: HashMap<&str, u64> = HashMap::new();
    let mut updates = Vec::new();

    for entry in entries.iter().filter(|e| !e.terceirizado) {
        let already_drawn = drawn_by_code.get(entry.code.as_str()).copied();
        if already_drawn.is_some() {
            tracing::warn!("item code {} appears more than once in the list", entry.code);
        }
        let consumed = index.upload_id().is_some() && entry.last_upload_id == index.upload_id();
        let available = if consumed {
            0
        } else {
            index
                .available(&entry.code)
                .saturating_sub(already_drawn.unwrap_or(0))
        };

        if let Some(mut update) = resolve_entry(entry, available, now) {
            update.upload_id = index.upload_id().or(entry.last_upload_id);
            *drawn_by_code.entry(entry.code.as_str()).or_insert(0) += update.drawn;
            updates.push(update);
        } else {
            drawn_by_code.entry(entry.code.as_str()).or_insert(0);
        }
    }

    updates
}

/// New values for a single entry given what the snapshot still has for its
/// code, or `None` when nothing changes.
pub fn resolve_entry(entry: &LedgerEntry, available: u64, now: DateTime<Utc>) -> Option<LedgerUpdate> {
    let required = entry.required_quantity;
    let committed = entry.committed_quantity;

    // never trust the stored outstanding value
    let outstanding_before = required.saturating_sub(committed);
    let draw = outstanding_before.min(available);

    let mut new_committed = committed.saturating_add(draw).min(required);
    let new_outstanding = required.saturating_sub(new_committed);
    if new_outstanding == 0 && new_committed < required {
        new_committed = required;
    }
    let new_status = derive_status(required, new_committed);

    if committed > required {
        tracing::warn!(
            "item {} stored committed {} above required {}, clamping",
            entry.code,
            committed,
            required
        );
    }

    let old_status = derive_status(required, committed.min(required));
    if new_committed == committed && new_status == old_status {
        return None;
    }

    Some(LedgerUpdate {
        item_id: entry.item_id,
        code: entry.code.clone(),
        required_quantity: required,
        previous_committed: committed,
        committed_quantity: new_committed,
        outstanding_quantity: new_outstanding,
        lifecycle_status: new_status,
        drawn: draw,
        upload_id: entry.last_upload_id,
        reconciled_at: now,
    })
}

/// Full pure run for one scope: row preparation, entry walk, summary.
pub fn reconcile(scope: &ListScope, rows: Vec<LedgerRow>, index: &StockSnapshotIndex) -> ReconcileOutcome {
    let mut stats = ReconcileStats {
        scope: Some(scope.clone()),
        upload_id: index.upload_id(),
        stock_rows: index.len(),
        skipped_stock_rows: index.skipped_rows(),
        ..Default::default()
    };

    let entries = prepare_entries(rows, &mut stats);
    if entries.is_empty() {
        tracing::info!("[Reconcile] {}: no ledger entries in scope", scope);
    } else if index.is_empty() {
        tracing::info!("[Reconcile] {}: no stock snapshot, nothing to commit", scope);
    }

    let updates = reconcile_entries(&entries, index, Utc::now());

    stats.updated = updates.len();
    for u in &updates {
        stats.total_drawn += u.drawn;
        match u.lifecycle_status {
            LifecycleStatus::Empenho => stats.fully_committed += 1,
            LifecycleStatus::EmpenhoCompras => stats.partially_committed += 1,
            LifecycleStatus::Compras => {}
        }
    }

    tracing::info!(
        "[Reconcile] {}: {} rows, {} terceirizado, {} skipped, {} updates, drawn {}",
        scope,
        stats.total_rows,
        stats.terceirizado_rows,
        stats.skipped_rows,
        stats.updated,
        stats.total_drawn
    );

    ReconcileOutcome { updates, stats }
}
