use std::path::Path;

use crate::error::ReconcileError;
use crate::models::LedgerUpdate;

const HEADER: [&str; 10] = [
    "item_id",
    "code",
    "required_qty",
    "previous_committed_qty",
    "committed_qty",
    "outstanding_qty",
    "lifecycle_status",
    "drawn_qty",
    "upload_id",
    "reconciled_at",
];

/// Writes an update set to `output_path` as CSV, one line per changed item.
pub fn export_updates(updates: &[LedgerUpdate], output_path: &Path) -> Result<(), ReconcileError> {
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(HEADER)?;

    for u in updates {
        writer.write_record(&[
            u.item_id.to_string(),
            u.code.clone(),
            u.required_quantity.to_string(),
            u.previous_committed.to_string(),
            u.committed_quantity.to_string(),
            u.outstanding_quantity.to_string(),
            u.lifecycle_status.as_str().to_string(),
            u.drawn.to_string(),
            u.upload_id.map(|id| id.to_string()).unwrap_or_default(),
            u.reconciled_at.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
