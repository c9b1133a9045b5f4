use std::collections::HashSet;

use crate::models::{ComparisonLine, ComparisonOutcome, LedgerEntry};
use crate::service::snapshot_index::StockSnapshotIndex;

fn outcome(outstanding: u64, available: u64) -> ComparisonOutcome {
    use std::cmp::Ordering;
    match available.cmp(&outstanding) {
        Ordering::Equal => ComparisonOutcome::ItemOk,
        Ordering::Less => ComparisonOutcome::BuyAdditional {
            quantity: outstanding - available,
        },
        Ordering::Greater => ComparisonOutcome::ReturnToStock {
            quantity: available - outstanding,
        },
    }
}

/// Read-only comparison of outstanding necessity with an uploaded list.
///
/// Ledger entries come first in list order, then snapshot codes nobody
/// asked for (all of it goes back to stock).
pub fn compare_lists(entries: &[LedgerEntry], index: &StockSnapshotIndex) -> Vec<ComparisonLine> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut lines = Vec::with_capacity(entries.len());

    for entry in entries.iter().filter(|e| !e.terceirizado) {
        seen.insert(entry.code.as_str());
        let outstanding = entry.derived_outstanding();
        let available = index.available(&entry.code);
        lines.push(ComparisonLine {
            code: entry.code.clone(),
            ledger: true,
            outstanding_quantity: outstanding,
            available_quantity: available,
            outcome: outcome(outstanding, available),
        });
    }

    for snap in index.iter().filter(|s| !seen.contains(s.code.as_str())) {
        lines.push(ComparisonLine {
            code: snap.code.clone(),
            ledger: false,
            outstanding_quantity: 0,
            available_quantity: snap.available_quantity,
            outcome: outcome(0, snap.available_quantity),
        });
    }

    lines
}
