pub mod collaborators;
pub mod comparison;
pub mod reconcile_service;
pub mod reconciler;
pub mod snapshot_index;
pub mod status;

pub use collaborators::{LedgerReader, LedgerWriter, StockListProvider};
pub use comparison::compare_lists;
pub use reconcile_service::ReconcileService;
pub use reconciler::{reconcile, reconcile_entries, ReconcileOutcome};
pub use snapshot_index::StockSnapshotIndex;
pub use status::derive_status;
