pub mod comparison;
pub mod ledger;
pub mod result;
pub mod stock;

pub use comparison::{ComparisonLine, ComparisonOutcome};
pub use ledger::{LedgerEntry, LedgerRow, LifecycleStatus, ListScope};
pub use result::{LedgerUpdate, ReconcileStats};
pub use stock::{normalize_code, StockRow, StockSnapshotEntry, StockUpload};
