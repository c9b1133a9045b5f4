use thiserror::Error;

/// A single ledger or stock row that cannot take part in a run.
///
/// Never fatal: the row is skipped, counted and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row has no item code")]
    MissingCode,
    #[error("item '{code}' has negative {field}: {value}")]
    NegativeQuantity {
        code: String,
        field: &'static str,
        value: i64,
    },
}

/// Run-level failures surfaced to the caller as-is. No retries happen here.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("ledger write matched {written} of {expected} rows, rolled back")]
    PartialWrite { expected: usize, written: u64 },
    #[error("ledger write exceeded {0}s")]
    Timeout(u64),
    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
