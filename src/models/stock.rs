use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::RowError;

/// Item codes are compared after trimming surrounding whitespace.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_string()
}

/// Uploaded stock/treatment row (t_stock_upload_row)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StockRow {
    pub code: Option<String>,
    pub quantity: i64,
}

impl StockRow {
    pub fn new(code: impl Into<String>, quantity: i64) -> Self {
        Self {
            code: Some(code.into()),
            quantity,
        }
    }
}

/// Rows of one stock/treatment list upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpload {
    pub upload_id: i64,
    pub rows: Vec<StockRow>,
}

/// Available quantity for one code, valid for a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshotEntry {
    pub code: String,
    pub available_quantity: u64,
}

impl TryFrom<&StockRow> for StockSnapshotEntry {
    type Error = RowError;

    fn try_from(row: &StockRow) -> Result<Self, Self::Error> {
        let code = row
            .code
            .as_deref()
            .map(normalize_code)
            .filter(|c| !c.is_empty())
            .ok_or(RowError::MissingCode)?;
        let available_quantity =
            u64::try_from(row.quantity).map_err(|_| RowError::NegativeQuantity {
                code: code.clone(),
                field: "quantity",
                value: row.quantity,
            })?;
        Ok(Self {
            code,
            available_quantity,
        })
    }
}
