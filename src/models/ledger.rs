use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::RowError;
use crate::models::result::LedgerUpdate;
use crate::models::stock::normalize_code;

/// client -> project -> material list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListScope {
    pub client_id: String,
    pub project_id: String,
    pub list_id: String,
}

impl ListScope {
    pub fn new(
        client_id: impl Into<String>,
        project_id: impl Into<String>,
        list_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            project_id: project_id.into(),
            list_id: list_id.into(),
        }
    }
}

impl fmt::Display for ListScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.client_id, self.project_id, self.list_id)
    }
}

/// Necessity lifecycle of one list item.
///
/// Independent of the purchasing/receiving status stored on the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
    /// nothing committed from stock, must be purchased
    Compras,
    /// fully satisfied from stock
    Empenho,
    /// partially satisfied, remainder must be purchased
    #[serde(rename = "Empenho/Compras")]
    EmpenhoCompras,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compras => "Compras",
            Self::Empenho => "Empenho",
            Self::EmpenhoCompras => "Empenho/Compras",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Compras" => Ok(Self::Compras),
            "Empenho" => Ok(Self::Empenho),
            "Empenho/Compras" | "Empenho-Compras" | "EmpenhoCompras" => Ok(Self::EmpenhoCompras),
            other => Err(format!("unknown lifecycle status '{}'", other)),
        }
    }
}

/// Material list item as stored (t_material_item)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LedgerRow {
    pub item_id: i64,
    pub code: Option<String>,
    pub required_qty: i64,
    pub committed_qty: i64,
    pub outstanding_qty: Option<i64>,
    pub lifecycle_status: Option<String>,
    pub terceirizado: bool,
    /// stock upload this row was last reconciled against
    pub last_upload_id: Option<i64>,
}

/// Validated ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// row identity; updates are written back by this key
    pub item_id: i64,
    pub code: String,
    pub required_quantity: u64,
    pub committed_quantity: u64,
    /// as read back from storage; the engine re-derives it
    pub outstanding_quantity: u64,
    pub lifecycle_status: Option<LifecycleStatus>,
    pub terceirizado: bool,
    pub last_upload_id: Option<i64>,
}

impl LedgerEntry {
    pub fn new(code: impl Into<String>, required_quantity: u64, committed_quantity: u64) -> Self {
        Self {
            item_id: 0,
            code: code.into(),
            required_quantity,
            committed_quantity,
            outstanding_quantity: required_quantity.saturating_sub(committed_quantity),
            lifecycle_status: None,
            terceirizado: false,
            last_upload_id: None,
        }
    }

    pub fn with_item_id(mut self, item_id: i64) -> Self {
        self.item_id = item_id;
        self
    }

    /// `required - committed`, clamped at zero.
    pub fn derived_outstanding(&self) -> u64 {
        self.required_quantity.saturating_sub(self.committed_quantity)
    }

    /// Copies the values of an update for this entry's row.
    pub fn apply(&mut self, update: &LedgerUpdate) {
        self.committed_quantity = update.committed_quantity;
        self.outstanding_quantity = update.outstanding_quantity;
        self.lifecycle_status = Some(update.lifecycle_status);
        self.last_upload_id = update.upload_id;
    }
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = RowError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        let code = row
            .code
            .as_deref()
            .map(normalize_code)
            .filter(|c| !c.is_empty())
            .ok_or(RowError::MissingCode)?;

        let required_quantity =
            u64::try_from(row.required_qty).map_err(|_| RowError::NegativeQuantity {
                code: code.clone(),
                field: "required_qty",
                value: row.required_qty,
            })?;
        let committed_quantity =
            u64::try_from(row.committed_qty).map_err(|_| RowError::NegativeQuantity {
                code: code.clone(),
                field: "committed_qty",
                value: row.committed_qty,
            })?;

        Ok(Self {
            item_id: row.item_id,
            code,
            required_quantity,
            committed_quantity,
            outstanding_quantity: row
                .outstanding_qty
                .and_then(|q| u64::try_from(q).ok())
                .unwrap_or(0),
            lifecycle_status: row
                .lifecycle_status
                .as_deref()
                .and_then(|s| s.parse().ok()),
            terceirizado: row.terceirizado,
            last_upload_id: row.last_upload_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: Option<&str>, required: i64, committed: i64) -> LedgerRow {
        LedgerRow {
            item_id: 1,
            code: code.map(str::to_string),
            required_qty: required,
            committed_qty: committed,
            outstanding_qty: Some(required - committed),
            lifecycle_status: Some("Compras".to_string()),
            terceirizado: false,
            last_upload_id: None,
        }
    }

    #[test]
    fn converts_valid_row_and_trims_code() {
        let entry = LedgerEntry::try_from(row(Some("  TB-100 "), 10, 4)).unwrap();
        assert_eq!(entry.code, "TB-100");
        assert_eq!(entry.required_quantity, 10);
        assert_eq!(entry.committed_quantity, 4);
        assert_eq!(entry.outstanding_quantity, 6);
        assert_eq!(entry.lifecycle_status, Some(LifecycleStatus::Compras));
    }

    #[test]
    fn missing_or_blank_code_is_malformed() {
        assert_eq!(
            LedgerEntry::try_from(row(None, 1, 0)),
            Err(RowError::MissingCode)
        );
        assert_eq!(
            LedgerEntry::try_from(row(Some("   "), 1, 0)),
            Err(RowError::MissingCode)
        );
    }

    #[test]
    fn negative_quantities_are_malformed() {
        let err = LedgerEntry::try_from(row(Some("A"), -1, 0)).unwrap_err();
        assert!(matches!(
            err,
            RowError::NegativeQuantity { field: "required_qty", value: -1, .. }
        ));
    }

    #[test]
    fn unknown_stored_status_reads_as_none() {
        let mut r = row(Some("A"), 3, 0);
        r.lifecycle_status = Some("Comprado".to_string());
        assert_eq!(LedgerEntry::try_from(r).unwrap().lifecycle_status, None);
    }

    #[test]
    fn status_labels_round_trip_through_storage() {
        for s in [
            LifecycleStatus::Compras,
            LifecycleStatus::Empenho,
            LifecycleStatus::EmpenhoCompras,
        ] {
            assert_eq!(s.as_str().parse::<LifecycleStatus>(), Ok(s));
        }
        assert_eq!(
            "Empenho-Compras".parse::<LifecycleStatus>(),
            Ok(LifecycleStatus::EmpenhoCompras)
        );
    }
}
