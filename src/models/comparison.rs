use serde::{Deserialize, Serialize};

/// Outcome of comparing outstanding necessity with an uploaded list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// Item OK
    ItemOk,
    /// Comprar Adicional
    BuyAdditional { quantity: u64 },
    /// Devolver ao Estoque
    ReturnToStock { quantity: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonLine {
    pub code: String,
    /// false for snapshot codes that no ledger entry asks for
    pub ledger: bool,
    pub outstanding_quantity: u64,
    pub available_quantity: u64,
    pub outcome: ComparisonOutcome,
}
