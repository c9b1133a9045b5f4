use crate::models::LifecycleStatus;

/// Lifecycle status for `(required, committed)`.
///
/// `committed` is expected to be clamped into `[0, required]` already; anything
/// at or above `required` reads as fully committed.
pub fn derive_status(required: u64, committed: u64) -> LifecycleStatus {
    if required == 0 || committed >= required {
        LifecycleStatus::Empenho
    } else if committed == 0 {
        LifecycleStatus::Compras
    } else {
        LifecycleStatus::EmpenhoCompras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_requirement_is_trivially_satisfied() {
        assert_eq!(derive_status(0, 0), LifecycleStatus::Empenho);
        assert_eq!(derive_status(0, 7), LifecycleStatus::Empenho);
    }

    #[test]
    fn follows_commitment_level() {
        assert_eq!(derive_status(10, 0), LifecycleStatus::Compras);
        assert_eq!(derive_status(10, 1), LifecycleStatus::EmpenhoCompras);
        assert_eq!(derive_status(10, 9), LifecycleStatus::EmpenhoCompras);
        assert_eq!(derive_status(10, 10), LifecycleStatus::Empenho);
    }
}
