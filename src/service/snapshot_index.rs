use indexmap::IndexMap;

use crate::models::{StockRow, StockSnapshotEntry, StockUpload};

/// Code -> available quantity lookup for one uploaded stock list.
///
/// A code appearing more than once keeps the LAST row's quantity; quantities
/// are not summed.
#[derive(Debug, Clone, Default)]
pub struct StockSnapshotIndex {
    upload_id: Option<i64>,
    entries: IndexMap<String, StockSnapshotEntry>,
    skipped_rows: usize,
    duplicate_rows: usize,
}

impl StockSnapshotIndex {
    /// No snapshot uploaded: nothing is available to commit.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a StockRow>,
    {
        let mut index = Self::empty();
        for row in rows {
            match StockSnapshotEntry::try_from(row) {
                Ok(entry) => {
                    if let Some(prev) = index.entries.insert(entry.code.clone(), entry) {
                        index.duplicate_rows += 1;
                        tracing::debug!(
                            "stock code {} listed again, replacing quantity {}",
                            prev.code,
                            prev.available_quantity
                        );
                    }
                }
                Err(e) => {
                    index.skipped_rows += 1;
                    tracing::warn!("skipping stock row: {}", e);
                }
            }
        }
        index
    }

    /// Index of an identified upload. Entries already reconciled against
    /// `upload.upload_id` draw nothing more from it.
    pub fn from_upload(upload: &StockUpload) -> Self {
        let mut index = Self::from_rows(&upload.rows);
        index.upload_id = Some(upload.upload_id);
        index
    }

    pub fn upload_id(&self) -> Option<i64> {
        self.upload_id
    }

    pub fn get(&self, code: &str) -> Option<&StockSnapshotEntry> {
        self.entries.get(code)
    }

    pub fn available(&self, code: &str) -> u64 {
        self.get(code).map(|e| e.available_quantity).unwrap_or(0)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &StockSnapshotEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }
}
