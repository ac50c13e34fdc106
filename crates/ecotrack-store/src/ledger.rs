use std::sync::Arc;

use tracing::debug;

use ecotrack_db::Database;
use ecotrack_types::models::{ReportRecord, ReportStatus};

use crate::error::StoreError;

/// Ordered collection of submitted reports, most-recent-first.
pub struct ReportLedger {
    db: Arc<Database>,
}

impl ReportLedger {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All reports in storage order. A missing or unreadable store reads
    /// as empty.
    pub fn list(&self) -> Result<Vec<ReportRecord>, StoreError> {
        Ok(self.db.load_reports()?)
    }

    /// Insert at the head and persist the whole sequence. Ids are not
    /// deduplicated; callers generate unique ones.
    pub fn append(&self, record: &ReportRecord) -> Result<(), StoreError> {
        let mut reports = self.db.load_reports()?;
        reports.insert(0, record.clone());
        self.db.store_reports(&reports)?;
        debug!("Appended report {} ({})", record.id, record.category);
        Ok(())
    }
}

/// Count of reports an external process has marked solved.
pub fn solved_count(reports: &[ReportRecord]) -> usize {
    reports
        .iter()
        .filter(|r| r.status == ReportStatus::Solved)
        .count()
}

/// Cashback total over solved reports only.
pub fn solved_cashback(reports: &[ReportRecord]) -> u32 {
    reports
        .iter()
        .filter(|r| r.status == ReportStatus::Solved)
        .map(|r| r.cashback)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotrack_types::models::{Category, Severity};

    fn ledger() -> ReportLedger {
        ReportLedger::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn report(category: Category) -> ReportRecord {
        ReportRecord::verified(
            category,
            "Cleanup drive",
            "Cleared the lakeside path",
            None,
            Severity::Medium,
            vec![],
        )
    }

    #[test]
    fn test_append_prepends() {
        let ledger = ledger();
        let first = report(Category::Waste);
        let second = report(Category::Tree);

        ledger.append(&first).unwrap();
        ledger.append(&second).unwrap();

        let listed = ledger.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_list_is_idempotent() {
        let ledger = ledger();
        ledger.append(&report(Category::Water)).unwrap();
        ledger.append(&report(Category::Air)).unwrap();

        assert_eq!(ledger.list().unwrap(), ledger.list().unwrap());
    }

    #[test]
    fn test_empty_ledger_lists_empty() {
        assert!(ledger().list().unwrap().is_empty());
    }

    #[test]
    fn test_solved_aggregates_skip_unsolved() {
        let mut solved = report(Category::Tree);
        solved.status = ReportStatus::Solved;
        let reports = vec![report(Category::Waste), solved, report(Category::Other)];

        assert_eq!(solved_count(&reports), 1);
        assert_eq!(solved_cashback(&reports), 100);
    }

    #[test]
    fn test_solved_aggregates_zero_for_verified_only() {
        // This client only writes "verified", so these stay zero until an
        // external process transitions a record.
        let reports = vec![report(Category::Tree), report(Category::Water)];
        assert_eq!(solved_count(&reports), 0);
        assert_eq!(solved_cashback(&reports), 0);
    }
}
