use anyhow::Result;
use rusqlite::OptionalExtension;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use ecotrack_types::models::{ReportRecord, UserRecord};

use crate::Database;

/// Active session: one JSON-encoded UserRecord.
pub const KEY_SESSION: &str = "ecotrack_user";
/// Roster: JSON array of every registered UserRecord.
pub const KEY_ROSTER: &str = "ecotrack_users";
/// Ledger: JSON array of ReportRecords, most-recent-first.
pub const KEY_REPORTS: &str = "ecotrack_reports";

impl Database {
    // -- Raw key-value access --

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at",
                (key, value),
            )?;
            Ok(())
        })
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    // -- Typed namespaces --

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                // An unreadable value reads as absent, not as a failure.
                warn!("Discarding unparseable value under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    fn store_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.put(key, &serde_json::to_string(value)?)
    }

    pub fn load_session(&self) -> Result<Option<UserRecord>> {
        self.load_json(KEY_SESSION)
    }

    pub fn store_session(&self, user: &UserRecord) -> Result<()> {
        self.store_json(KEY_SESSION, user)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.delete(KEY_SESSION)
    }

    pub fn load_roster(&self) -> Result<Vec<UserRecord>> {
        Ok(self.load_json(KEY_ROSTER)?.unwrap_or_default())
    }

    pub fn store_roster(&self, roster: &[UserRecord]) -> Result<()> {
        self.store_json(KEY_ROSTER, roster)
    }

    pub fn load_reports(&self) -> Result<Vec<ReportRecord>> {
        Ok(self.load_json(KEY_REPORTS)?.unwrap_or_default())
    }

    pub fn store_reports(&self, reports: &[ReportRecord]) -> Result<()> {
        self.store_json(KEY_REPORTS, reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_put_delete() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("k").unwrap(), None);

        db.put("k", "v1").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v1"));

        // Whole-value replacement
        db.put("k", "v2").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v2"));

        db.delete("k").unwrap();
        assert_eq!(db.get("k").unwrap(), None);
    }

    #[test]
    fn test_session_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_session().unwrap().is_none());

        let user = UserRecord::new("Priya", "p@x.com", "NIT");
        db.store_session(&user).unwrap();
        assert_eq!(db.load_session().unwrap(), Some(user));

        db.clear_session().unwrap();
        assert!(db.load_session().unwrap().is_none());
    }

    #[test]
    fn test_missing_collections_read_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_roster().unwrap().is_empty());
        assert!(db.load_reports().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let db = Database::open_in_memory().unwrap();
        db.put(KEY_REPORTS, "{not json").unwrap();
        assert!(db.load_reports().unwrap().is_empty());

        db.put(KEY_SESSION, "[]").unwrap(); // wrong shape
        assert!(db.load_session().unwrap().is_none());
    }

    #[test]
    fn test_roster_preserves_order() {
        let db = Database::open_in_memory().unwrap();
        let a = UserRecord::new("A", "a@x.com", "X");
        let b = UserRecord::new("B", "b@x.com", "Y");
        db.store_roster(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(db.load_roster().unwrap(), vec![a, b]);
    }
}
