use std::sync::Arc;

use tracing::{debug, warn};

use ecotrack_db::Database;
use ecotrack_types::models::{UserPatch, UserRecord};

use crate::error::StoreError;

/// Owns the authenticated-user record and the roster of registered users.
///
/// Explicit service object with an injected store: constructed once per
/// process and passed by reference to consumers.
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new account and open a session for it.
    ///
    /// The password is accepted for interface compatibility and dropped;
    /// nothing stores or compares it. There is no conflict check on email.
    pub fn sign_up(
        &self,
        name: &str,
        email: &str,
        institution: &str,
        _password: &str,
    ) -> Result<UserRecord, StoreError> {
        let user = UserRecord::new(name, email, institution);

        // Roster first, then session, both before returning.
        let mut roster = self.db.load_roster()?;
        roster.push(user.clone());
        self.db.store_roster(&roster)?;
        self.db.store_session(&user)?;

        debug!("Signed up {} ({})", user.name, user.id);
        Ok(user)
    }

    /// Open a session for the first roster entry with this exact email.
    pub fn log_in(&self, email: &str, _password: &str) -> Result<UserRecord, StoreError> {
        let roster = self.db.load_roster()?;
        let user = roster
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(StoreError::NotFound)?;

        self.db.store_session(&user)?;
        debug!("Logged in {}", user.id);
        Ok(user)
    }

    /// Close the session. The roster is untouched.
    pub fn log_out(&self) -> Result<(), StoreError> {
        self.db.clear_session()?;
        Ok(())
    }

    pub fn active_user(&self) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.db.load_session()?)
    }

    /// Merge `patch` into the active user, then overwrite the matching
    /// roster entry. Both values are persisted before this returns. A
    /// missing roster entry leaves the roster unchanged.
    pub fn update_active_user(&self, patch: UserPatch) -> Result<UserRecord, StoreError> {
        let mut user = self.db.load_session()?.ok_or(StoreError::NoActiveSession)?;
        patch.apply(&mut user);
        self.db.store_session(&user)?;

        let mut roster = self.db.load_roster()?;
        match roster.iter_mut().find(|u| u.id == user.id) {
            Some(entry) => {
                *entry = user.clone();
                self.db.store_roster(&roster)?;
            }
            None => {
                warn!(
                    "Active user {} has no roster entry; roster left unchanged",
                    user.id
                );
            }
        }

        Ok(user)
    }

    /// Counter update for one verified report.
    pub fn apply_reward(&self, cashback: u32) -> Result<UserRecord, StoreError> {
        let user = self.db.load_session()?.ok_or(StoreError::NoActiveSession)?;
        self.update_active_user(UserPatch {
            total_reports: Some(user.total_reports + 1),
            total_cashback: Some(user.total_cashback + cashback),
            ..Default::default()
        })
    }
}
