use thiserror::Error;

/// Failures surfaced by the session store and the report ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Login email has no matching roster entry.
    #[error("account not found")]
    NotFound,

    /// An operation that needs a logged-in user found none.
    #[error("no active session")]
    NoActiveSession,

    /// Underlying persistence failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
