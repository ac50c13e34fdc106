use thiserror::Error;

use ecotrack_store::error::StoreError;

/// Transport failure or a response body that is not the expected JSON.
/// Both read as "could not reach the service" to the user.
#[derive(Debug, Error)]
#[error("could not reach the verification service: {0}")]
pub struct VerifyError(#[from] reqwest::Error);

/// Failures of the submission workflow.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field was missing; nothing was sent over the network.
    #[error("missing required field: {0}")]
    Validation(&'static str),

    /// The endpoint examined the evidence and turned it down.
    #[error("verification failed: {reason}")]
    Rejected { reason: String },

    #[error(transparent)]
    Connectivity(#[from] VerifyError),

    /// Local persistence failed after a successful verification.
    #[error(transparent)]
    Store(#[from] StoreError),
}
