//! Client for the external AI verification endpoint, and the submission
//! workflow that turns an accepted verdict into a ledger entry plus a
//! session reward.

pub mod client;
pub mod error;
pub mod submit;
