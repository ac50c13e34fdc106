use serde::Deserialize;

/// Response `status` value that counts as an acceptance. Anything else —
/// the service also sends "rejected" and "error" — is a non-verification.
pub const STATUS_VERIFIED: &str = "verified";

const FALLBACK_REASON: &str = "Verification failed";

/// Raw JSON body returned by the verification endpoint.
///
/// Decoded defensively: only `status` is required, unknown fields are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub status: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub labels_detected: Option<Vec<String>>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Outcome of a single verification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The endpoint accepted the evidence.
    Verified {
        /// Model confidence in 0.0..=1.0, when the endpoint reports one.
        confidence: Option<f64>,
        /// Detected-object labels, free-form.
        labels: Vec<String>,
    },
    /// The endpoint returned any status other than "verified".
    NotVerified { reason: String },
}

impl From<VerifyResponse> for Verdict {
    fn from(resp: VerifyResponse) -> Self {
        if resp.status == STATUS_VERIFIED {
            Verdict::Verified {
                confidence: resp.confidence,
                labels: resp.labels_detected.unwrap_or_default(),
            }
        } else {
            Verdict::NotVerified {
                reason: resp.reason.unwrap_or_else(|| FALLBACK_REASON.to_string()),
            }
        }
    }
}
