use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use ecotrack_types::api::{Verdict, VerifyResponse};

use crate::error::VerifyError;

/// Captured evidence for one verification attempt.
#[derive(Debug, Clone)]
pub struct Evidence {
    /// JPEG bytes from the capture provider.
    pub image: Vec<u8>,
    /// Device coordinates at capture time, when granted.
    pub coords: Option<(f64, f64)>,
    /// Capture timestamp; submission time is used when absent.
    pub captured_at: Option<DateTime<Utc>>,
}

impl Evidence {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            coords: None,
            captured_at: None,
        }
    }
}

/// Client for the external AI verification endpoint.
///
/// The endpoint is a fixed, configured URL; there is no discovery and no
/// authentication scheme.
pub struct VerifyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl VerifyClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One submission attempt: POST the evidence, decode the verdict.
    ///
    /// No retry and no idempotency key: resubmitting after a transport
    /// failure is a second, independent attempt.
    pub async fn verify(&self, evidence: Evidence) -> Result<Verdict, VerifyError> {
        let timestamp = evidence
            .captured_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(evidence.image)
                    .file_name("evidence.jpg")
                    .mime_str("image/jpeg")?,
            )
            .text("device_timestamp", timestamp);

        if let Some((latitude, longitude)) = evidence.coords {
            form = form
                .text("latitude", latitude.to_string())
                .text("longitude", longitude.to_string());
        }

        debug!("Submitting evidence to {}", self.endpoint);
        let response: VerifyResponse = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;

        let verdict = Verdict::from(response);
        match &verdict {
            Verdict::Verified { confidence, .. } => {
                info!("Evidence verified (confidence {:?})", confidence);
            }
            Verdict::NotVerified { reason } => {
                info!("Evidence not verified: {}", reason);
            }
        }
        Ok(verdict)
    }
}
