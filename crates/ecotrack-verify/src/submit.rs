use tracing::info;

use ecotrack_store::ledger::ReportLedger;
use ecotrack_store::session::SessionStore;
use ecotrack_types::api::Verdict;
use ecotrack_types::models::{Category, ReportRecord, Severity, UserRecord};

use crate::client::{Evidence, VerifyClient};
use crate::error::SubmitError;

/// Fields of a report being drafted, gathered before verification.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub severity: Severity,
}

/// What the caller gets back for an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub report: ReportRecord,
    pub user: UserRecord,
    /// Endpoint confidence in 0.0..=1.0, when reported.
    pub confidence: Option<f64>,
}

/// Full submission workflow: validate, verify remotely, then record the
/// report and the reward. A rejection leaves every store untouched.
pub async fn submit_report(
    client: &VerifyClient,
    session: &SessionStore,
    ledger: &ReportLedger,
    draft: ReportDraft,
    evidence: Evidence,
) -> Result<SubmissionReceipt, SubmitError> {
    validate(&draft, &evidence)?;
    let verdict = client.verify(evidence).await?;
    apply_verdict(session, ledger, draft, verdict)
}

/// Verification without a report: nothing is recorded either way, the
/// verdict is simply handed back.
pub async fn quick_verify(
    client: &VerifyClient,
    evidence: Evidence,
) -> Result<Verdict, SubmitError> {
    if evidence.image.is_empty() {
        return Err(SubmitError::Validation("image"));
    }
    Ok(client.verify(evidence).await?)
}

/// Checked before any network call. The category is already typed, so its
/// presence is enforced at the API boundary.
fn validate(draft: &ReportDraft, evidence: &Evidence) -> Result<(), SubmitError> {
    if draft.title.trim().is_empty() {
        return Err(SubmitError::Validation("title"));
    }
    if draft.description.trim().is_empty() {
        return Err(SubmitError::Validation("description"));
    }
    if evidence.image.is_empty() {
        return Err(SubmitError::Validation("image"));
    }
    Ok(())
}

/// Translate a verdict into a ledger entry plus a session counter update,
/// or into a rejection that changes nothing.
pub fn apply_verdict(
    session: &SessionStore,
    ledger: &ReportLedger,
    draft: ReportDraft,
    verdict: Verdict,
) -> Result<SubmissionReceipt, SubmitError> {
    match verdict {
        Verdict::Verified { confidence, labels } => {
            let report = ReportRecord::verified(
                draft.category,
                draft.title.trim(),
                draft.description.trim(),
                draft.location,
                draft.severity,
                labels,
            );
            ledger.append(&report)?;
            let user = session.apply_reward(report.cashback)?;
            info!(
                "Report {} recorded, +{} cashback",
                report.id, report.cashback
            );
            Ok(SubmissionReceipt {
                report,
                user,
                confidence,
            })
        }
        Verdict::NotVerified { reason } => Err(SubmitError::Rejected { reason }),
    }
}
