use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::new_record_id;

// -- Categories --

/// The six action categories a report can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Waste,
    Tree,
    Water,
    Air,
    Energy,
    Other,
}

#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(String);

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Waste,
        Category::Tree,
        Category::Water,
        Category::Air,
        Category::Energy,
        Category::Other,
    ];

    /// Short id used on the command line and in serialized form.
    pub fn id(self) -> &'static str {
        match self {
            Category::Waste => "waste",
            Category::Tree => "tree",
            Category::Water => "water",
            Category::Air => "air",
            Category::Energy => "energy",
            Category::Other => "other",
        }
    }

    /// Display label; this is what gets persisted on a report.
    pub fn label(self) -> &'static str {
        match self {
            Category::Waste => "Waste Segregation",
            Category::Tree => "Tree Plantation",
            Category::Water => "Water Pollution",
            Category::Air => "Air Pollution",
            Category::Energy => "Energy Conservation",
            Category::Other => "Other",
        }
    }

    /// Cashback awarded for a verified report, fixed per category.
    pub fn cashback(self) -> u32 {
        match self {
            Category::Waste => 50,
            Category::Tree => 100,
            Category::Water => 75,
            Category::Air => 60,
            Category::Energy => 45,
            Category::Other => 30,
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

// -- Severity / status --

/// Reporter-assessed severity of the underlying issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// Report lifecycle. One-way progression; this client only ever writes
/// `Verified`. The step to `Solved` belongs to an external backend process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Verified,
    Solved,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verified => "verified",
            ReportStatus::Solved => "solved",
        })
    }
}

// -- Users --

/// A registered user, as persisted in the roster and the active session.
///
/// Serialized field names keep the camelCase layout of the stored JSON, so
/// a store written by earlier builds of the app reads back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub institution: String,
    #[serde(default)]
    pub total_cashback: u32,
    #[serde(default)]
    pub total_reports: u32,
    #[serde(default)]
    pub solved_reports: u32,
    #[serde(default)]
    pub certificates: u32,
    pub joined_date: DateTime<Utc>,
}

impl UserRecord {
    /// Fresh record at signup: new id, zeroed counters, current join date.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        institution: impl Into<String>,
    ) -> Self {
        UserRecord {
            id: new_record_id(),
            name: name.into(),
            email: email.into(),
            institution: institution.into(),
            total_cashback: 0,
            total_reports: 0,
            solved_reports: 0,
            certificates: 0,
            joined_date: Utc::now(),
        }
    }
}

/// Partial update for the active user; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub institution: Option<String>,
    pub total_cashback: Option<u32>,
    pub total_reports: Option<u32>,
    pub solved_reports: Option<u32>,
    pub certificates: Option<u32>,
}

impl UserPatch {
    /// Shallow field overwrite, `id` and `joined_date` excluded.
    pub fn apply(self, user: &mut UserRecord) {
        if let Some(v) = self.name {
            user.name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.institution {
            user.institution = v;
        }
        if let Some(v) = self.total_cashback {
            user.total_cashback = v;
        }
        if let Some(v) = self.total_reports {
            user.total_reports = v;
        }
        if let Some(v) = self.solved_reports {
            user.solved_reports = v;
        }
        if let Some(v) = self.certificates {
            user.certificates = v;
        }
    }
}

// -- Reports --

/// One submitted report. Created exactly once, on a successful
/// verification; never deleted or mutated by this client afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    /// Category display label, e.g. "Tree Plantation".
    pub category: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub severity: Severity,
    pub status: ReportStatus,
    pub cashback: u32,
    pub date: DateTime<Utc>,
    /// Object labels the verification service detected in the evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_labels: Option<Vec<String>>,
}

impl ReportRecord {
    /// Build the record for an accepted submission.
    pub fn verified(
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
        location: Option<String>,
        severity: Severity,
        ai_labels: Vec<String>,
    ) -> Self {
        ReportRecord {
            id: new_record_id(),
            category: category.label().to_string(),
            title: title.into(),
            description: description.into(),
            location,
            severity,
            status: ReportStatus::Verified,
            cashback: category.cashback(),
            date: Utc::now(),
            ai_labels: if ai_labels.is_empty() {
                None
            } else {
                Some(ai_labels)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cashback_table() {
        assert_eq!(Category::Waste.cashback(), 50);
        assert_eq!(Category::Tree.cashback(), 100);
        assert_eq!(Category::Water.cashback(), 75);
        assert_eq!(Category::Air.cashback(), 60);
        assert_eq!(Category::Energy.cashback(), 45);
        assert_eq!(Category::Other.cashback(), 30);
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(cat.id().parse::<Category>().unwrap(), cat);
        }
        assert!("plastic".parse::<Category>().is_err());
    }

    #[test]
    fn test_new_user_starts_zeroed() {
        let user = UserRecord::new("Priya", "p@x.com", "NIT");
        assert_eq!(user.total_cashback, 0);
        assert_eq!(user.total_reports, 0);
        assert_eq!(user.solved_reports, 0);
        assert_eq!(user.certificates, 0);
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = UserRecord::new("Priya", "p@x.com", "NIT");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("totalCashback").is_some());
        assert!(json.get("joinedDate").is_some());
        assert!(json.get("total_cashback").is_none());
    }

    #[test]
    fn test_user_counters_default_when_absent() {
        // Stored records from before a counter existed must still load.
        let user: UserRecord = serde_json::from_str(
            r#"{"id":"1","name":"A","email":"a@x.com","institution":"X",
                "joinedDate":"2025-01-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(user.certificates, 0);
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let mut user = UserRecord::new("Priya", "p@x.com", "NIT");
        let id = user.id.clone();
        UserPatch {
            institution: Some("IIT Delhi".into()),
            total_reports: Some(3),
            ..Default::default()
        }
        .apply(&mut user);

        assert_eq!(user.id, id);
        assert_eq!(user.name, "Priya");
        assert_eq!(user.institution, "IIT Delhi");
        assert_eq!(user.total_reports, 3);
    }

    #[test]
    fn test_verified_report_record() {
        let report = ReportRecord::verified(
            Category::Tree,
            "Campus planting",
            "Planted five saplings",
            None,
            Severity::Medium,
            vec!["tree".into(), "soil".into()],
        );
        assert_eq!(report.category, "Tree Plantation");
        assert_eq!(report.cashback, 100);
        assert_eq!(report.status, ReportStatus::Verified);
        assert_eq!(report.ai_labels.as_deref(), Some(&["tree".to_string(), "soil".to_string()][..]));
    }

    #[test]
    fn test_report_parses_stored_layout() {
        let report: ReportRecord = serde_json::from_str(
            r#"{"id":"1754000000000abc123def","category":"Waste Segregation",
                "title":"Bin cleanup","description":"Sorted dry waste",
                "location":"Hostel B","severity":"high","status":"verified",
                "cashback":50,"date":"2025-06-01T08:30:00.000Z",
                "ai_labels":["bottle","ashcan"]}"#,
        )
        .unwrap();
        assert_eq!(report.severity, Severity::High);
        assert_eq!(report.status, ReportStatus::Verified);
        assert_eq!(report.ai_labels.unwrap().len(), 2);
    }
}
