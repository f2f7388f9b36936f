//! Reports, comments and the report lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when parsing a status or severity name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Report severity. Ordered by visual weight only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant {
                kind: "severity",
                value: s.to_string(),
            })
    }
}

/// Report lifecycle status.
///
/// Any status may move to any other status; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Open,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }

    /// Human-readable label ("in progress" rather than "in_progress").
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::InProgress => "in progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// A comment on a report. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// The principal a report is assigned to, as cached on the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignee {
    pub id: String,
    pub name: String,
}

/// A tracked issue report.
///
/// The assignee id and name are either both set or both absent; a partial
/// pair from the server is read as unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ReportWire")]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    /// Reporter's username at creation time; does not follow renames.
    pub reporter_name: String,
    pub app: String,
    pub page: String,
    pub url: String,
    pub description: String,
    /// Data URLs, in upload order.
    pub screenshots: Vec<String>,
    pub severity: Severity,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

/// A report as the API sends it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportWire {
    id: String,
    reporter_id: String,
    reporter_name: String,
    app: String,
    page: String,
    #[serde(default)]
    url: String,
    description: String,
    #[serde(default)]
    screenshots: Vec<String>,
    severity: Severity,
    status: ReportStatus,
    #[serde(default, deserialize_with = "empty_as_none")]
    assigned_to_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    assigned_to_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl From<ReportWire> for Report {
    fn from(wire: ReportWire) -> Self {
        let (assigned_to_id, assigned_to_name) = match (wire.assigned_to_id, wire.assigned_to_name) {
            (Some(id), Some(name)) => (Some(id), Some(name)),
            _ => (None, None),
        };
        Self {
            id: wire.id,
            reporter_id: wire.reporter_id,
            reporter_name: wire.reporter_name,
            app: wire.app,
            page: wire.page,
            url: wire.url,
            description: wire.description,
            screenshots: wire.screenshots,
            severity: wire.severity,
            status: wire.status,
            assigned_to_id,
            assigned_to_name,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            comments: wire.comments,
        }
    }
}

impl Report {
    /// The assignee, present only when both id and name are set.
    pub fn assignee(&self) -> Option<Assignee> {
        match (&self.assigned_to_id, &self.assigned_to_name) {
            (Some(id), Some(name)) => Some(Assignee {
                id: id.clone(),
                name: name.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_filed_by(&self, principal_id: &str) -> bool {
        self.reporter_id == principal_id
    }

    /// Case-insensitive match against description, app and page.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.description, &self.app, &self.page]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The remote API sends `""` for a cleared assignee.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Required fields of the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    App,
    Page,
    Description,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::App => write!(f, "app"),
            FormField::Page => write!(f, "page"),
            FormField::Description => write!(f, "description"),
        }
    }
}

/// User-entered fields of a new report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub app: String,
    pub page: String,
    /// Optional; empty string allowed.
    pub url: String,
    pub description: String,
    pub severity: Severity,
}

impl ReportForm {
    /// Required fields that are empty or whitespace-only, in form order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        [
            (FormField::App, &self.app),
            (FormField::Page, &self.page),
            (FormField::Description, &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Body of a create-report request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub reporter_id: String,
    pub reporter_name: String,
    pub app: String,
    pub page: String,
    pub url: String,
    pub description: String,
    pub screenshots: Vec<String>,
    pub severity: Severity,
}

/// Body of an add-comment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub author_id: String,
    /// The author's username.
    pub author_name: String,
    pub message: String,
}

/// Status counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    /// Resolved and closed reports together.
    pub resolved: usize,
}

impl DashboardStats {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        reports
            .into_iter()
            .fold(DashboardStats::default(), |mut stats, report| {
                stats.total += 1;
                match report.status {
                    ReportStatus::Open => stats.open += 1,
                    ReportStatus::InProgress => stats.in_progress += 1,
                    ReportStatus::Resolved | ReportStatus::Closed => stats.resolved += 1,
                }
                stats
            })
    }
}
