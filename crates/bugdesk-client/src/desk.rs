//! Report desk: the role-filtered report cache and its mutations.
//!
//! Every mutation is sent to the gateway first and only reflected in the
//! cache once the server has confirmed it. A failed mutation leaves the
//! cache at its last confirmed value.

use crate::error::DeskError;
use crate::gateway::RemoteDataGateway;
use crate::notify::{Notice, Notices};
use bugdesk_core::{Assignee, Comment, DashboardStats, NewComment, Principal, Report, ReportStatus};
use bugdesk_policy::{AccessRequest, Action, ActionValidator};
use std::sync::Arc;

/// Reports visible to one principal, plus the operations on them.
pub struct ReportDesk {
    gateway: Arc<dyn RemoteDataGateway>,
    principal: Principal,
    validator: ActionValidator,
    notices: Option<Notices>,
    reports: Vec<Report>,
}

impl ReportDesk {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, principal: Principal) -> Self {
        Self {
            gateway,
            principal,
            validator: ActionValidator::new(),
            notices: None,
            reports: Vec::new(),
        }
    }

    /// Emit local notices for confirmed mutations.
    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Fetch all reports and keep the ones this principal may see.
    pub async fn load(&mut self) -> Result<&[Report], DeskError> {
        let all = self.gateway.list_reports().await?;
        let total = all.len();
        self.reports = all
            .into_iter()
            .filter(|report| self.validator.can_view(&self.principal, report))
            .collect();
        tracing::debug!(
            total,
            visible = self.reports.len(),
            role = %self.principal.role,
            "Loaded reports"
        );
        Ok(&self.reports)
    }

    /// Cached reports, in server order.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|report| report.id == id)
    }

    /// Cached reports matching a search term and optional status.
    pub fn filter(&self, search: &str, status: Option<ReportStatus>) -> Vec<&Report> {
        self.reports
            .iter()
            .filter(|report| status.is_none_or(|s| report.status == s))
            .filter(|report| report.matches_search(search))
            .collect()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_reports(&self.reports)
    }

    /// Most recently created reports first.
    pub fn recent(&self, limit: usize) -> Vec<&Report> {
        let mut recent: Vec<&Report> = self.reports.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        recent
    }

    /// Fetch the latest copy of one report.
    pub async fn open(&mut self, id: &str) -> Result<&Report, DeskError> {
        let report = self.gateway.get_report(id).await?;
        self.validator
            .authorize(&AccessRequest::new(Action::ViewReport, &self.principal).on_report(&report))?;
        Ok(self.reflect(report))
    }

    /// Move a report to `status`. Any status may follow any other.
    pub async fn change_status(&mut self, id: &str, status: ReportStatus) -> Result<&Report, DeskError> {
        let current = self.cached(id)?;
        self.validator.authorize(
            &AccessRequest::new(Action::ChangeStatus, &self.principal).on_report(current),
        )?;

        let updated = self
            .gateway
            .update_status(id, status)
            .await
            .inspect_err(|e| tracing::warn!(report_id = %id, error = %e, "Status change failed"))?;

        tracing::info!(report_id = %id, %status, "Report status changed");
        self.emit(Notice::status_updated(id, status)).await;
        Ok(self.reflect(updated))
    }

    /// Assign a report to an operator, or clear the assignment with `None`.
    pub async fn assign(&mut self, id: &str, assignee: Option<&Principal>) -> Result<&Report, DeskError> {
        let current = self.cached(id)?;
        self.validator.authorize(
            &AccessRequest::new(Action::Assign, &self.principal)
                .on_report(current)
                .with_assignee(assignee),
        )?;

        let target = assignee.map(|principal| Assignee {
            id: principal.id.clone(),
            name: principal.username.clone(),
        });
        let updated = self
            .gateway
            .assign(id, target.as_ref())
            .await
            .inspect_err(|e| tracing::warn!(report_id = %id, error = %e, "Assignment failed"))?;

        let name = target.as_ref().map(|t| t.name.as_str());
        tracing::info!(report_id = %id, assignee = name.unwrap_or("-"), "Report assignment changed");
        self.emit(Notice::assigned(id, name)).await;
        Ok(self.reflect(updated))
    }

    /// Add a comment as the current principal.
    pub async fn add_comment(&mut self, id: &str, message: &str) -> Result<&Comment, DeskError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DeskError::EmptyComment);
        }

        let current = self.cached(id)?;
        self.validator
            .authorize(&AccessRequest::new(Action::Comment, &self.principal).on_report(current))?;

        let body = NewComment {
            author_id: self.principal.id.clone(),
            author_name: self.principal.username.clone(),
            message: message.to_string(),
        };
        let comment = self
            .gateway
            .add_comment(id, &body)
            .await
            .inspect_err(|e| tracing::warn!(report_id = %id, error = %e, "Comment failed"))?;

        tracing::info!(report_id = %id, comment_id = %comment.id, "Comment added");
        self.emit(Notice::commented(id, &body.author_name)).await;

        let index = self.index_of(id)?;
        let comments = &mut self.reports[index].comments;
        comments.push(comment);
        Ok(&comments[comments.len() - 1])
    }

    fn index_of(&self, id: &str) -> Result<usize, DeskError> {
        self.reports
            .iter()
            .position(|report| report.id == id)
            .ok_or_else(|| DeskError::UnknownReport(id.to_string()))
    }

    fn cached(&self, id: &str) -> Result<&Report, DeskError> {
        self.index_of(id).map(|index| &self.reports[index])
    }

    /// Replace (or insert) the cached copy with the server's.
    fn reflect(&mut self, report: Report) -> &Report {
        let index = match self.reports.iter().position(|r| r.id == report.id) {
            Some(index) => {
                self.reports[index] = report;
                index
            }
            None => {
                self.reports.push(report);
                self.reports.len() - 1
            }
        };
        &self.reports[index]
    }

    async fn emit(&self, notice: Notice) {
        if let Some(notices) = &self.notices {
            notices.emit(notice).await;
        }
    }
}
