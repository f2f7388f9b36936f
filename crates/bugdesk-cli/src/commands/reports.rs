//! `bugdesk reports ...` command implementations.

use crate::app::App;
use anyhow::{Context, Result, bail};
use bugdesk_client::{Attachment, ReportDraft, ReportSubmissionFlow, UserDirectory};
use bugdesk_core::{Report, ReportForm, ReportStatus, Severity};
use bugdesk_media::{JpegNormalizer, decode_data_url};
use bugdesk_policy::{ActionValidator, Screen};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One-line summary used by list views.
pub fn print_row(report: &Report) {
    let assignee = report
        .assigned_to_name
        .as_deref()
        .map(|name| format!(" → {}", name))
        .unwrap_or_default();
    println!(
        "  #{:<8} [{:<11}] {:<6} {} / {}{}",
        report.id,
        report.status.label(),
        report.severity.as_str(),
        report.app,
        report.page,
        assignee
    );
}

fn print_detail(report: &Report) {
    println!("Report #{}", report.id);
    println!("  App:         {}", report.app);
    println!("  Page:        {}", report.page);
    if !report.url.is_empty() {
        println!("  URL:         {}", report.url);
    }
    println!("  Severity:    {}", report.severity);
    println!("  Status:      {}", report.status.label());
    println!("  Reporter:    {}", report.reporter_name);
    match report.assignee() {
        Some(assignee) => println!("  Assigned to: {}", assignee.name),
        None => println!("  Assigned to: (unassigned)"),
    }
    println!("  Created:     {}", report.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated:     {}", report.updated_at.format("%Y-%m-%d %H:%M"));
    println!("  Screenshots: {}", report.screenshots.len());
    println!();
    println!("{}", report.description);

    if !report.comments.is_empty() {
        println!();
        println!("Comments:");
        for comment in &report.comments {
            println!(
                "  [{}] {}: {}",
                comment.timestamp.format("%Y-%m-%d %H:%M"),
                comment.author_name,
                comment.message
            );
        }
    }
}

pub async fn list(app: &App, search: Option<String>, status: Option<ReportStatus>) -> Result<()> {
    let Some(principal) = app.enter(Screen::ReportList).await? else {
        return Ok(());
    };
    let mut desk = app.desk(principal);
    desk.load().await?;

    let matches = desk.filter(search.as_deref().unwrap_or(""), status);
    if matches.is_empty() {
        println!("No reports found.");
        return Ok(());
    }
    for report in &matches {
        print_row(report);
    }
    println!();
    println!("{} of {} report(s)", matches.len(), desk.reports().len());
    Ok(())
}

pub async fn show(app: &App, id: &str, save_screenshots: Option<PathBuf>) -> Result<()> {
    let Some(principal) = app.enter(Screen::ReportDetail).await? else {
        return Ok(());
    };
    let mut desk = app.desk(principal);
    let report = desk.open(id).await?.clone();
    print_detail(&report);

    if let Some(dir) = save_screenshots {
        for path in save_screenshot_files(&report, &dir)? {
            println!("✔ Saved {}", path.display());
        }
    }

    let validator = ActionValidator::new();
    if !validator.can_comment(desk.principal(), &report) {
        println!();
        println!("This report is closed; comments are disabled.");
    }
    Ok(())
}

fn save_screenshot_files(report: &Report, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut written = Vec::with_capacity(report.screenshots.len());
    for (index, data_url) in report.screenshots.iter().enumerate() {
        let decoded = decode_data_url(data_url)
            .with_context(|| format!("Screenshot {} is not a valid data URL", index + 1))?;
        let path = dir.join(format!("{}-{}.{}", report.id, index + 1, decoded.extension()));
        fs::write(&path, &decoded.bytes)?;
        written.push(path);
    }
    Ok(written)
}

/// Form fields for `reports submit`.
pub struct SubmitArgs {
    pub app: String,
    pub page: String,
    pub url: Option<String>,
    pub description: String,
    pub severity: Severity,
    pub attachments: Vec<PathBuf>,
}

pub async fn submit(app: &App, args: SubmitArgs) -> Result<()> {
    let Some(principal) = app.enter(Screen::SubmitReport).await? else {
        return Ok(());
    };

    let mut draft = ReportDraft::new(ReportForm {
        app: args.app,
        page: args.page,
        url: args.url.unwrap_or_default(),
        description: args.description,
        severity: args.severity,
    });
    for path in &args.attachments {
        let attachment = Attachment::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let preview = draft.attach(attachment);
        println!("  + {} ({}, {} bytes)", preview.name, preview.mime, preview.size);
    }

    let flow = ReportSubmissionFlow::new(app.gateway.clone(), Arc::new(JpegNormalizer::default()));
    let report = flow.submit_draft(&principal, draft).await?;
    println!(
        "✔ Report #{} submitted with {} screenshot(s)",
        report.id,
        report.screenshots.len()
    );
    Ok(())
}

pub async fn set_status(app: &App, id: &str, status: ReportStatus) -> Result<()> {
    let Some(principal) = app.enter(Screen::ReportDetail).await? else {
        return Ok(());
    };
    let mut desk = app.desk(principal);
    desk.open(id).await?;
    let report = desk.change_status(id, status).await?;
    println!("✔ Report #{} is now {}", report.id, report.status.label());
    Ok(())
}

pub async fn assign(app: &App, id: &str, to: Option<String>) -> Result<()> {
    let Some(principal) = app.enter(Screen::ReportDetail).await? else {
        return Ok(());
    };

    let assignee = match to {
        Some(username) => {
            let directory = UserDirectory::new(app.gateway.clone(), principal.clone());
            match directory.find(&username).await? {
                Some(user) => Some(user),
                None => bail!("No user named '{}'", username),
            }
        }
        None => None,
    };

    let mut desk = app.desk(principal);
    desk.open(id).await?;
    let report = desk.assign(id, assignee.as_ref()).await?;
    match report.assignee() {
        Some(assignee) => println!("✔ Report #{} assigned to {}", report.id, assignee.name),
        None => println!("✔ Report #{} is unassigned", report.id),
    }
    Ok(())
}

pub async fn comment(app: &App, id: &str, message: &str) -> Result<()> {
    let Some(principal) = app.enter(Screen::ReportDetail).await? else {
        return Ok(());
    };
    let mut desk = app.desk(principal);
    desk.open(id).await?;
    let comment = desk.add_comment(id, message).await?;
    println!("✔ Comment added to report #{}", id);
    println!("  {}: {}", comment.author_name, comment.message);
    Ok(())
}
