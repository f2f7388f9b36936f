//! Report submission.
//!
//! A submission is validated locally, its attachments are normalized
//! concurrently, and the result goes to the gateway as one create call.
//! Any attachment failure aborts the whole submission before the network is
//! touched.

use crate::error::SubmissionError;
use crate::gateway::RemoteDataGateway;
use bugdesk_core::{NewReport, Principal, Report, ReportForm};
use bugdesk_media::{ImageNormalizer, MediaError, NormalizedImage};
use bugdesk_policy::{AccessRequest, Action, ActionValidator};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;

/// A picked file, not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming the attachment after the file.
    pub fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Lightweight descriptor shown for a picked attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPreview {
    pub name: String,
    pub mime: String,
    pub size: usize,
}

impl AttachmentPreview {
    fn of(attachment: &Attachment) -> Self {
        Self {
            name: attachment.name.clone(),
            mime: mime_guess::from_path(&attachment.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            size: attachment.bytes.len(),
        }
    }
}

/// Form fields plus picked attachments for one report being composed.
///
/// Attachments and previews stay index-aligned through every
/// [`attach`](Self::attach) and [`remove`](Self::remove).
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub form: ReportForm,
    attachments: Vec<Attachment>,
    previews: Vec<AttachmentPreview>,
}

impl ReportDraft {
    pub fn new(form: ReportForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn attach(&mut self, attachment: Attachment) -> &AttachmentPreview {
        self.previews.push(AttachmentPreview::of(&attachment));
        self.attachments.push(attachment);
        &self.previews[self.previews.len() - 1]
    }

    /// Drop attachment `index` and its preview.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.attachments.len() {
            return None;
        }
        self.previews.remove(index);
        Some(self.attachments.remove(index))
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn previews(&self) -> &[AttachmentPreview] {
        &self.previews
    }

    pub fn into_parts(self) -> (ReportForm, Vec<Attachment>) {
        (self.form, self.attachments)
    }
}

/// Validates, normalizes and files reports.
pub struct ReportSubmissionFlow {
    gateway: Arc<dyn RemoteDataGateway>,
    normalizer: Arc<dyn ImageNormalizer>,
    validator: ActionValidator,
}

impl ReportSubmissionFlow {
    pub fn new(gateway: Arc<dyn RemoteDataGateway>, normalizer: Arc<dyn ImageNormalizer>) -> Self {
        Self {
            gateway,
            normalizer,
            validator: ActionValidator::new(),
        }
    }

    /// Submit a composed draft.
    pub async fn submit_draft(
        &self,
        reporter: &Principal,
        draft: ReportDraft,
    ) -> Result<Report, SubmissionError> {
        let (form, attachments) = draft.into_parts();
        self.submit(reporter, &form, attachments).await
    }

    /// File a report.
    ///
    /// Steps, in order, each short-circuiting:
    /// 1. The reporter must be allowed to submit.
    /// 2. Required fields must be non-blank (no network call otherwise).
    /// 3. Every attachment is normalized; the first failing index aborts.
    /// 4. One create call with screenshots in attachment order. No retry.
    pub async fn submit(
        &self,
        reporter: &Principal,
        form: &ReportForm,
        attachments: Vec<Attachment>,
    ) -> Result<Report, SubmissionError> {
        self.validator
            .authorize(&AccessRequest::new(Action::SubmitReport, reporter))?;

        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(SubmissionError::Validation { missing });
        }

        let screenshots = self
            .normalize_all(attachments)
            .await?
            .into_iter()
            .map(|image| image.data_url)
            .collect();

        let body = NewReport {
            reporter_id: reporter.id.clone(),
            reporter_name: reporter.username.clone(),
            app: form.app.trim().to_string(),
            page: form.page.trim().to_string(),
            url: form.url.trim().to_string(),
            description: form.description.trim().to_string(),
            screenshots,
            severity: form.severity,
        };

        match self.gateway.create_report(&body).await {
            Ok(report) => {
                tracing::info!(
                    report_id = %report.id,
                    reporter = %reporter.username,
                    screenshots = report.screenshots.len(),
                    "Report submitted"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Report submission failed");
                Err(e.into())
            }
        }
    }

    /// Normalize every attachment concurrently, preserving input order.
    ///
    /// All normalizations run to completion before the outcome is decided.
    /// Decoding runs on the blocking pool.
    pub async fn normalize_all(
        &self,
        attachments: Vec<Attachment>,
    ) -> Result<Vec<NormalizedImage>, SubmissionError> {
        let tasks = attachments.into_iter().map(|attachment| {
            let normalizer = Arc::clone(&self.normalizer);
            tokio::task::spawn_blocking(move || normalizer.normalize(&attachment.bytes))
        });

        let results = join_all(tasks).await;
        let mut images = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            let outcome = result.unwrap_or_else(|e| {
                Err(MediaError::Render(format!("normalization task failed: {}", e)))
            });
            match outcome {
                Ok(image) => images.push(image),
                Err(source) => {
                    tracing::warn!(index, error = %source, "Attachment normalization failed");
                    return Err(SubmissionError::Attachment { index, source });
                }
            }
        }
        Ok(images)
    }
}
