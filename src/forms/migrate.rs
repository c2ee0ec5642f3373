//! Sequential export and import batches
//!
//! Items are processed strictly one after another in the order given. A
//! failure is recorded for that item and the batch moves on.

use super::files::{write_form_file, FileNames, LocalFormFile};
use super::transform::{clean_form, set_form_name};
use crate::api::models::FormSummary;
use crate::api::operations::FormsApi;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Receives per-item progress events
pub trait ProgressReporter {
    fn started(&self, index: usize, total: usize, label: &str);
    fn succeeded(&self, label: &str, detail: &str);
    fn failed(&self, label: &str, error: &str);
}

/// Reporter that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn started(&self, _index: usize, _total: usize, _label: &str) {}
    fn succeeded(&self, _label: &str, _detail: &str) {}
    fn failed(&self, _label: &str, _error: &str) {}
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    /// `(item label, error message)`
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A local file to import together with the name it should get in the target
#[derive(Debug, Clone)]
pub struct ImportItem {
    pub file: LocalFormFile,
    pub target_name: String,
}

/// Download, clean and save each form as `<out_dir>/<name>.json`; names
/// that collide on disk get a numbered suffix
pub async fn export_forms(
    api: &FormsApi,
    forms: &[FormSummary],
    out_dir: &Path,
    reporter: &dyn ProgressReporter,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut file_names = FileNames::new();

    for (index, form) in forms.iter().enumerate() {
        reporter.started(index, forms.len(), &form.name);

        match export_one(api, form, out_dir, &mut file_names).await {
            Ok(path) => {
                reporter.succeeded(&form.name, &path.display().to_string());
                report.succeeded.push(form.name.clone());
            }
            Err(error) => {
                let message = format!("{:#}", error);
                warn!("Export of '{}' failed: {}", form.name, message);
                reporter.failed(&form.name, &message);
                report.failed.push((form.name.clone(), message));
            }
        }
    }

    info!(
        "[{}] Export finished: {} succeeded, {} failed",
        api.env_name(),
        report.succeeded.len(),
        report.failed.len()
    );
    report
}

async fn export_one(
    api: &FormsApi,
    form: &FormSummary,
    out_dir: &Path,
    file_names: &mut FileNames,
) -> anyhow::Result<PathBuf> {
    let payload = api.download_form(&form.id).await?;
    let cleaned = clean_form(payload);
    write_form_file(out_dir, &file_names.claim(&form.name), &cleaned)
}

/// Create each file's form in the target under its chosen name
pub async fn import_forms(
    api: &FormsApi,
    items: &[ImportItem],
    reporter: &dyn ProgressReporter,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, item) in items.iter().enumerate() {
        let label = item.target_name.clone();
        reporter.started(index, items.len(), &label);

        let mut payload = item.file.payload.clone();
        set_form_name(&mut payload, &item.target_name);

        match api.upload_form(&payload).await {
            Ok(created) => {
                let detail = created
                    .get("id")
                    .and_then(|id| id.as_str())
                    .map(|id| format!("created with id {}", id))
                    .unwrap_or_else(|| "created".to_string());
                reporter.succeeded(&label, &detail);
                report.succeeded.push(label);
            }
            Err(error) => {
                let message = error.to_string();
                warn!("Import of '{}' failed: {}", label, message);
                reporter.failed(&label, &message);
                report.failed.push((label, message));
            }
        }
    }

    info!(
        "[{}] Import finished: {} succeeded, {} failed",
        api.env_name(),
        report.succeeded.len(),
        report.failed.len()
    );
    report
}
