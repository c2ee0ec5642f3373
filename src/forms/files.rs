//! Reading and writing form definitions as local JSON files

use super::transform::form_name;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A form definition read from disk
#[derive(Debug, Clone)]
pub struct LocalFormFile {
    pub path: PathBuf,
    /// Form name from the payload, or the file stem when it has none
    pub name: String,
    pub payload: Value,
}

/// Outcome of scanning a directory; unreadable files do not abort the scan
#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<LocalFormFile>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Read every `*.json` file directly inside `dir`, sorted by file name
pub fn scan_form_files(dir: &Path) -> Result<ScanResult> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?
            .path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();

    let mut result = ScanResult::default();
    for path in paths {
        match read_form_file(&path) {
            Ok(file) => result.files.push(file),
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                result.errors.push((path, format!("{:#}", e)));
            }
        }
    }

    debug!(
        "Scanned {}: {} form files, {} unreadable",
        dir.display(),
        result.files.len(),
        result.errors.len()
    );
    Ok(result)
}

pub fn read_form_file(path: &Path) -> Result<LocalFormFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let payload: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in file: {}", path.display()))?;

    if !payload.is_object() {
        anyhow::bail!("Expected a JSON object in file: {}", path.display());
    }

    let name = form_name(&payload)
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();

    Ok(LocalFormFile {
        path: path.to_path_buf(),
        name,
        payload,
    })
}

/// Hands out distinct `.json` file names within one export.
///
/// Names that sanitize to the same file (compared case-insensitively) get a
/// ` (2)`, ` (3)`, ... suffix.
#[derive(Debug, Default)]
pub struct FileNames {
    taken: HashSet<String>,
}

impl FileNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        let base = sanitize_file_name(name);
        let mut candidate = format!("{}.json", base);
        let mut counter = 2;
        while !self.taken.insert(candidate.to_lowercase()) {
            candidate = format!("{} ({}).json", base, counter);
            counter += 1;
        }
        candidate
    }
}

/// Write `payload` as pretty JSON to `<dir>/<file_name>`
pub fn write_form_file(dir: &Path, file_name: &str, payload: &Value) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    let content = serde_json::to_string_pretty(payload).context("Failed to serialize form")?;
    fs::write(&path, content + "\n")
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Replace characters that are not safe in file names
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_matches('.');
    if trimmed.is_empty() {
        "form".to_string()
    } else {
        trimmed.to_string()
    }
}
