//! Export/import of form definitions between environments and local files

pub mod files;
pub mod migrate;
pub mod transform;

pub use files::{scan_form_files, write_form_file, FileNames, LocalFormFile, ScanResult};
pub use migrate::{export_forms, import_forms, BatchReport, ImportItem, ProgressReporter, SilentReporter};
pub use transform::{clean_form, form_name, set_form_name};
