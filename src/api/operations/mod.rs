//! PingOne form operations
//!
//! List, download and upload of form definitions, with HTTP failures
//! translated into [`ApiError`](crate::api::ApiError) variants.

pub mod forms;

pub use forms::{compare_names, sort_forms, FormsApi};
