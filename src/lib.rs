pub mod api;
pub mod config;
pub mod forms;
pub mod ui;
