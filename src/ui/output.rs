//! Colored console output for batch progress and summaries

use crate::forms::{BatchReport, ProgressReporter};
use colored::*;

/// Prints one line per item event
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn started(&self, index: usize, total: usize, label: &str) {
        println!(
            "  {} {}",
            format!("[{}/{}]", index + 1, total).dimmed(),
            label.bright_white().bold()
        );
    }

    fn succeeded(&self, _label: &str, detail: &str) {
        println!("      {} {}", "✓".bright_green().bold(), detail.dimmed());
    }

    fn failed(&self, _label: &str, error: &str) {
        println!("      {} {}", "✗".bright_red().bold(), error.bright_red());
    }
}

pub fn print_summary(action: &str, report: &BatchReport) {
    println!();
    if report.all_succeeded() {
        println!(
            "{} {} {} of {} forms",
            "✓".bright_green().bold(),
            action,
            report.succeeded.len().to_string().bright_green().bold(),
            report.total()
        );
        return;
    }

    println!(
        "{} {} {} of {} forms, {} failed:",
        "⚠".bright_yellow().bold(),
        action,
        report.succeeded.len().to_string().bright_green().bold(),
        report.total(),
        report.failed.len().to_string().bright_red().bold()
    );
    for (label, error) in &report.failed {
        println!("  {} {}: {}", "✗".bright_red(), label.bold(), error);
    }
}

pub fn print_warning(message: &str) {
    println!("  {} {}", "⚠".bright_yellow().bold(), message.bright_yellow());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".bright_green().bold(), message);
}
