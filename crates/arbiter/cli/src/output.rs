//! Output formatting utilities

use arbiter_audit::{StoredEntry, VerificationReport};
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// One row of `arbiter inspect`.
#[derive(Debug, Tabled)]
pub struct RecordRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Decision")]
    pub decision_id: String,
    #[tabled(rename = "Mode")]
    pub mode: String,
    #[tabled(rename = "Option")]
    pub selected_option: String,
    #[tabled(rename = "Digest")]
    pub digest: String,
}

impl RecordRow {
    pub fn from_entry(position: usize, entry: &StoredEntry) -> Self {
        let Some(record) = entry.record() else {
            return Self {
                position,
                decision_id: "-".into(),
                mode: "unreadable".into(),
                selected_option: "-".into(),
                digest: "-".into(),
            };
        };
        let field = |name: &str| {
            record
                .payload
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        };
        Self {
            position,
            decision_id: field("decision_id"),
            mode: field("mode").to_uppercase(),
            selected_option: field("selected_option"),
            digest: record.digest.chars().take(12).collect(),
        }
    }
}

pub fn print_records(rows: Vec<RecordRow>) {
    if rows.is_empty() {
        println!("{}", "No records".dimmed());
    } else {
        println!("{}", Table::new(rows));
    }
}

pub fn print_report(report: &VerificationReport) {
    if report.is_intact() {
        print_success(&format!(
            "audit log intact: {} of {} records verified",
            report.verified_records, report.total_records
        ));
        return;
    }

    print_error(&format!(
        "audit log TAMPERED: {} of {} records failed verification",
        report.failures.len(),
        report.total_records
    ));
    for failure in &report.failures {
        eprintln!(
            "  #{} {} - {}",
            failure.position,
            failure.decision_id.as_deref().unwrap_or("-"),
            failure.reason
        );
    }
}
