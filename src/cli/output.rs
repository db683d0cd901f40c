//! Human-readable rendering of sync reports.

use std::fmt::Write;

use crate::domain::{ReportState, SyncReport};

fn state_label(state: &ReportState) -> String {
    match state {
        ReportState::Running => "running".to_string(),
        ReportState::Completed => "completed".to_string(),
        ReportState::DryRun => "dry run".to_string(),
        ReportState::TimedOut => "timed out".to_string(),
        ReportState::Failed { error } => format!("failed: {}", error),
    }
}

/// Multi-line summary of one pipeline
pub fn render_report(report: &SyncReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} [{}] -> {}",
        if report.collection.title.is_empty() {
            "(unknown playlist)"
        } else {
            report.collection.title.as_str()
        },
        report.collection.id,
        report.directory.display()
    );
    let _ = writeln!(out, "  status:     {}", state_label(&report.state));

    if report.is_failed() {
        return out;
    }

    let _ = writeln!(out, "  catalog:    {} entries", report.catalog_size);

    if matches!(report.state, ReportState::DryRun) {
        for entry in &report.plan.to_download {
            let _ = writeln!(out, "  + {} ({})", entry.display_title, entry.id);
        }
        for file_name in &report.plan.to_delete {
            let _ = writeln!(out, "  - {}", file_name);
        }
    } else {
        let _ = writeln!(
            out,
            "  downloaded: {}/{}",
            report.downloaded.len(),
            report.plan.to_download.len()
        );
        let _ = writeln!(
            out,
            "  deleted:    {}/{}",
            report.deleted.len(),
            report.plan.to_delete.len()
        );
    }

    for ambiguous in &report.plan.ambiguous {
        let _ = writeln!(
            out,
            "  ? {} kept, shared by: {}",
            ambiguous.id,
            ambiguous.file_names.join(", ")
        );
    }
    for failure in &report.failures {
        let _ = writeln!(
            out,
            "  ! {} {}: {}",
            failure.action, failure.item, failure.error
        );
    }
    if report.abandoned > 0 {
        let _ = writeln!(out, "  abandoned:  {}", report.abandoned);
    }

    out
}

/// One-line totals across pipelines
pub fn render_totals(reports: &[SyncReport]) -> String {
    let failed = reports.iter().filter(|r| r.is_failed()).count();
    let downloaded: usize = reports.iter().map(|r| r.downloaded.len()).sum();
    let deleted: usize = reports.iter().map(|r| r.deleted.len()).sum();
    let item_failures: usize = reports.iter().map(|r| r.failures.len()).sum();

    format!(
        "{} playlist(s): {} failed, {} downloaded, {} deleted, {} item failure(s)",
        reports.len(),
        failed,
        downloaded,
        deleted,
        item_failures
    )
}
