//! Colored console output for check reports.

use crate::types::{AvailabilityStatus, CheckReport, Result};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const HEADERS: [&str; 3] = ["Platform", "Status", "Details"];

/// Console output handler with colors and formatting.
pub struct ConsoleOutput {
    json_mode: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(json_mode: bool) -> Self {
        Self { json_mode }
    }

    /// Print every report, separated by a rule.
    pub fn print_reports(&self, reports: &[CheckReport]) -> Result<()> {
        if self.json_mode {
            println!("{}", serde_json::to_string_pretty(reports)?);
            return Ok(());
        }

        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                println!("{}", "─".repeat(60).dimmed());
            }
            self.print_report(report);
        }
        Ok(())
    }

    /// Print one report as a table with a summary line.
    pub fn print_report(&self, report: &CheckReport) {
        println!();
        println!("Checking availability for: {}", report.name.bold());
        println!();

        let rate_limited = report.rate_limited();
        if !rate_limited.is_empty() {
            println!(
                "{}",
                format!("⚠ Rate limited on: {}", rate_limited.join(", ")).yellow()
            );
            println!();
        }

        let rows = table_rows(report);
        let widths = column_widths(&rows);

        println!(
            "{}",
            format!(
                "{:<w0$}  {:<w1$}  {}",
                HEADERS[0],
                HEADERS[1],
                HEADERS[2],
                w0 = widths[0],
                w1 = widths[1]
            )
            .bold()
        );
        for (row, result) in rows.iter().zip(&report.results) {
            // Pad before coloring; escape codes would skew the width.
            let platform = format!("{:<w$}", row[0], w = widths[0]);
            let status = format!("{:<w$}", row[1], w = widths[1]);
            println!(
                "{}  {}  {}",
                platform.cyan(),
                paint_status(&result.status, &status),
                row[2].dimmed()
            );
        }

        println!();
        println!(
            "{} | {} | {}",
            format!("{} available", report.summary.available).green(),
            format!("{} taken", report.summary.taken).red(),
            format!("{} unknown", report.summary.unknown).yellow()
        );
        println!();
    }

    /// Create a spinner shown while checks run.
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.json_mode {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Plain status text, before coloring.
fn status_text(status: &AvailabilityStatus) -> &'static str {
    match status {
        AvailabilityStatus::Available => "✓ Available",
        AvailabilityStatus::Taken { .. } => "✗ Taken",
        AvailabilityStatus::Unknown { .. } => "? Unknown",
    }
}

fn paint_status(status: &AvailabilityStatus, text: &str) -> ColoredString {
    match status {
        AvailabilityStatus::Available => text.green(),
        AvailabilityStatus::Taken { .. } => text.red(),
        AvailabilityStatus::Unknown { .. } => text.yellow(),
    }
}

fn table_rows(report: &CheckReport) -> Vec<[String; 3]> {
    report
        .results
        .iter()
        .map(|r| {
            [
                r.label.clone(),
                status_text(&r.status).to_string(),
                r.status.details().unwrap_or_default().to_string(),
            ]
        })
        .collect()
}

fn column_widths(rows: &[[String; 3]]) -> [usize; 3] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}
