//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::aggregate::AggregationReport;
use crate::collate::DataSet;
use crate::statistics::MetricStats;

/// Format a collated data set for human-readable terminal output.
pub fn format_dataset(dataset: &DataSet) -> String {
    let mut output = String::new();

    let header = format!(
        "{} {}",
        dataset.gpu.bold(),
        dataset.simulation_type.join(" ").cyan()
    );
    output.push_str(&format_box_top());
    output.push_str(&format_box_line(&header));
    output.push_str(&format_box_line(
        &format!("Parameters: {}", dataset.parameters.join(" "))
            .dimmed()
            .to_string(),
    ));
    output.push_str(&format_box_separator());

    let trials = format!("Trials: {}", dataset.trial_count());
    output.push_str(&format_box_line(&trials));
    let frames = format!("Mean total frames: {:.1}", dataset.averages.total_frames);
    output.push_str(&format_box_line(&frames));

    output.push_str(&format_box_separator());
    let a = &dataset.averages;
    output.push_str(&format_metric_line("Frame time", &a.frame_time));
    output.push_str(&format_metric_line("Compute time", &a.compute_time));
    output.push_str(&format_metric_line("Graphics time", &a.graphics_time));
    output.push_str(&format_metric_line("Difference", &a.difference));
    output.push_str(&format_box_bottom());

    output
}

/// One-line summary of an aggregation run.
pub fn format_report(report: &AggregationReport) -> String {
    let status = if report.configurations.is_empty() {
        "No configurations found".yellow().to_string()
    } else {
        "\u{2713}".green().bold().to_string()
    };
    format!(
        "{} {} configuration(s), {} file(s) -> {}",
        status,
        report.configurations.len(),
        report.files_processed(),
        report.tables_path.display()
    )
}

fn format_metric_line(label: &str, stats: &MetricStats) -> String {
    let content = format!(
        "{:<14} {:>12.4} \u{00B1} {:<10.4} (var {:.4})",
        label, stats.mean, stats.stdev, stats.variance
    );
    format_box_line(&content)
}

// Box drawing helpers

const BOX_WIDTH: usize = 64;

fn format_box_top() -> String {
    format!("\u{250C}{}\u{2510}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_bottom() -> String {
    format!("\u{2514}{}\u{2518}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_separator() -> String {
    format!("\u{251C}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn format_box_line(content: &str) -> String {
    let visible_len = strip_ansi_codes(content).chars().count();
    let padding = (BOX_WIDTH - 2).saturating_sub(visible_len);
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(padding))
}

/// Strip ANSI escape codes for accurate length calculation.
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
