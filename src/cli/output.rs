//! Output formatting for CLI results

use colorful::Colorful;
use serde_json::{json, Value};

use crate::core::FeatureReport;

/// Format a report for terminal output
pub fn format_report(report: &FeatureReport, verbose: bool) -> String {
    let mut output = String::new();

    let source = report.source.as_deref().unwrap_or("<signal>");
    output.push_str(&format!("{}\n", source.cyan()));
    output.push_str(&format!(
        "  {} ch @ {} Hz, {:.2}s, {} frames (frame {}, hop {})\n",
        report.channels,
        report.sample_rate,
        report.duration_secs,
        report.frame_count,
        report.frame_size,
        report.hop_length
    ));

    for (kind, stats) in &report.summary {
        for (ch, s) in stats.iter().enumerate() {
            output.push_str(&format!(
                "  {:<20} ch{} mean {:>10.4}  min {:>10.4}  max {:>10.4}",
                kind.name(),
                ch,
                s.mean,
                s.min,
                s.max
            ));
            if verbose {
                output.push_str(&format!("  std {:>10.4}", s.std_dev));
            }
            output.push('\n');
        }
    }

    if !report.overall.is_empty() {
        output.push_str("  Overall:\n");
        for (kind, values) in &report.overall {
            let joined: Vec<String> = values.iter().map(|v| format!("{:.4}", v)).collect();
            output.push_str(&format!("    {:<20} {}\n", kind.name(), joined.join("  ")));
        }
    }

    output
}

/// Report as JSON; per-frame matrices and times only when `include_frames`
pub fn report_json(report: &FeatureReport, include_frames: bool) -> Value {
    let mut value = json!({
        "file": report.source,
        "sample_rate": report.sample_rate,
        "channels": report.channels,
        "samples": report.samples,
        "duration_secs": report.duration_secs,
        "frame_size": report.frame_size,
        "hop_length": report.hop_length,
        "frame_count": report.frame_count,
        "overall": report.overall,
        "summary": report.summary,
    });
    if include_frames {
        value["times"] = json!(report.times);
        value["framed"] = json!(report.framed);
    }
    value
}

/// Format a failure line for a file that could not be analyzed
pub fn format_failure(path: &str, error: &anyhow::Error) -> String {
    format!("{} {}: {:#}", "✗".red(), path, error)
}

/// Format a summary for multiple files
pub fn format_summary(analyzed: usize, failed: usize) -> String {
    let mut output = format!("\nSummary: {} files analyzed\n", analyzed + failed);
    if analyzed > 0 {
        output.push_str(&format!("  {}\n", format!("✓ {} succeeded", analyzed).green()));
    }
    if failed > 0 {
        output.push_str(&format!("  {}\n", format!("✗ {} failed", failed).red()));
    }
    output
}
