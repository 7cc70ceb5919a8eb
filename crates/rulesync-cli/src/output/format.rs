use rulesync_sync::SyncReport;

use super::OutputFormat;

pub fn format_report(report: &SyncReport, verb: &str, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Text => format_report_text(report, verb),
    }
}

fn format_report_text(report: &SyncReport, verb: &str) -> String {
    let mut out = String::new();

    for path in &report.removed {
        out.push_str(&format!("  - {}\n", path.display()));
    }
    for path in &report.written {
        out.push_str(&format!("  + {}\n", path.display()));
    }
    for failure in &report.failures {
        out.push_str(&format!("  ! {}: {}\n", failure.path.display(), failure.message));
    }

    out.push_str(&format!("{verb} {} file(s)", report.written.len()));
    if !report.removed.is_empty() {
        out.push_str(&format!(", removed {}", report.removed.len()));
    }
    if !report.failures.is_empty() {
        out.push_str(&format!(", {} failed", report.failures.len()));
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_text_report_summary() {
        let report = SyncReport {
            written: vec![PathBuf::from(".claude/commands/a.md")],
            removed: vec![PathBuf::from(".claude/commands/old.md")],
            failures: vec![],
        };
        let text = format_report(&report, "Generated", OutputFormat::Text);
        assert!(text.contains("  + .claude/commands/a.md\n"));
        assert!(text.contains("  - .claude/commands/old.md\n"));
        assert!(text.ends_with("Generated 1 file(s), removed 1."));
    }

    #[test]
    fn test_json_report() {
        let report = SyncReport {
            written: vec![PathBuf::from("x.md")],
            ..Default::default()
        };
        let json = format_report(&report, "Generated", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["written"][0], "x.md");
        assert!(value["failures"].as_array().unwrap().is_empty());
    }
}
