//! Markdown summary report for one screened CV.
//!
//! Rendering is a pure function of the record and the CV file name, so the
//! same record always renders to the same bytes.

use std::fmt::Write;

use crate::pipeline::EnrichedRecord;
use crate::screening::models::ResumeAssessment;

const NOT_AVAILABLE: &str = "N/A";
const NO_SUMMARY: &str = "Not available.";
const NO_STRENGTHS: &str = "No clear strengths identified.";
const NO_MISSING: &str = "No significant missing requirements.";

pub fn render_report(record: &EnrichedRecord<ResumeAssessment>, cv_name: &str) -> String {
    let result = &record.result;
    let score = result
        .match_score
        .map(|s| format!("{s}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let verdict = result
        .verdict
        .as_deref()
        .map(|v| table_cell(&v.to_uppercase()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let summary = result
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_SUMMARY);

    let mut report = String::new();
    let _ = writeln!(report, "# CV Screening Report: {cv_name}\n");
    let _ = writeln!(report, "## Overall Assessment");
    let _ = writeln!(report, "| Metric | Value |");
    let _ = writeln!(report, "| :--- | :--- |");
    let _ = writeln!(report, "| **Match Score** | **{score}** |");
    let _ = writeln!(report, "| **Verdict** | **{verdict}** |\n");

    let _ = writeln!(report, "## Summary");
    let _ = writeln!(report, "> {}\n", summary.replace('\n', "\n> "));

    let _ = writeln!(report, "## Strengths");
    write_bullets(&mut report, result.strengths.as_deref(), NO_STRENGTHS);

    let _ = writeln!(report, "\n## Missing Requirements");
    write_bullets(&mut report, result.missing_requirements.as_deref(), NO_MISSING);

    report
}

/// Keeps free text on one table row.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn write_bullets(report: &mut String, items: Option<&[String]>, placeholder: &str) {
    match items {
        Some(items) if !items.is_empty() => {
            for item in items {
                let _ = writeln!(report, "* {item}");
            }
        }
        _ => {
            let _ = writeln!(report, "* {placeholder}");
        }
    }
}
