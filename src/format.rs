//! Rendering a [`SummaryResult`] as a single display string.

use crate::summary::SummaryResult;
use std::fmt;

/// Render a summary: heading, body verbatim, then a metadata trailer.
///
/// ```text
/// # Report
///
/// <body>
///
/// ---
/// Words: 120
/// Processing time: 1.20s
/// Source: report.pdf
/// Saved to: summaries/report.md
/// ```
///
/// The source and storage lines appear only when the service returned them.
/// The output depends only on `result`.
pub fn format_summary(result: &SummaryResult) -> String {
    let mut out = String::with_capacity(result.body.len() + result.title.len() + 128);

    out.push_str("# ");
    out.push_str(result.title.trim());
    out.push_str("\n\n");

    out.push_str(&result.body);
    if !result.body.ends_with('\n') {
        out.push('\n');
    }

    out.push_str("\n---\n");
    out.push_str(&format!("Words: {}\n", result.word_count));
    out.push_str(&format!(
        "Processing time: {:.2}s\n",
        result.processing_time_seconds
    ));
    if let Some(ref name) = result.source_file_name {
        out.push_str(&format!("Source: {name}\n"));
    }
    if let Some(ref path) = result.storage_path {
        out.push_str(&format!("Saved to: {path}\n"));
    }
    out
}

impl fmt::Display for SummaryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_summary(self))
    }
}
