//! CLI output: error mapping and run summaries.

use crate::driver::RunSummary;
use crate::error::ApiError;
use serde_json::json;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    e.to_string()
}

/// Render the summary of a bounded run as text or JSON
pub fn format_run_summary(summary: &RunSummary, format: &str) -> Result<String, ApiError> {
    match format {
        "json" => {
            let value = json!({
                "passes": summary.passes,
                "failed": summary.failed,
                "last": summary.last,
            });
            serde_json::to_string_pretty(&value)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render summary: {}", e)))
        }
        "text" => {
            let mut out = format!(
                "Passes: {} ({} failed)",
                summary.passes, summary.failed
            );
            if let Some(last) = summary.last {
                out.push_str(&format!(
                    "\nLast pass: {} copied, {} updated, {} deleted, {} unchanged",
                    last.copied, last.updated, last.deleted, last.unchanged
                ));
            }
            Ok(out)
        }
        other => Err(ApiError::ConfigError(format!(
            "Invalid summary format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}
