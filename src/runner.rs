//! High-level runner API for the story exporter.
//!
//! This module provides the public interface that wires the API client,
//! paginated search, and report writer into a single synchronous pipeline.
//!
//! This is the primary API for external users and for the CLI.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::api::{Api, ApiClient, ClientConfig};
use crate::report::{self, ReportError};
use crate::search;

/// Arguments for running a story export
pub struct ExportArgs {
    /// Search query, passed through verbatim to the API
    pub query: String,
    /// Path of the XLSX report to create
    pub output: PathBuf,
    /// Search results requested per page
    pub page_size: usize,
    /// API base URL
    pub base_url: String,
    /// API auth token
    pub token: String,

    // Test-only: inject a canned API (no network)
    #[cfg(test)]
    pub test_api: Option<Box<dyn Api>>,
}

/// Result of a completed export
#[derive(Debug)]
pub struct ExportResult {
    /// Total matches reported by the server, if it reported one
    pub total: Option<u64>,
    /// Stories actually fetched and sent to the report
    pub matched: usize,
    /// Sheets in the saved workbook
    pub sheets_written: usize,
    /// Data rows in the saved workbook
    pub rows_written: usize,
    /// Present when pagination stopped at the fetch cap
    pub truncation_warning: Option<String>,
    /// Set when the output file was locked by another process and the
    /// workbook could not be saved
    pub locked_path: Option<PathBuf>,
}

/// Run a story export with the specified arguments.
///
/// Searches for stories, follows continuation pages up to the fetch cap, and
/// writes one report sheet per epic labeled "Test Suite".
///
/// A locked output file is not treated as a failure: the condition is
/// reported through [`ExportResult::locked_path`] so the caller can print a
/// remediation hint and terminate normally.
///
/// # Example
///
/// ```no_run
/// use clubhouse_export::runner::{run_export, ExportArgs};
/// use std::path::PathBuf;
///
/// # fn example() -> anyhow::Result<()> {
/// let args = ExportArgs {
///     query: "label:To-be-tested".to_string(),
///     output: PathBuf::from("output_sample.xlsx"),
///     page_size: 25,
///     base_url: "https://api.clubhouse.io/".to_string(),
///     token: std::env::var("CLUBHOUSE_TOKEN")?,
/// };
///
/// let result = run_export(args)?;
/// println!("wrote {} stories", result.rows_written);
/// # Ok(())
/// # }
/// ```
pub fn run_export(args: ExportArgs) -> Result<ExportResult> {
    // Build the API client (or use the injected test double)
    #[cfg(test)]
    let api: Box<dyn Api> = if let Some(test_api) = args.test_api {
        test_api
    } else {
        Box::new(ApiClient::new(ClientConfig::new(args.base_url, args.token))?)
    };

    #[cfg(not(test))]
    let api: Box<dyn Api> =
        Box::new(ApiClient::new(ClientConfig::new(args.base_url, args.token))?);

    let outcome = search::search_stories(api.as_ref(), &args.query, args.page_size)
        .context("story search failed")?;

    match report::write_report(api.as_ref(), &outcome.stories, &args.output) {
        Ok(summary) => Ok(ExportResult {
            total: outcome.total,
            matched: outcome.stories.len(),
            sheets_written: summary.sheets,
            rows_written: summary.rows,
            truncation_warning: outcome.warning,
            locked_path: None,
        }),
        Err(ReportError::Locked { path }) => Ok(ExportResult {
            total: outcome.total,
            matched: outcome.stories.len(),
            sheets_written: 0,
            rows_written: 0,
            truncation_warning: outcome.warning,
            locked_path: Some(path),
        }),
        Err(e) => Err(e).context("report writing failed"),
    }
}
