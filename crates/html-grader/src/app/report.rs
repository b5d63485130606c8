//! Report rendering.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::domain::errors::GradeError;
use crate::domain::model::CheckResult;

const JSON_INDENT: &[u8] = b"    ";

/// Supported report formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// JSON object mapping each selector to `true` or `false`.
    #[default]
    Json,
    /// One `selector: true|false` line per selector.
    #[serde(alias = "text", alias = "txt")]
    #[value(alias = "text", alias = "txt")]
    Plain,
}

/// Render `result` in its own key order. Output is byte-identical for equal results.
pub fn render_report(result: &CheckResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => render_json(result),
        ReportFormat::Plain => Ok(render_plain(result)),
    }
}

/// Write a rendered report to `path`, creating parent directories as needed.
pub fn write_report(path: &Path, rendered: &str) -> Result<(), GradeError> {
    let write_error = |source| GradeError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, rendered).map_err(write_error)
}

fn render_json(result: &CheckResult) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    result
        .serialize(&mut serializer)
        .context("failed to serialize check result")?;
    String::from_utf8(buffer).context("report is not valid UTF-8")
}

fn render_plain(result: &CheckResult) -> String {
    result
        .iter()
        .map(|(selector, present)| format!("{selector}: {present}"))
        .collect::<Vec<_>>()
        .join("\n")
}
