//! Command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::app::pipeline::{self, RunConfig, RunOverrides};
use crate::app::report::{ReportFormat, render_report, write_report};
use crate::domain::errors::{EXIT_MISSING_INPUT, GradeError};
use crate::infra::config::Config;
use crate::infra::http::ReqwestFetcher;

/// Exit status for malformed command lines.
pub const EXIT_USAGE: u8 = 64;

const EXIT_STATUS_HELP: &str = "\
Exit status:
  0   report printed
  1   checks file or document missing or unreadable, invalid configuration,
      or HTTP client setup failure
  2   invalid URL (nothing fetched)
  3   fetch failed: HTTP error response, connection failure, or timeout
  4   invalid selector
  5   report could not be written to --output
  64  invalid command line";

/// Check an HTML document for the presence of CSS selectors.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, after_help = EXIT_STATUS_HELP)]
pub struct Cli {
    /// JSON file listing the selectors to check
    #[arg(short, long, value_name = "CHECK_FILE")]
    pub checks: Option<PathBuf>,

    /// Local HTML file to grade
    #[arg(short, long, value_name = "HTML_FILE", conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Remote HTML document to fetch and grade
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Seconds to wait for a remote document
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Also write the report to this file (exit status 5 if it cannot be written)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            checks: self.checks.clone(),
            file: self.file.clone(),
            url: self.url.clone(),
            timeout_secs: self.timeout,
            format: self.format,
        }
    }
}

/// Resolve configuration, grade the document, and return the rendered report.
pub async fn run(cli: &Cli) -> Result<String> {
    let config = Config::load()?;
    let run = RunConfig::resolve(&config, cli.overrides())?;
    let fetcher = ReqwestFetcher::new(&run.fetch)?;

    let result = pipeline::run(&run, &fetcher).await?;
    let rendered = render_report(&result, run.format)?;

    if let Some(path) = &cli.output {
        write_report(path, &rendered)?;
    }
    Ok(rendered)
}

/// Print a clap error and pick its exit status; help and version output exit cleanly.
pub fn usage_exit(err: clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::from(EXIT_USAGE)
    } else {
        ExitCode::SUCCESS
    }
}

/// Exit status for a failed run. Errors outside the grading taxonomy count as missing input.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<GradeError>())
        .map(GradeError::exit_code)
        .unwrap_or(EXIT_MISSING_INPUT)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn file_and_url_conflict() {
        let err = Cli::try_parse_from(["html-grader", "-f", "a.html", "-u", "example.com"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn format_accepts_plain_aliases() {
        let cli = Cli::try_parse_from(["html-grader", "--format", "text"]).unwrap();
        assert_eq!(cli.format, Some(ReportFormat::Plain));
        assert!(Cli::try_parse_from(["html-grader", "--format", "yaml"]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["html-grader", "--timeout", "0"]).is_err());
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["html-grader", "-c", "c.json", "-u", "example.com", "-v"])
            .unwrap();
        assert_eq!(cli.checks, Some(PathBuf::from("c.json")));
        assert_eq!(cli.url.as_deref(), Some("example.com"));
        assert!(cli.verbose);
    }

    #[test]
    fn grade_errors_keep_their_exit_code_through_context() {
        let err = anyhow::Error::new(GradeError::Validation {
            url: "ht!tp://bad".into(),
        })
        .context("resolving run");
        assert_eq!(exit_code_for(&err), 2);
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }
}
