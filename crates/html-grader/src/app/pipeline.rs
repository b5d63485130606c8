//! End-to-end grading: load selectors, acquire and parse the document, evaluate.

use std::path::PathBuf;

use tracing::debug;

use crate::app::checks::load_selectors;
use crate::app::document::ParsedDocument;
use crate::app::evaluate::evaluate;
use crate::app::report::ReportFormat;
use crate::app::source::{acquire_document, validate_url};
use crate::domain::errors::GradeError;
use crate::domain::model::{CheckResult, DocumentOrigin, DocumentPayload, SelectorSpec};
use crate::infra::config::Config;
use crate::infra::http::{FetchSettings, HttpFetcher};

/// Values supplied on the command line; each one wins over configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub checks: Option<PathBuf>,
    pub file: Option<PathBuf>,
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub format: Option<ReportFormat>,
}

/// Fully resolved inputs for one grading run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub selector_source: PathBuf,
    pub document_origin: DocumentOrigin,
    pub fetch: FetchSettings,
    pub format: ReportFormat,
}

impl RunConfig {
    /// Merge overrides onto `config` and validate the document origin.
    ///
    /// A URL wins over a file path; with neither, the configured default file is used.
    /// URL syntax is checked here so a bad URL never reaches the network.
    pub fn resolve(config: &Config, overrides: RunOverrides) -> Result<Self, GradeError> {
        let document_origin = match (overrides.url, overrides.file) {
            (Some(url), _) => DocumentOrigin::Remote(validate_url(&url)?),
            (None, Some(file)) => DocumentOrigin::Local(file),
            (None, None) => DocumentOrigin::Local(config.defaults.file()),
        };

        let mut fetch = config.fetch.settings();
        if let Some(secs) = overrides.timeout_secs {
            fetch.timeout = std::time::Duration::from_secs(secs);
        }

        Ok(Self {
            selector_source: overrides.checks.unwrap_or_else(|| config.defaults.checks()),
            document_origin,
            fetch,
            format: overrides.format.unwrap_or_else(|| config.report.format()),
        })
    }
}

/// Run the pipeline. Selectors are loaded first, then the document is acquired,
/// then parsed and evaluated; any failure stops the run with no partial result.
pub async fn run(
    config: &RunConfig,
    fetcher: &dyn HttpFetcher,
) -> Result<CheckResult, GradeError> {
    let spec = load_selectors(&config.selector_source)?;
    let payload = acquire_document(&config.document_origin, fetcher).await?;
    grade_payload(&spec, &payload)
}

/// Parse `payload` and evaluate `spec` against it.
pub fn grade_payload(
    spec: &SelectorSpec,
    payload: &DocumentPayload,
) -> Result<CheckResult, GradeError> {
    let doc = ParsedDocument::parse(payload);
    debug!(origin = %payload.origin, selectors = spec.len(), "evaluating document");
    evaluate(spec, &doc)
}

/// Grade in-memory HTML text.
pub fn grade_html(html: &str, spec: &SelectorSpec) -> Result<CheckResult, GradeError> {
    let payload = DocumentPayload {
        origin: DocumentOrigin::Local(PathBuf::from("<memory>")),
        text: html.to_owned(),
    };
    grade_payload(spec, &payload)
}
