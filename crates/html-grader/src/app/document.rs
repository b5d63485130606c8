//! Queryable HTML documents.

use scraper::{Html, Selector};
use tracing::debug;

use crate::domain::errors::GradeError;
use crate::domain::model::DocumentPayload;

/// Anything that can count the elements matching a CSS selector.
pub trait SelectorQuery {
    fn match_count(&self, selector: &str) -> Result<usize, GradeError>;
}

/// Parsed DOM tree owned by a single evaluation. Never mutated after parsing.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parse leniently, the way browsers do; malformed markup is repaired rather than rejected.
    pub fn parse(payload: &DocumentPayload) -> Self {
        let html = Html::parse_document(&payload.text);
        if !html.errors.is_empty() {
            debug!(
                origin = %payload.origin,
                recovered = html.errors.len(),
                "document parsed with recoverable errors"
            );
        }
        Self { html }
    }
}

impl SelectorQuery for ParsedDocument {
    fn match_count(&self, selector: &str) -> Result<usize, GradeError> {
        let compiled = Selector::parse(selector).map_err(|err| GradeError::Query {
            selector: selector.to_owned(),
            reason: err.to_string(),
        })?;
        Ok(self.html.select(&compiled).count())
    }
}
