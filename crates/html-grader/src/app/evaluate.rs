//! Selector presence evaluation.

use tracing::debug;

use crate::app::document::SelectorQuery;
use crate::domain::errors::GradeError;
use crate::domain::model::{CheckResult, SelectorSpec};

/// Evaluate every selector in lexicographic order and record whether it matched.
///
/// Duplicated selectors collapse to one entry. The first selector the query
/// engine rejects aborts the evaluation; no partial result is returned.
pub fn evaluate(spec: &SelectorSpec, doc: &impl SelectorQuery) -> Result<CheckResult, GradeError> {
    let mut result = CheckResult::new();
    for selector in spec.sorted() {
        let count = doc.match_count(selector)?;
        debug!(selector, count, "evaluated selector");
        result.insert(selector, count > 0);
    }
    Ok(result)
}
