//! Loading selector lists from checks files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::domain::errors::GradeError;
use crate::domain::model::SelectorSpec;

/// Read a checks file whose top-level value is a JSON array of selector strings.
pub fn load_selectors(path: &Path) -> Result<SelectorSpec, GradeError> {
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => GradeError::load(path, "file does not exist"),
        _ => GradeError::load(path, err),
    })?;
    let spec = parse_selectors(&contents, path)?;
    debug!(count = spec.len(), path = %path.display(), "loaded selectors");
    Ok(spec)
}

/// Decode checks file contents. `path` is only used for error messages.
pub fn parse_selectors(contents: &str, path: &Path) -> Result<SelectorSpec, GradeError> {
    let selectors: Vec<String> =
        serde_json::from_str(contents).map_err(|err| GradeError::load(path, err))?;

    if let Some(index) = selectors.iter().position(|s| s.trim().is_empty()) {
        return Err(GradeError::load(
            path,
            format!("selector at index {index} is empty"),
        ));
    }

    Ok(SelectorSpec::new(selectors))
}
