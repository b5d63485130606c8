//! Application layer orchestrating the grading pipeline.

pub mod checks;
pub mod document;
pub mod evaluate;
pub mod pipeline;
pub mod report;
pub mod source;
