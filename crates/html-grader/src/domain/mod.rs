//! Domain types shared by the grading pipeline.

pub mod errors;
pub mod model;
