//! Infrastructure adapters for configuration, logging, and HTTP.

pub mod config;
pub mod http;
pub mod logging;
