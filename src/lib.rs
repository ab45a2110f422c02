//! Degree planner library
//!
//! Plan store, grade projections, catalog access and report generation used by
//! the `degreeplanner` command-line front end.

pub mod core;
pub mod logger;

pub use crate::core::config;
