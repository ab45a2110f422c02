//! Core planner functionality shared by the library and the CLI

pub mod catalog;
pub mod config;
pub mod grades;
pub mod models;
pub mod planner;
pub mod report;

/// Returns the current version of the `degree-planner` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
