//! Data models for the planner tree (years, sessions, courses and cached plans)

pub mod course;
pub mod document;
pub mod plan;
pub mod session;
pub mod year;

pub use course::Course;
pub use document::PlanDocument;
pub use plan::{Plan, PlanKind};
pub use session::Session;
pub use year::Year;
