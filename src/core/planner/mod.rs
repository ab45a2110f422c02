//! Planner state: the plan store and the pieces it is built from

pub mod fetch;
pub mod ordering;
pub mod outcome;
pub mod persistence;
pub mod store;
pub mod summary;
pub mod transcript;

pub use fetch::{CacheError, DirectorySource, FetchError, PlanSource};
pub use ordering::{CHRONOLOGICAL_SESSIONS, DEFAULT_SESSIONS};
pub use outcome::{Level, Removed, StoreError, StoreResult};
pub use persistence::{JsonFileGateway, MemoryGateway, PersistError, PersistenceGateway};
pub use store::{ImportReport, MissingEntry, PlanStore, TimelineEntry};
pub use summary::{DataSummary, Tally};
pub use transcript::{parse_transcript, TranscriptEntry};
