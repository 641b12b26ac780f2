//! Test helpers shared across nowyouseeme crates.

pub mod api;
pub mod fixtures;

pub use api::{ApiCall, FailingApi, RecordingApi, StubApi};
pub use fixtures::{PNG_1X1, visualization, write_png};
