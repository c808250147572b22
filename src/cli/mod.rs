//! Command-line session plumbing

pub mod orchestration;

pub use orchestration::{run_session, SessionArgs, SessionSummary};
