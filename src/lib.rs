pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod inspector;
pub mod scanner;
pub mod ui;
pub mod warning;
pub mod workflow;

pub use error::{ReleaseError, Result};
