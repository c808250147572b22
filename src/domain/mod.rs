//! Domain logic - pure rules independent of the external VCS tool

pub mod change;
pub mod manifest;
pub mod version;

pub use change::{ChangeRecord, ChangeStatus, DiffSummary};
pub use manifest::{read_field, write_field, Manifest, ManifestKeys};
pub use version::{Increment, VersionNumber};
