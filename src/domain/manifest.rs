//! Targeted field access for package manifests.
//!
//! Manifests are small JSON objects, but only one scalar (the version) is ever
//! rewritten, so fields are located by a literal scan instead of a full
//! parse/serialize cycle. Everything outside the rewritten value is left
//! byte-for-byte intact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::version::VersionNumber;
use crate::error::{ReleaseError, Result};

/// Read the value of `"<key>":` from `text`.
///
/// Quoted values are returned without their quotes. Unquoted values
/// (numbers, booleans) run up to the next comma, newline or closing brace
/// and are trimmed. Returns `None` when the key is absent or the value is
/// an unterminated string.
pub fn read_field(text: &str, key: &str) -> Option<String> {
    let needle = format!("\"{}\":", key);
    let start = text.find(&needle)? + needle.len();
    let rest = text[start..].trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(quoted[..end].to_string());
    }

    let end = rest.find([',', '\n', '}']).unwrap_or(rest.len());
    Some(rest[..end].trim().to_string())
}

/// Replace the first literal `"<key>": "<old>"` with `"<key>": "<new>"`.
///
/// Only the first occurrence is rewritten. When the literal pattern is not
/// present the text is returned unchanged.
pub fn write_field(text: &str, key: &str, old_value: &str, new_value: &str) -> String {
    let from = format!("\"{}\": \"{}\"", key, old_value);
    let to = format!("\"{}\": \"{}\"", key, new_value);
    text.replacen(&from, &to, 1)
}

/// Keys used to pull the display name and version out of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestKeys {
    pub version: String,
    pub display_name: String,
}

impl Default for ManifestKeys {
    fn default() -> Self {
        ManifestKeys {
            version: "version".to_string(),
            display_name: "displayName".to_string(),
        }
    }
}

/// The parts of a repository manifest the release workflow cares about
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub path: PathBuf,
    pub display_name: Option<String>,
    pub version: Option<VersionNumber>,
    /// Set when a version field exists but could not be used
    pub version_error: Option<String>,
}

impl Manifest {
    /// Load `file_name` from `repo_path`.
    ///
    /// Returns `Ok(None)` when the repository has no manifest. A missing or
    /// malformed version field is not an error here: it is reported through
    /// `version_error` so the repository can still be committed without a bump.
    pub fn load(repo_path: &Path, file_name: &str, keys: &ManifestKeys) -> Result<Option<Self>> {
        let path = repo_path.join(file_name);
        if !path.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        let display_name =
            read_field(&text, &keys.display_name).filter(|name| !name.is_empty());

        let (version, version_error) = match read_field(&text, &keys.version) {
            Some(raw) => match VersionNumber::parse(&raw) {
                Ok(v) => (Some(v), None),
                Err(e) => (None, Some(e.to_string())),
            },
            None => (None, Some(format!("no \"{}\" field", keys.version))),
        };

        Ok(Some(Manifest {
            path,
            display_name,
            version,
            version_error,
        }))
    }

    /// Rewrite the version field on disk from `from` to `to`.
    ///
    /// Fails with a manifest error when the literal `"<key>": "<from>"` is not
    /// found, so the caller can tell an untouched file from a bumped one.
    pub fn bump_version(&self, key: &str, from: &VersionNumber, to: &VersionNumber) -> Result<()> {
        let text = fs::read_to_string(&self.path)?;
        let updated = write_field(&text, key, &from.to_string(), &to.to_string());

        if updated == text {
            return Err(ReleaseError::manifest(format!(
                "\"{}\": \"{}\" not found in {}",
                key,
                from,
                self.path.display()
            )));
        }

        fs::write(&self.path, updated)?;
        Ok(())
    }
}
