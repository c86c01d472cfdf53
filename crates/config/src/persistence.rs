//! Writing individual options back to configuration files.
//!
//! Responsibilities:
//! - Read-modify-write a single section/option into one target file.
//! - Provide wrappers targeting the resolved user and system paths.
//!
//! Does NOT handle:
//! - Candidate-list resolution or merging (see `locations.rs` / `store.rs`).
//! - Remote persistence (see `remote.rs`).
//!
//! Invariants:
//! - Only the target file is consulted; the in-memory store's candidate list
//!   plays no part in what gets written.
//! - The seeded defaults are never written to disk; only options explicitly
//!   present in the target file or being saved appear in the output.
//! - No file locking: concurrent writers to the same file may lose updates.
//!   Callers needing coordination must serialize externally.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::ini::{self, Sections};
use crate::store::ConfigStore;

impl ConfigStore {
    /// Write `section.option = value` into the file at `path`, preserving
    /// everything else the file already holds, and mirror the same set into
    /// the in-memory store. The file is created if it does not exist.
    pub fn save_option(
        &mut self,
        path: &Path,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut on_disk = Sections::new();
        match fs::read_to_string(path) {
            Ok(text) => {
                ini::merge_str(&mut on_disk, &text).map_err(|f| ConfigError::Parse {
                    path: path.to_path_buf(),
                    line: f.line,
                    message: f.message,
                })?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        on_disk
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), value.to_string());

        let mut buf = Vec::new();
        // Writing into an in-memory buffer cannot fail.
        let _ = ini::write_sections(&mut buf, &BTreeMap::new(), &on_disk);
        fs::write(path, &buf).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        self.set(section, option, value);
        Ok(())
    }

    /// Save into the per-user config file (`~/.boto` by default).
    pub fn save_user_option(
        &mut self,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let path = self.locations.user_path().to_path_buf();
        self.save_option(&path, section, option, value)
    }

    /// Save into the system-wide config file (`/etc/boto.cfg`).
    pub fn save_system_option(
        &mut self,
        section: &str,
        option: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let path = self.locations.system_path().to_path_buf();
        self.save_option(&path, section, option, value)
    }
}
