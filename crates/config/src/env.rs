//! Environment snapshot for configuration resolution.
//!
//! Responsibilities:
//! - Capture the environment variables that drive candidate-file resolution.
//! - Provide home-directory expansion for `~`-prefixed paths.
//!
//! Does NOT handle:
//! - Deriving the candidate path list (see `locations.rs`).
//! - Reading or parsing config files (see `store.rs`).
//!
//! Invariants:
//! - `EnvSnapshot` is an explicit value; nothing in this crate reads process
//!   environment state outside of `capture()`, so tests can inject arbitrary
//!   environments without process-wide mutation.
//! - Home expansion degrades to identity when no home directory is known
//!   (restricted sandboxes have no user concept); it never fails.

use std::path::PathBuf;

use crate::constants::{ENV_AWS_CREDENTIAL_FILE, ENV_BOTO_CONFIG, ENV_BOTO_PATH};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// A point-in-time capture of the environment state that configuration
/// resolution depends on.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    /// `BOTO_CONFIG`: single-path override, wins over everything else.
    pub boto_config: Option<String>,
    /// `BOTO_PATH`: colon-separated candidate list. A present-but-empty
    /// value is still "set" and yields an empty candidate list.
    pub boto_path: Option<String>,
    /// `AWS_CREDENTIAL_FILE`: legacy credential file to merge after loading.
    pub aws_credential_file: Option<String>,
    /// Home directory used for `~` expansion, if one exists.
    pub home: Option<PathBuf>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// `BOTO_CONFIG` and `BOTO_PATH` are taken verbatim because presence
    /// alone decides precedence; `AWS_CREDENTIAL_FILE` is filtered through
    /// [`env_var_or_none`] since an empty path is meaningless.
    pub fn capture() -> Self {
        Self {
            boto_config: std::env::var(ENV_BOTO_CONFIG).ok(),
            boto_path: std::env::var(ENV_BOTO_PATH).ok(),
            aws_credential_file: env_var_or_none(ENV_AWS_CREDENTIAL_FILE),
            home: directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        }
    }

    /// Expand a leading `~` against the captured home directory.
    ///
    /// Without a home directory this is the identity function, so resolution
    /// still works in environments with no user concept.
    pub fn expand_user(&self, path: &str) -> PathBuf {
        match &self.home {
            Some(home) => {
                if path == "~" {
                    home.clone()
                } else if let Some(rest) = path.strip_prefix("~/") {
                    home.join(rest)
                } else {
                    PathBuf::from(path)
                }
            }
            None => PathBuf::from(path),
        }
    }
}
