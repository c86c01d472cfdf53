//! Candidate-file resolution for configuration loading.
//!
//! Responsibilities:
//! - Derive the ordered candidate path list from an environment snapshot.
//! - Expose the fixed system and user paths for the save wrappers.
//!
//! Does NOT handle:
//! - Reading or merging the candidate files (see `store.rs`).
//! - Environment capture (see `env.rs`).
//!
//! Invariants:
//! - Precedence is strict: `BOTO_CONFIG` > `BOTO_PATH` > the default
//!   system-then-user pair.
//! - `BOTO_CONFIG` yields exactly one candidate and short-circuits the rest.
//! - Resolution is a pure function of the snapshot; it performs no I/O.

use std::path::{Path, PathBuf};

use crate::constants::{SYSTEM_CONFIG_PATH, USER_CONFIG_FILE};
use crate::env::EnvSnapshot;

/// The ordered list of candidate configuration files for one process,
/// plus the fixed system and user locations.
#[derive(Debug, Clone)]
pub struct ConfigLocations {
    paths: Vec<PathBuf>,
    system_path: PathBuf,
    user_path: PathBuf,
}

impl ConfigLocations {
    /// Resolve candidate paths from the current process environment.
    pub fn from_env() -> Self {
        Self::resolve(&EnvSnapshot::capture())
    }

    /// Resolve candidate paths from an explicit environment snapshot.
    pub fn resolve(env: &EnvSnapshot) -> Self {
        let system_path = PathBuf::from(SYSTEM_CONFIG_PATH);
        let user_path = env.expand_user("~").join(USER_CONFIG_FILE);

        let paths = if let Some(single) = &env.boto_config {
            vec![env.expand_user(single)]
        } else if let Some(joined) = &env.boto_path {
            joined
                .split(':')
                .filter(|segment| !segment.is_empty())
                .map(|segment| env.expand_user(segment))
                .collect()
        } else {
            vec![system_path.clone(), user_path.clone()]
        };

        Self {
            paths,
            system_path,
            user_path,
        }
    }

    /// The ordered candidate files. Later files override earlier ones.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The fixed system-wide config path, target of `save_system_option`.
    pub fn system_path(&self) -> &Path {
        &self.system_path
    }

    /// The per-user config path, target of `save_user_option`.
    pub fn user_path(&self) -> &Path {
        &self.user_path
    }
}
