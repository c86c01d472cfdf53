//! Centralized constants for boto configuration handling.
//!
//! This module contains the well-known file locations, environment variable
//! names, and option names used across the crate to avoid magic string
//! duplication.

// =============================================================================
// File Locations
// =============================================================================

/// System-wide configuration file path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/boto.cfg";

/// Per-user configuration file name, resolved under the home directory.
pub const USER_CONFIG_FILE: &str = ".boto";

// =============================================================================
// Environment Variables
// =============================================================================

/// Single-path override. When set, it becomes the sole candidate file.
pub const ENV_BOTO_CONFIG: &str = "BOTO_CONFIG";

/// Colon-separated candidate list. Loses to `BOTO_CONFIG`, wins over defaults.
pub const ENV_BOTO_PATH: &str = "BOTO_PATH";

/// Path to a legacy two-key credential file merged in after the main load.
pub const ENV_AWS_CREDENTIAL_FILE: &str = "AWS_CREDENTIAL_FILE";

// =============================================================================
// Credential Options
// =============================================================================

/// Section holding AWS credentials.
pub const CREDENTIALS_SECTION: &str = "Credentials";

/// Access key option name.
pub const ACCESS_KEY_OPTION: &str = "aws_access_key_id";

/// Secret key option name.
pub const SECRET_KEY_OPTION: &str = "aws_secret_access_key";

/// Boolean-as-string flag requesting credential redaction in memory.
pub const DO_NOT_STORE_CREDENTIALS_OPTION: &str = "do_not_store_credentials";

/// Sentinel stored in place of real credentials when redaction is active.
pub const HIDDEN_CREDENTIAL_SENTINEL: &str = "hidden_per_the_setting_do_not_store_credentials";

/// Mask written by `dump_safe` for any `aws_secret_access_key` option.
pub const SECRET_KEY_MASK: &str = "xxxxxxxxxxxxxxxxxx";

// =============================================================================
// Seeded Defaults
// =============================================================================

/// Default `working_dir` value, applied across all sections unless shadowed.
pub const DEFAULT_WORKING_DIR: &str = "/mnt/pyami";

/// Default `debug` value, applied across all sections unless shadowed.
pub const DEFAULT_DEBUG: &str = "0";
