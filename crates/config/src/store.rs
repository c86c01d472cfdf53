//! The in-memory configuration store and its typed accessors.
//!
//! Responsibilities:
//! - Construct a store from the resolved candidate list, an explicit path
//!   (with recursive `#import` handling), or an arbitrary reader.
//! - Seed and apply INI-style defaults across all sections.
//! - Provide typed accessors that collapse lookup failures to caller defaults.
//! - Redact credentials in memory and re-read them from disk on access when
//!   `Credentials.do_not_store_credentials` is `"True"`.
//!
//! Does NOT handle:
//! - Writing options back to disk (see `persistence.rs`).
//! - Remote key-value persistence (see `remote.rs`).
//!
//! Invariants:
//! - `raw_lookup` is the single lookup algorithm; the public `get` layers the
//!   credential re-read on top of it and nothing bypasses it internally.
//! - When redaction is active, in-memory credential values are always the
//!   sentinel; `get` is the only path that returns real values.
//! - No internal synchronization; concurrent mutation must be serialized by
//!   the caller.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::constants::{
    ACCESS_KEY_OPTION, CREDENTIALS_SECTION, DEFAULT_DEBUG, DEFAULT_WORKING_DIR,
    DO_NOT_STORE_CREDENTIALS_OPTION, HIDDEN_CREDENTIAL_SENTINEL, SECRET_KEY_MASK,
    SECRET_KEY_OPTION,
};
use crate::env::EnvSnapshot;
use crate::error::{ConfigError, LookupError};
use crate::ini::{self, Sections};
use crate::locations::ConfigLocations;

/// Matches an include directive: `#import <relative-filename>`.
/// The filename is whitespace-delimited and may contain no internal whitespace.
static IMPORT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#import[ \t]+([^ \t]+)[ \t]*$").expect("import directive pattern is valid")
});

/// Hierarchical key-value configuration with INI-style defaulting.
pub struct ConfigStore {
    /// Fallback values applying across all sections unless shadowed.
    defaults: BTreeMap<String, String>,
    /// Section name -> option name -> value. Case-sensitive.
    pub(crate) sections: Sections,
    /// Candidate list retained for credential re-reads and save wrappers.
    pub(crate) locations: ConfigLocations,
}

impl ConfigStore {
    /// Create an empty store with the standard defaults seeded.
    pub fn new(locations: ConfigLocations) -> Self {
        let defaults = BTreeMap::from([
            ("working_dir".to_string(), DEFAULT_WORKING_DIR.to_string()),
            ("debug".to_string(), DEFAULT_DEBUG.to_string()),
        ]);
        Self {
            defaults,
            sections: Sections::new(),
            locations,
        }
    }

    /// Load configuration the default way: resolve the candidate list from
    /// the snapshot, merge every readable candidate in order, redact
    /// credentials if requested, then merge the legacy credential file named
    /// by `AWS_CREDENTIAL_FILE` (non-fatal if unreadable).
    pub fn load(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let mut store = Self::new(ConfigLocations::resolve(env));
        store.read_locations()?;
        store.possibly_hide_credentials();

        if let Some(raw_path) = &env.aws_credential_file {
            let full_path = env.expand_user(raw_path);
            if let Err(e) = store.load_credential_file(&full_path) {
                warn!(
                    path = %full_path.display(),
                    error = %e,
                    "Unable to load AWS_CREDENTIAL_FILE"
                );
            }
        }

        Ok(store)
    }

    /// Load configuration from the current process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&EnvSnapshot::capture())
    }

    /// Load configuration from one explicit file, following `#import`
    /// directives recursively. The legacy credential file is not consulted
    /// on this branch.
    pub fn from_path(path: &Path, env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let mut store = Self::new(ConfigLocations::resolve(env));
        store.load_from_path(path)?;
        Ok(store)
    }

    /// Load configuration from an arbitrary reader.
    pub fn from_reader(reader: impl Read, env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let mut store = Self::new(ConfigLocations::resolve(env));
        store.merge_reader(reader)?;
        Ok(store)
    }

    /// Merge every readable candidate file, in order. Missing or unreadable
    /// files are skipped; an empty store is a valid outcome. Parse errors in
    /// files that were opened successfully do propagate.
    fn read_locations(&mut self) -> Result<(), ConfigError> {
        for path in self.locations.paths().to_vec() {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    ini::merge_str(&mut self.sections, &text).map_err(|f| ConfigError::Parse {
                        path: path.clone(),
                        line: f.line,
                        message: f.message,
                    })?;
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable config file");
                }
            }
        }
        Ok(())
    }

    /// Merge one file into the store, processing `#import` directives first.
    ///
    /// Includes are loaded depth-first, pre-order, resolved relative to the
    /// including file's directory, so the including file's own keys override
    /// anything an include contributed. A file revisited within one load
    /// call is skipped to break import cycles.
    pub fn load_from_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        let mut visited = HashSet::new();
        self.load_from_path_inner(path, &mut visited)
    }

    fn load_from_path_inner(
        &mut self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<(), ConfigError> {
        let identity = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !visited.insert(identity) {
            warn!(
                path = %path.display(),
                "Skipping already-loaded config file to break an import cycle"
            );
            return Ok(());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        for line in text.lines() {
            if let Some(import) = import_target(line) {
                self.load_from_path_inner(&dir.join(import), visited)?;
            }
        }

        ini::merge_str(&mut self.sections, &text).map_err(|f| ConfigError::Parse {
            path: path.to_path_buf(),
            line: f.line,
            message: f.message,
        })
    }

    /// Merge INI text from a reader into the store.
    pub fn merge_reader(&mut self, mut reader: impl Read) -> Result<(), ConfigError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        ini::merge_str(&mut self.sections, &text).map_err(|f| ConfigError::ParseStream {
            line: f.line,
            message: f.message,
        })
    }

    /// Merge a legacy credential file as produced by the Java-era tooling.
    ///
    /// The file holds `AWSAccessKeyId=...` / `AWSSecretKey=...` lines; the
    /// key names are rewritten and a `[Credentials]` header is synthesized
    /// before parsing as INI.
    pub fn load_credential_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::CredentialFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut text = format!("[{CREDENTIALS_SECTION}]\n");
        for line in raw.lines() {
            let rewritten = line
                .replace("AWSAccessKeyId", ACCESS_KEY_OPTION)
                .replace("AWSSecretKey", SECRET_KEY_OPTION);
            text.push_str(&rewritten);
            text.push('\n');
        }

        ini::merge_str(&mut self.sections, &text).map_err(|f| ConfigError::Parse {
            path: path.to_path_buf(),
            line: f.line,
            message: f.message,
        })
    }

    /// If `Credentials.do_not_store_credentials` is the string `"True"`,
    /// overwrite both credential options with a fixed sentinel so the
    /// in-memory store can be inspected or leaked without exposing real
    /// secrets. `get` re-reads the real values from disk when needed.
    fn possibly_hide_credentials(&mut self) {
        if self.redaction_active() {
            self.set(CREDENTIALS_SECTION, ACCESS_KEY_OPTION, HIDDEN_CREDENTIAL_SENTINEL);
            self.set(CREDENTIALS_SECTION, SECRET_KEY_OPTION, HIDDEN_CREDENTIAL_SENTINEL);
        }
    }

    /// String-equality, case-sensitive check of the redaction flag.
    fn redaction_active(&self) -> bool {
        matches!(
            self.raw_lookup(CREDENTIALS_SECTION, DO_NOT_STORE_CREDENTIALS_OPTION),
            Ok("True")
        )
    }

    /// The one lookup algorithm: explicit section value first, then the
    /// cross-section defaults (which apply even when the section does not
    /// exist at all).
    fn raw_lookup(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        if let Some(options) = self.sections.get(section)
            && let Some(value) = options.get(option)
        {
            return Ok(value);
        }
        if let Some(value) = self.defaults.get(option) {
            return Ok(value);
        }
        if self.sections.contains_key(section) {
            Err(LookupError::OptionAbsent)
        } else {
            Err(LookupError::SectionAbsent)
        }
    }

    /// Get a string value, or `None` if the lookup fails for any reason.
    ///
    /// When redaction is active and the request is for one of the two
    /// credential options under `[Credentials]`, the in-memory value (the
    /// sentinel) is bypassed entirely: the candidate files are re-read into
    /// a throwaway store and the fresh value is returned instead.
    pub fn get(&self, section: &str, option: &str) -> Option<String> {
        match self.raw_lookup(section, option) {
            Ok(value) => {
                if section == CREDENTIALS_SECTION
                    && (option == ACCESS_KEY_OPTION || option == SECRET_KEY_OPTION)
                    && self.redaction_active()
                {
                    return self.reread_credential(option);
                }
                Some(value.to_string())
            }
            Err(e) => {
                trace!(section, option, reason = e.as_str(), "lookup miss, returning default");
                None
            }
        }
    }

    /// Get a string value, falling back to `default` on any lookup failure.
    pub fn get_or(&self, section: &str, option: &str, default: &str) -> String {
        self.get(section, option)
            .unwrap_or_else(|| default.to_string())
    }

    /// Re-read one credential option from the candidate files, ignoring the
    /// redacted in-memory state.
    fn reread_credential(&self, option: &str) -> Option<String> {
        let mut fresh = ConfigStore::new(self.locations.clone());
        if let Err(e) = fresh.read_locations() {
            warn!(error = %e, "Failed to re-read candidate files for redacted credential");
            return None;
        }
        match fresh.raw_lookup(CREDENTIALS_SECTION, option) {
            Ok(value) => Some(value.to_string()),
            Err(e) => {
                trace!(option, reason = e.as_str(), "redacted credential absent on disk");
                None
            }
        }
    }

    /// Get an integer value, falling back to `default` when the lookup fails
    /// or the stored string does not parse.
    pub fn getint(&self, section: &str, option: &str, default: i64) -> i64 {
        match self.lookup_parsed::<i64>(section, option) {
            Ok(value) => value,
            Err(e) => {
                trace!(section, option, reason = e.as_str(), "returning integer default");
                default
            }
        }
    }

    /// Get a float value, falling back to `default` when the lookup fails or
    /// the stored string does not parse.
    pub fn getfloat(&self, section: &str, option: &str, default: f64) -> f64 {
        match self.lookup_parsed::<f64>(section, option) {
            Ok(value) => value,
            Err(e) => {
                trace!(section, option, reason = e.as_str(), "returning float default");
                default
            }
        }
    }

    fn lookup_parsed<T: std::str::FromStr>(
        &self,
        section: &str,
        option: &str,
    ) -> Result<T, LookupError> {
        let value = self.raw_lookup(section, option)?;
        value.trim().parse().map_err(|_| LookupError::ParseError)
    }

    /// Get a boolean value.
    ///
    /// A present value is `true` iff it equals `"true"` ignoring case; any
    /// other stored string is `false`. An absent key returns `default`
    /// unchanged.
    pub fn getbool(&self, section: &str, option: &str, default: bool) -> bool {
        match self.raw_lookup(section, option) {
            Ok(value) => value.eq_ignore_ascii_case("true"),
            Err(_) => default,
        }
    }

    /// Store the literal string `"true"` or `"false"`.
    pub fn setbool(&mut self, section: &str, option: &str, value: bool) {
        self.set(section, option, if value { "true" } else { "false" });
    }

    /// Set an option, creating the section if needed.
    pub fn set(&mut self, section: &str, option: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), value.to_string());
    }

    /// Create a section if it does not already exist.
    pub fn add_section(&mut self, section: &str) {
        self.sections.entry(section.to_string()).or_default();
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Whether a lookup for this section/option would find a value,
    /// including via the cross-section defaults.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.raw_lookup(section, option).is_ok()
    }

    /// Explicitly created section names, in order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Explicitly set option names for a section (defaults excluded), in
    /// order. Empty when the section does not exist.
    pub fn options(&self, section: &str) -> Vec<&str> {
        self.sections
            .get(section)
            .map(|options| options.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Convenience accessor fixed to the `Instance` section.
    pub fn get_instance(&self, name: &str) -> Option<String> {
        self.get("Instance", name)
    }

    /// Convenience accessor fixed to the `User` section.
    pub fn get_user(&self, name: &str) -> Option<String> {
        self.get("User", name)
    }

    /// Convenience integer accessor fixed to the `User` section.
    pub fn getint_user(&self, name: &str, default: i64) -> i64 {
        self.getint("User", name, default)
    }

    /// The candidate list this store was resolved with.
    pub fn locations(&self) -> &ConfigLocations {
        &self.locations
    }

    /// Serialize the raw store (defaults included) to INI text.
    ///
    /// This bypasses the credential re-read in `get`: when redaction is
    /// active the output shows the sentinel, never real secrets.
    pub fn dump(&self, w: &mut dyn Write) -> std::io::Result<()> {
        ini::write_sections(w, &self.defaults, &self.sections)
    }

    /// Like `dump`, but the value of any option literally named
    /// `aws_secret_access_key` is replaced with a fixed mask, in every
    /// section.
    pub fn dump_safe_to(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for (section, options) in &self.sections {
            writeln!(w, "[{section}]")?;
            for (option, value) in options {
                if option == SECRET_KEY_OPTION {
                    writeln!(w, "{option} = {SECRET_KEY_MASK}")?;
                } else {
                    writeln!(w, "{option} = {value}")?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// `dump_safe_to` into an owned string.
    pub fn dump_safe(&self) -> String {
        let mut buf = Vec::new();
        // Writing into an in-memory buffer cannot fail.
        let _ = self.dump_safe_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Extract the filename from an include directive line, if it is one.
fn import_target(line: &str) -> Option<&str> {
    IMPORT_DIRECTIVE
        .captures(line.trim_end())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
