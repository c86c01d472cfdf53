//! End-to-end tests for configuration resolution through the public API.
//!
//! These exercise the full pipeline: real environment variables captured via
//! `EnvSnapshot::capture`, candidate resolution, file merging, redaction,
//! and persistence.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use boto_config::{ConfigLocations, ConfigStore, EnvSnapshot, MemoryKeyValueStore};

/// BOTO_CONFIG beats BOTO_PATH even when both are set.
#[test]
#[serial]
fn test_env_precedence_boto_config_wins() {
    temp_env::with_vars(
        [
            ("BOTO_CONFIG", Some("/tmp/a.cfg")),
            ("BOTO_PATH", Some("/tmp/b.cfg:/tmp/c.cfg")),
        ],
        || {
            let locations = ConfigLocations::from_env();
            assert_eq!(locations.paths(), [PathBuf::from("/tmp/a.cfg")]);
        },
    );
}

/// BOTO_PATH beats the default pair when BOTO_CONFIG is unset.
#[test]
#[serial]
fn test_env_precedence_boto_path_wins_over_defaults() {
    temp_env::with_vars(
        [
            ("BOTO_CONFIG", None),
            ("BOTO_PATH", Some("/tmp/b.cfg:/tmp/c.cfg")),
        ],
        || {
            let locations = ConfigLocations::from_env();
            assert_eq!(
                locations.paths(),
                [PathBuf::from("/tmp/b.cfg"), PathBuf::from("/tmp/c.cfg")]
            );
        },
    );
}

/// With neither variable set, the default list is system then user.
#[test]
#[serial]
fn test_env_precedence_defaults() {
    temp_env::with_vars([("BOTO_CONFIG", None::<&str>), ("BOTO_PATH", None)], || {
        let locations = ConfigLocations::from_env();
        assert_eq!(locations.paths().len(), 2);
        assert_eq!(locations.paths()[0], PathBuf::from("/etc/boto.cfg"));
        assert!(locations.paths()[1].ends_with(".boto"));
    });
}

/// Full pipeline: from_env reads the file named by BOTO_CONFIG.
#[test]
#[serial]
fn test_from_env_loads_boto_config_file() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("boto.cfg");
    fs::write(&cfg, "[Boto]\nnum_retries = 3\n").unwrap();

    temp_env::with_vars(
        [
            ("BOTO_CONFIG", Some(cfg.to_str().unwrap())),
            ("BOTO_PATH", None),
            ("AWS_CREDENTIAL_FILE", None),
        ],
        || {
            let store = ConfigStore::from_env().unwrap();
            assert_eq!(store.getint("Boto", "num_retries", 0), 3);
            // Seeded defaults still apply everywhere.
            assert_eq!(store.get("Boto", "working_dir").as_deref(), Some("/mnt/pyami"));
        },
    );
}

/// Later candidates override earlier ones for the same section/option,
/// while unrelated options survive the merge.
#[test]
fn test_candidate_override_order() {
    let dir = TempDir::new().unwrap();
    let system = dir.path().join("system.cfg");
    let user = dir.path().join("user.cfg");
    fs::write(&system, "[Boto]\ndebug = 1\nproxy = proxy.example.com\n").unwrap();
    fs::write(&user, "[Boto]\ndebug = 2\n").unwrap();

    let env = EnvSnapshot {
        boto_path: Some(format!("{}:{}", system.display(), user.display())),
        ..Default::default()
    };
    let store = ConfigStore::load(&env).unwrap();
    assert_eq!(store.get("Boto", "debug").as_deref(), Some("2"));
    assert_eq!(
        store.get("Boto", "proxy").as_deref(),
        Some("proxy.example.com")
    );
}

/// The documented redaction round-trip, end to end: get() re-reads from
/// disk while every dump of the raw store shows only the sentinel.
#[test]
fn test_redaction_round_trip_end_to_end() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("boto.cfg");
    fs::write(
        &cfg,
        "[Credentials]\ndo_not_store_credentials = True\naws_access_key_id = REAL\naws_secret_access_key = REALSECRET\n",
    )
    .unwrap();

    let env = EnvSnapshot {
        boto_config: Some(cfg.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let store = ConfigStore::load(&env).unwrap();

    assert_eq!(
        store.get("Credentials", "aws_access_key_id").as_deref(),
        Some("REAL")
    );

    let mut raw = Vec::new();
    store.dump(&mut raw).unwrap();
    let raw = String::from_utf8(raw).unwrap();
    assert!(raw.contains("hidden_per_the_setting_do_not_store_credentials"));
    assert!(!raw.contains("REALSECRET"));

    // dump_safe additionally masks the secret key option itself.
    let safe = store.dump_safe();
    assert!(safe.contains("aws_secret_access_key = xxxxxxxxxxxxxxxxxx"));
    assert!(!safe.contains("REALSECRET"));
}

/// save_option output is itself a valid candidate file.
#[test]
fn test_save_then_reload() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("saved.cfg");

    let env = EnvSnapshot {
        boto_config: Some(cfg.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let mut store = ConfigStore::load(&env).unwrap();
    store.save_option(&cfg, "Boto", "num_retries", "9").unwrap();
    store.save_option(&cfg, "Credentials", "aws_access_key_id", "AKID").unwrap();

    let reloaded = ConfigStore::load(&env).unwrap();
    assert_eq!(reloaded.getint("Boto", "num_retries", 0), 9);
    assert_eq!(
        reloaded.get("Credentials", "aws_access_key_id").as_deref(),
        Some("AKID")
    );
}

/// File config plus remote round-trip through the collaborator contract.
#[test]
fn test_file_to_remote_to_store() {
    let dir = TempDir::new().unwrap();
    let cfg = dir.path().join("boto.cfg");
    fs::write(&cfg, "[Boto]\nis_secure = true\nproxy_port = 8080\n").unwrap();

    let env = EnvSnapshot {
        boto_config: Some(cfg.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let source = ConfigStore::load(&env).unwrap();

    let mut backend = MemoryKeyValueStore::default();
    source.dump_to_sdb(&mut backend, "config", "host").unwrap();

    let mut target = ConfigStore::new(ConfigLocations::resolve(&EnvSnapshot::default()));
    target.load_from_sdb(&backend, "config", "host").unwrap();
    assert!(target.getbool("Boto", "is_secure", false));
    assert_eq!(target.getint("Boto", "proxy_port", 0), 8080);
}

/// Recursive include via the explicit-path constructor, with the outer file
/// winning over the include.
#[test]
fn test_explicit_path_with_include() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("inner.cfg"),
        "[S]\nk = inner_val\nextra = from_inner\n",
    )
    .unwrap();
    let outer = dir.path().join("outer.cfg");
    fs::write(&outer, "#import inner.cfg\n[S]\nk = outer_val\n").unwrap();

    let store = ConfigStore::from_path(&outer, &EnvSnapshot::default()).unwrap();
    assert_eq!(store.get("S", "k").as_deref(), Some("outer_val"));
    assert_eq!(store.get("S", "extra").as_deref(), Some("from_inner"));
}
