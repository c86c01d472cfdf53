//! Property-based tests for the configuration store.
//!
//! These use randomly generated section names, option names, and values to
//! catch edge cases the unit tests miss.
//!
//! Test coverage:
//! - set/get round trip through INI serialization and save_option
//! - getbool truth for every casing of "true" and falsity for other strings
//! - save_option idempotence on arbitrary inputs
//! - candidate-list precedence for arbitrary paths

use proptest::prelude::*;
use tempfile::TempDir;

use boto_config::{ConfigLocations, ConfigStore, EnvSnapshot};

/// Strategy for section and option names: identifier-shaped, so they survive
/// the INI text format unchanged.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}".prop_map(String::from)
}

/// Strategy for values: printable, no whitespace at the edges, no newlines,
/// so parsing trims nothing away.
fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/:-]{1,30}".prop_map(String::from)
}

/// Strategy for absolute candidate paths.
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_map(|name| format!("/tmp/{name}.cfg"))
}

fn empty_store() -> ConfigStore {
    ConfigStore::new(ConfigLocations::resolve(&EnvSnapshot::default()))
}

proptest! {
    /// Whatever is set in memory comes back verbatim from get.
    #[test]
    fn prop_set_get_round_trip(
        section in name_strategy(),
        option in name_strategy(),
        value in value_strategy(),
    ) {
        let mut store = empty_store();
        store.set(&section, &option, &value);
        prop_assert_eq!(store.get(&section, &option), Some(value));
    }

    /// A value saved to disk comes back verbatim after a fresh load.
    #[test]
    fn prop_save_option_round_trips_through_disk(
        section in name_strategy(),
        option in name_strategy(),
        value in value_strategy(),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roundtrip.cfg");

        let mut store = empty_store();
        store.save_option(&path, &section, &option, &value).unwrap();

        let env = EnvSnapshot {
            boto_config: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let reloaded = ConfigStore::load(&env).unwrap();
        prop_assert_eq!(reloaded.get(&section, &option), Some(value));
    }

    /// Saving the same triple twice leaves file and store identical to
    /// saving it once.
    #[test]
    fn prop_save_option_is_idempotent(
        section in name_strategy(),
        option in name_strategy(),
        value in value_strategy(),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("idem.cfg");

        let mut store = empty_store();
        store.save_option(&path, &section, &option, &value).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        store.save_option(&path, &section, &option, &value).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(store.get(&section, &option), Some(value));
    }

    /// Every casing of "true" parses as true.
    #[test]
    fn prop_getbool_accepts_any_casing_of_true(casing in proptest::array::uniform4(any::<bool>())) {
        let stored: String = "true"
            .chars()
            .zip(casing)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();

        let mut store = empty_store();
        store.set("S", "flag", &stored);
        prop_assert!(store.getbool("S", "flag", false));
    }

    /// Any present value other than "true" (in some casing) is false, even
    /// with default=true.
    #[test]
    fn prop_getbool_rejects_non_true_values(value in value_strategy()) {
        prop_assume!(!value.eq_ignore_ascii_case("true"));
        let mut store = empty_store();
        store.set("S", "flag", &value);
        prop_assert!(!store.getbool("S", "flag", true));
    }

    /// BOTO_CONFIG always produces a single-entry list, whatever BOTO_PATH
    /// holds.
    #[test]
    fn prop_boto_config_always_wins(
        single in path_strategy(),
        others in proptest::collection::vec(path_strategy(), 0..4),
    ) {
        let env = EnvSnapshot {
            boto_config: Some(single.clone()),
            boto_path: Some(others.join(":")),
            ..Default::default()
        };
        let locations = ConfigLocations::resolve(&env);
        prop_assert_eq!(locations.paths(), [std::path::PathBuf::from(single)]);
    }

    /// BOTO_PATH preserves segment order.
    #[test]
    fn prop_boto_path_preserves_order(paths in proptest::collection::vec(path_strategy(), 1..5)) {
        let env = EnvSnapshot {
            boto_path: Some(paths.join(":")),
            ..Default::default()
        };
        let locations = ConfigLocations::resolve(&env);
        let expected: Vec<std::path::PathBuf> =
            paths.iter().map(std::path::PathBuf::from).collect();
        prop_assert_eq!(locations.paths(), expected.as_slice());
    }
}
