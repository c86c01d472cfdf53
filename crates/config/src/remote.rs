//! Remote key-value persistence for configuration sections.
//!
//! Responsibilities:
//! - Define the external-collaborator contract for a domain/item key-value
//!   backend (SimpleDB-shaped, but any implementation works).
//! - Serialize each section to one JSON-object item attribute and back.
//! - Provide an in-memory implementation used as a test double.
//!
//! Does NOT handle:
//! - Any network I/O; implementations of the traits own that entirely.
//!
//! Invariants:
//! - One section == one item attribute; the attribute value is a JSON object
//!   of that section's explicit options (defaults are not exported).
//! - On load, JSON booleans are restored via `setbool`, JSON null becomes
//!   the literal string `"None"`, and everything else is stored as its
//!   string form.
//! - A missing domain or item on load fails loudly with a dedicated error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::store::ConfigStore;

/// A named collection of items in a remote key-value backend.
pub trait KeyValueDomain {
    /// Fetch an item's string attributes, or `None` if the item is absent.
    fn get_item(&self, name: &str) -> anyhow::Result<Option<BTreeMap<String, String>>>;

    /// Create or replace an item with the given attributes.
    fn put_item(&mut self, name: &str, attributes: BTreeMap<String, String>) -> anyhow::Result<()>;
}

/// A remote key-value backend holding named domains.
pub trait KeyValueStore {
    /// Look up a domain by name, creating it if absent.
    fn open_domain(&mut self, name: &str) -> anyhow::Result<&mut dyn KeyValueDomain>;

    /// Look up a domain by name without creating it.
    fn find_domain(&self, name: &str) -> anyhow::Result<Option<&dyn KeyValueDomain>>;
}

/// One section's options as carried in a single item attribute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
struct SectionPayload(BTreeMap<String, Value>);

impl ConfigStore {
    /// Serialize every section into one item of the named domain, creating
    /// the domain if it does not exist.
    pub fn dump_to_sdb(
        &self,
        store: &mut dyn KeyValueStore,
        domain_name: &str,
        item_name: &str,
    ) -> Result<(), ConfigError> {
        let mut attributes = BTreeMap::new();
        for (section, options) in &self.sections {
            let payload = SectionPayload(
                options
                    .iter()
                    .map(|(option, value)| (option.clone(), Value::String(value.clone())))
                    .collect(),
            );
            let encoded =
                serde_json::to_string(&payload).map_err(|source| ConfigError::RemoteEncode {
                    section: section.clone(),
                    source,
                })?;
            attributes.insert(section.clone(), encoded);
        }

        let domain = store.open_domain(domain_name)?;
        domain.put_item(item_name, attributes)?;
        Ok(())
    }

    /// Merge the named item's sections into this store.
    ///
    /// Fails with `RemoteDomainNotFound` / `RemoteItemNotFound` when the
    /// domain or item is absent; an existing store is left partially updated
    /// only if a later section fails to decode.
    pub fn load_from_sdb(
        &mut self,
        store: &dyn KeyValueStore,
        domain_name: &str,
        item_name: &str,
    ) -> Result<(), ConfigError> {
        let domain = store
            .find_domain(domain_name)?
            .ok_or_else(|| ConfigError::RemoteDomainNotFound(domain_name.to_string()))?;
        let item = domain
            .get_item(item_name)?
            .ok_or_else(|| ConfigError::RemoteItemNotFound {
                domain: domain_name.to_string(),
                item: item_name.to_string(),
            })?;

        for (section, encoded) in item {
            let SectionPayload(decoded) =
                serde_json::from_str(&encoded).map_err(|source| ConfigError::RemoteDecode {
                    section: section.clone(),
                    source,
                })?;
            self.add_section(&section);
            for (option, value) in decoded {
                match value {
                    Value::Bool(flag) => self.setbool(&section, &option, flag),
                    Value::Null => self.set(&section, &option, "None"),
                    Value::String(text) => self.set(&section, &option, &text),
                    other => self.set(&section, &option, &other.to_string()),
                }
            }
        }
        Ok(())
    }
}

/// In-memory `KeyValueStore` implementation.
///
/// Serves as the reference implementation of the collaborator contract and
/// as a test double; it never does any I/O.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    domains: BTreeMap<String, MemoryDomain>,
}

#[derive(Debug, Default)]
struct MemoryDomain {
    items: BTreeMap<String, BTreeMap<String, String>>,
}

impl KeyValueDomain for MemoryDomain {
    fn get_item(&self, name: &str) -> anyhow::Result<Option<BTreeMap<String, String>>> {
        Ok(self.items.get(name).cloned())
    }

    fn put_item(&mut self, name: &str, attributes: BTreeMap<String, String>) -> anyhow::Result<()> {
        self.items.insert(name.to_string(), attributes);
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn open_domain(&mut self, name: &str) -> anyhow::Result<&mut dyn KeyValueDomain> {
        Ok(self.domains.entry(name.to_string()).or_default())
    }

    fn find_domain(&self, name: &str) -> anyhow::Result<Option<&dyn KeyValueDomain>> {
        Ok(self
            .domains
            .get(name)
            .map(|domain| domain as &dyn KeyValueDomain))
    }
}
