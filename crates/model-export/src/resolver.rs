//! Identifier resolution between exported entities

use crate::error::{Error, Result};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Kinds of identifier the resolver tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RefKind {
    /// Machine id
    Machine,
    /// Local application name
    Application,
    /// Unit name
    Unit,
    /// Relation key → relation id
    Relation,
    /// Storage instance id
    StorageInstance,
    /// Volume id
    Volume,
    /// Filesystem id
    Filesystem,
    /// Space id
    Space,
    /// Space name → space id
    SpaceName,
    /// Subnet CIDR → subnet id
    Subnet,
    /// `machine:device` → device name
    LinkLayerDevice,
    /// Remote application name
    RemoteApplication,
    /// Offer UUID
    Offer,
}

impl RefKind {
    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            RefKind::Machine => "machine",
            RefKind::Application => "application",
            RefKind::Unit => "unit",
            RefKind::Relation => "relation",
            RefKind::StorageInstance => "storage instance",
            RefKind::Volume => "volume",
            RefKind::Filesystem => "filesystem",
            RefKind::Space => "space",
            RefKind::SpaceName => "space name",
            RefKind::Subnet => "subnet",
            RefKind::LinkLayerDevice => "link-layer device",
            RefKind::RemoteApplication => "remote application",
            RefKind::Offer => "offer",
        }
    }

    /// Whether keys of this kind are compared after [`normalize`].
    ///
    /// Only sanitized names clash on normalization; ids, CIDRs, unit names
    /// and composite keys are matched exactly.
    pub fn is_name_like(self) -> bool {
        matches!(self, RefKind::SpaceName)
    }

    fn table_key(self, key: &str) -> String {
        if self.is_name_like() {
            normalize(key)
        } else {
            key.to_string()
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize an identifier: lower-case, characters outside `[a-z0-9-]`
/// become `-`, dash runs collapse and leading/trailing dashes are trimmed
pub fn normalize(key: &str) -> String {
    let lowered = key.to_lowercase();
    let replaced = INVALID_CHARS.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_string()
}

#[derive(Debug, Clone)]
struct Registration {
    source: String,
    id: String,
}

type Table = IndexMap<(RefKind, String), Registration>;

/// Build-time mapping from source identifiers to snapshot identifiers.
///
/// Written only by the assembler between phases; [`freeze`](Self::freeze)
/// turns it into the read-only [`ReferenceTable`].
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    entries: Table,
}

impl ReferenceResolver {
    /// Empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` of `kind` as snapshot id `id`.
    ///
    /// Registering the same source key again is a no-op. For name-like
    /// kinds a different key that normalizes to an already registered one
    /// is a name clash.
    pub fn register(&mut self, kind: RefKind, key: &str, id: &str) -> Result<()> {
        let normalized = kind.table_key(key);
        if let Some(existing) = self.entries.get(&(kind, normalized.clone())) {
            if existing.source == key {
                return Ok(());
            }
            return Err(Error::NameClash {
                kind: kind.name(),
                existing: existing.source.clone(),
                incoming: key.to_string(),
            });
        }
        self.entries.insert(
            (kind, normalized),
            Registration {
                source: key.to_string(),
                id: id.to_string(),
            },
        );
        Ok(())
    }

    /// Register a key that is its own snapshot id
    pub fn register_id(&mut self, kind: RefKind, key: &str) -> Result<()> {
        self.register(kind, key, key)
    }

    /// Snapshot id registered for `key`
    pub fn resolve(&self, kind: RefKind, key: &str) -> Option<&str> {
        lookup(&self.entries, kind, key)
    }

    /// Snapshot id for `key`, or the empty sentinel for advisory lookups
    pub fn resolve_or_empty(&self, kind: RefKind, key: &str) -> &str {
        self.resolve(kind, key).unwrap_or("")
    }

    /// Finish assembly and hand out the read-only table
    pub fn freeze(self) -> ReferenceTable {
        ReferenceTable {
            entries: self.entries,
        }
    }
}

fn lookup<'a>(entries: &'a Table, kind: RefKind, key: &str) -> Option<&'a str> {
    entries
        .get(&(kind, kind.table_key(key)))
        .filter(|reg| reg.source == key)
        .map(|reg| reg.id.as_str())
}

/// Read-only reference table consulted by validation
#[derive(Debug)]
pub struct ReferenceTable {
    entries: Table,
}

impl ReferenceTable {
    /// Snapshot id registered for `key`
    pub fn resolve(&self, kind: RefKind, key: &str) -> Option<&str> {
        lookup(&self.entries, kind, key)
    }

    /// Whether `key` was registered
    pub fn contains(&self, kind: RefKind, key: &str) -> bool {
        self.resolve(kind, key).is_some()
    }

    /// Number of registered identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("DB Space"), "db-space");
        assert_eq!(normalize("db__space!!"), "db-space");
        assert_eq!(normalize("--a//b--"), "a-b");
        assert_eq!(normalize("wordpress/0"), "wordpress-0");
    }

    #[test]
    fn test_register_and_resolve() {
        let mut resolver = ReferenceResolver::new();
        resolver.register(RefKind::SpaceName, "db", "1").unwrap();
        resolver.register(RefKind::SpaceName, "db", "1").unwrap();

        assert_eq!(resolver.resolve(RefKind::SpaceName, "db"), Some("1"));
        assert_eq!(resolver.resolve(RefKind::Space, "db"), None);
        assert_eq!(resolver.resolve_or_empty(RefKind::SpaceName, "web"), "");
    }

    #[test]
    fn test_name_clash_names_both_sources() {
        let mut resolver = ReferenceResolver::new();
        resolver.register(RefKind::SpaceName, "db-space", "1").unwrap();
        let err = resolver
            .register(RefKind::SpaceName, "DB_Space", "2")
            .unwrap_err();
        match err {
            Error::NameClash {
                kind,
                existing,
                incoming,
            } => {
                assert_eq!(kind, "space name");
                assert_eq!(existing, "db-space");
                assert_eq!(incoming, "DB_Space");
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(resolver.resolve(RefKind::SpaceName, "DB_Space"), None);
    }

    #[test]
    fn test_exact_kinds_do_not_clash_on_punctuation() {
        let mut resolver = ReferenceResolver::new();
        resolver.register(RefKind::Relation, "a:b-c", "0").unwrap();
        resolver.register(RefKind::Relation, "a-b:c", "1").unwrap();
        resolver
            .register_id(RefKind::Subnet, "fe80::64/128")
            .unwrap();
        resolver
            .register_id(RefKind::Subnet, "fe80:64::/128")
            .unwrap();
        resolver
            .register(RefKind::LinkLayerDevice, "0:eth0.100", "eth0.100")
            .unwrap();
        resolver
            .register(RefKind::LinkLayerDevice, "0:eth0-100", "eth0-100")
            .unwrap();

        assert_eq!(resolver.resolve(RefKind::Relation, "a:b-c"), Some("0"));
        assert_eq!(resolver.resolve(RefKind::Relation, "a-b:c"), Some("1"));
        assert_eq!(
            resolver.resolve(RefKind::Subnet, "fe80:64::/128"),
            Some("fe80:64::/128")
        );
        assert_eq!(
            resolver.resolve(RefKind::LinkLayerDevice, "0:eth0-100"),
            Some("eth0-100")
        );
        assert_eq!(resolver.resolve(RefKind::Relation, "A:B-C"), None);
    }

    #[test]
    fn test_frozen_table_keeps_entries() {
        let mut resolver = ReferenceResolver::new();
        resolver.register_id(RefKind::Unit, "wordpress/0").unwrap();
        let table = resolver.freeze();
        assert!(table.contains(RefKind::Unit, "wordpress/0"));
        assert!(!table.contains(RefKind::Unit, "wordpress/1"));
        assert_eq!(table.len(), 1);
    }
}
