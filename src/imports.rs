//! Import table: alias → fully-qualified-name mapping.
//!
//! Built once per class from the use-import scanner and memoized by the
//! reader. Aliases are stored lowercased, matching how `use` statement
//! short names are looked up case-insensitively; the current namespace
//! is an explicit field rather than a reserved map key.

use std::collections::HashMap;

/// Alias-to-FQN mapping used to disambiguate short type names, plus the
/// namespace of the class the table was built for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    aliases: HashMap<String, String>,
    namespace: String,
}

impl ImportTable {
    pub fn new(namespace: impl Into<String>) -> Self {
        ImportTable {
            aliases: HashMap::new(),
            namespace: namespace.into(),
        }
    }

    /// The namespace of the class this table belongs to. Empty for the
    /// global namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register one import. The alias is lowercased on insertion.
    pub fn insert(&mut self, alias: &str, fqn: impl Into<String>) {
        self.aliases.insert(alias.to_ascii_lowercase(), fqn.into());
    }

    /// Merge a raw alias → FQN map (e.g. scanner output) into this table.
    /// Later entries win on alias collision.
    pub fn merge(&mut self, imports: &HashMap<String, String>) {
        for (alias, fqn) in imports {
            self.insert(alias, fqn.clone());
        }
    }

    /// Look up an alias, case-insensitively.
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.aliases
            .get(&alias.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Iterate the imported fully-qualified names.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.aliases.values().map(String::as_str)
    }

    /// Iterate (alias, FQN) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, f)| (a.as_str(), f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
