//! Format registry: suffix aliases, loaders, and kind-dispatched dumpers.

use std::fmt;
use std::fs;
use std::path::Path;

use datashed_core::{Suffix, Value, ValueKind};
use indexmap::IndexMap;

use crate::error::{IoError, Result};

use super::traits::{Dumper, Loader, ReadOptions, WriteOptions};

/// Registry of format loaders and dumpers, keyed by file suffix.
///
/// Loaders are unique per suffix. Dumpers are keyed by suffix and value
/// kind; lookup walks the kind's ancestors so the most specific registered
/// handler wins. In both registries the last registration for a key
/// replaces any earlier one, which is how callers override built-ins.
///
/// The registry is an explicit value with no global state: construct one
/// (usually via [`with_defaults`](Self::with_defaults)) at startup and pass
/// it where it is needed. Registration takes `&mut self`; lookups are
/// `&self` and safe to share across threads once registration is done.
pub struct FormatRegistry {
    aliases: IndexMap<Suffix, Suffix>,
    loaders: IndexMap<Suffix, Box<dyn Loader>>,
    dumpers: IndexMap<Suffix, IndexMap<ValueKind, Box<dyn Dumper>>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            aliases: IndexMap::new(),
            loaders: IndexMap::new(),
            dumpers: IndexMap::new(),
        }
    }

    /// Create a registry with all built-in formats and aliases.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(feature = "csv")]
        {
            use crate::formats::csv::{CsvDumper, CsvLoader};
            registry.register_loader(".csv", CsvLoader);
            registry.register_dumper(".csv", ValueKind::Table, CsvDumper);
        }

        #[cfg(feature = "parquet")]
        {
            use crate::formats::parquet::{ParquetDumper, ParquetLoader};
            registry.register_loader(".parquet", ParquetLoader);
            registry.register_dumper(".parquet", ValueKind::Table, ParquetDumper);
        }

        #[cfg(feature = "json")]
        {
            use crate::formats::json::{JsonDumper, JsonLoader, JsonTableDumper};
            registry.register_loader(".json", JsonLoader);
            registry.register_dumper(".json", ValueKind::Any, JsonDumper);
            registry.register_dumper(".json", ValueKind::Table, JsonTableDumper);
        }

        #[cfg(feature = "yaml")]
        {
            use crate::formats::yaml::{YamlDumper, YamlLoader};
            registry.register_loader(".yaml", YamlLoader);
            registry.register_dumper(".yaml", ValueKind::Any, YamlDumper);
            registry.alias_unchecked(".yml", ".yaml");
        }

        #[cfg(feature = "toml")]
        {
            use crate::formats::toml::{TomlDumper, TomlLoader};
            registry.register_loader(".toml", TomlLoader);
            registry.register_dumper(".toml", ValueKind::Mapping, TomlDumper);
        }

        #[cfg(feature = "bincode")]
        {
            use crate::formats::bincode::{BincodeDumper, BincodeLoader};
            registry.register_loader(".bin", BincodeLoader);
            registry.register_dumper(".bin", ValueKind::Any, BincodeDumper);
            registry.alias_unchecked(".bincode", ".bin");
        }

        registry
    }

    /// Register an alternative spelling for a canonical suffix.
    ///
    /// Aliases are single-hop: the canonical side may not itself be an
    /// alias, and the alias may not already serve as another alias's
    /// target. Re-registering the same alias overwrites its mapping
    /// silently.
    pub fn register_alias(
        &mut self,
        alias: impl Into<Suffix>,
        canonical: impl Into<Suffix>,
    ) -> Result<()> {
        let alias = alias.into();
        let canonical = canonical.into();
        if alias == canonical {
            return Err(IoError::InvalidAlias(format!(
                "{alias} cannot alias itself"
            )));
        }
        if self.aliases.contains_key(&canonical) {
            return Err(IoError::InvalidAlias(format!(
                "{canonical} is itself an alias; chains are not allowed"
            )));
        }
        if self.aliases.values().any(|target| *target == alias) {
            return Err(IoError::InvalidAlias(format!(
                "{alias} is already the target of another alias"
            )));
        }
        self.aliases.insert(alias, canonical);
        Ok(())
    }

    // Built-in aliases are known single-hop; skip the chain checks.
    fn alias_unchecked(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(Suffix::new(alias), Suffix::new(canonical));
    }

    /// Resolve a suffix to its canonical form.
    ///
    /// Returns the input unchanged when no alias is registered for it.
    /// Resolution is single-hop and cannot loop.
    pub fn canonical(&self, suffix: impl Into<Suffix>) -> Suffix {
        let suffix = suffix.into();
        self.aliases.get(&suffix).cloned().unwrap_or(suffix)
    }

    /// Register a loader under the canonicalized suffix, replacing any
    /// previous loader for it.
    pub fn register_loader<L>(&mut self, suffix: impl Into<Suffix>, loader: L)
    where
        L: Loader + 'static,
    {
        let suffix = self.canonical(suffix);
        self.loaders.insert(suffix, Box::new(loader));
    }

    /// Register a dumper for a suffix and value kind, replacing any
    /// previous dumper for that pair.
    pub fn register_dumper<D>(&mut self, suffix: impl Into<Suffix>, kind: ValueKind, dumper: D)
    where
        D: Dumper + 'static,
    {
        let suffix = self.canonical(suffix);
        self.dumpers
            .entry(suffix)
            .or_default()
            .insert(kind, Box::new(dumper));
    }

    /// The loader for a suffix.
    pub fn loader(&self, suffix: impl Into<Suffix>) -> Result<&dyn Loader> {
        let suffix = self.canonical(suffix);
        match self.loaders.get(&suffix) {
            Some(loader) => Ok(loader.as_ref()),
            None => Err(IoError::NoLoader(suffix)),
        }
    }

    /// The most specific dumper for a suffix and value kind: the exact
    /// kind if registered, otherwise the nearest registered ancestor.
    pub fn dumper(&self, suffix: impl Into<Suffix>, kind: ValueKind) -> Result<&dyn Dumper> {
        let suffix = self.canonical(suffix);
        let by_kind = match self.dumpers.get(&suffix) {
            Some(map) => map,
            None => return Err(IoError::NoDumper { suffix, kind }),
        };
        for candidate in kind.ancestors() {
            if let Some(dumper) = by_kind.get(&candidate) {
                return Ok(dumper.as_ref());
            }
        }
        Err(IoError::NoDumper { suffix, kind })
    }

    /// Load a value from a file, dispatching on the path's extension.
    pub fn load(&self, path: impl AsRef<Path>, options: &ReadOptions) -> Result<Value> {
        let path = path.as_ref();
        let suffix =
            Suffix::of_path(path).ok_or_else(|| IoError::MissingSuffix(path.to_path_buf()))?;
        self.loader(suffix)?.load(path, options)
    }

    /// Load with an explicit suffix, ignoring the path's own extension.
    pub fn load_as(
        &self,
        path: impl AsRef<Path>,
        suffix: impl Into<Suffix>,
        options: &ReadOptions,
    ) -> Result<Value> {
        self.loader(suffix)?.load(path.as_ref(), options)
    }

    /// Dump a value to a file, dispatching on the path's extension and the
    /// value's runtime kind. Missing parent directories are created unless
    /// `options.mkdir` is cleared.
    pub fn dump(&self, value: &Value, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        let suffix =
            Suffix::of_path(path).ok_or_else(|| IoError::MissingSuffix(path.to_path_buf()))?;
        self.dump_as(value, path, suffix, options)
    }

    /// Dump with an explicit suffix, ignoring the path's own extension.
    pub fn dump_as(
        &self,
        value: &Value,
        path: impl AsRef<Path>,
        suffix: impl Into<Suffix>,
        options: &WriteOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let dumper = self.dumper(suffix, value.kind())?;
        if options.mkdir {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }
        dumper.dump(value, path, options)
    }

    /// Suffixes with a registered loader, in registration order.
    pub fn loader_suffixes(&self) -> impl Iterator<Item = &Suffix> {
        self.loaders.keys()
    }

    /// Suffixes with at least one registered dumper, in registration order.
    pub fn dumper_suffixes(&self) -> impl Iterator<Item = &Suffix> {
        self.dumpers.keys()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("aliases", &self.aliases)
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .field("dumpers", &self.dumpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tagged_loader(tag: &'static str) -> impl Loader {
        move |_: &Path, _: &ReadOptions| -> Result<Value> { Ok(Value::from(tag)) }
    }

    fn tagged_dumper(tag: &'static str) -> impl Dumper {
        move |_: &Value, path: &Path, _: &WriteOptions| -> Result<()> {
            fs::write(path, tag)?;
            Ok(())
        }
    }

    fn load_marker(registry: &FormatRegistry, suffix: &str) -> String {
        let loader = registry.loader(suffix).unwrap();
        let value = loader
            .load(Path::new("unused"), &ReadOptions::default())
            .unwrap();
        value.as_str().unwrap().to_string()
    }

    #[test]
    fn registered_loader_is_returned() {
        let mut registry = FormatRegistry::new();
        registry.register_loader(".num", tagged_loader("num"));
        assert_eq!(load_marker(&registry, ".num"), "num");
    }

    #[test]
    fn suffix_lookup_is_case_insensitive() {
        let mut registry = FormatRegistry::new();
        registry.register_loader(".JSON", tagged_loader("json"));
        assert_eq!(load_marker(&registry, ".json"), "json");
        assert_eq!(load_marker(&registry, "Json"), "json");
    }

    #[test]
    fn missing_loader_fails() {
        let registry = FormatRegistry::new();
        let err = registry.loader(".nope").unwrap_err();
        assert!(matches!(err, IoError::NoLoader(_)));
    }

    #[test]
    fn last_loader_registration_wins() {
        let mut registry = FormatRegistry::new();
        registry.register_loader(".x", tagged_loader("first"));
        registry.register_loader(".x", tagged_loader("second"));
        assert_eq!(load_marker(&registry, ".x"), "second");
    }

    #[test]
    fn alias_resolves_to_same_handler() {
        let mut registry = FormatRegistry::new();
        registry.register_loader(".yaml", tagged_loader("yaml"));
        registry.register_alias(".conf", ".yaml").unwrap();
        assert_eq!(load_marker(&registry, ".conf"), "yaml");
        assert_eq!(load_marker(&registry, ".yaml"), "yaml");
    }

    #[test]
    fn registration_under_alias_lands_on_canonical() {
        let mut registry = FormatRegistry::new();
        registry.register_alias(".conf", ".yaml").unwrap();
        registry.register_loader(".conf", tagged_loader("yaml"));
        assert_eq!(load_marker(&registry, ".yaml"), "yaml");
    }

    #[test]
    fn alias_reregistration_overwrites_silently() {
        let mut registry = FormatRegistry::new();
        registry.register_alias(".conf", ".yaml").unwrap();
        registry.register_alias(".conf", ".json").unwrap();
        assert_eq!(registry.canonical(".conf"), Suffix::new(".json"));
    }

    #[test]
    fn alias_chains_are_rejected() {
        let mut registry = FormatRegistry::new();
        registry.register_alias(".yml", ".yaml").unwrap();

        // canonical side is already an alias
        let err = registry.register_alias(".y", ".yml").unwrap_err();
        assert!(matches!(err, IoError::InvalidAlias(_)));

        // alias side is already a canonical target
        let err = registry.register_alias(".yaml", ".cfg").unwrap_err();
        assert!(matches!(err, IoError::InvalidAlias(_)));

        let err = registry.register_alias(".same", ".same").unwrap_err();
        assert!(matches!(err, IoError::InvalidAlias(_)));
    }

    #[test]
    fn canonical_passes_unknown_suffixes_through() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.canonical(".custom"), Suffix::new(".custom"));
    }

    #[test]
    fn dumper_prefers_exact_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("any"));
        registry.register_dumper(".out", ValueKind::Table, tagged_dumper("table"));

        let path = dir.path().join("a.out");
        let table = Value::Table(datashed_core::Table::new());
        registry.dump(&table, &path, &WriteOptions::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "table");

        registry
            .dump(&Value::from(1i64), &path, &WriteOptions::new())
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "any");
    }

    #[test]
    fn dumper_walks_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("any"));
        registry.register_dumper(".out", ValueKind::Scalar, tagged_dumper("scalar"));

        let path = dir.path().join("a.out");
        registry
            .dump(&Value::from(1i64), &path, &WriteOptions::new())
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "scalar");

        registry
            .dump(&Value::Array(vec![]), &path, &WriteOptions::new())
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "any");
    }

    #[test]
    fn unrelated_kind_has_no_dumper() {
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".tab", ValueKind::Table, tagged_dumper("table"));

        let err = registry
            .dumper(".tab", ValueKind::Mapping)
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(
            err,
            IoError::NoDumper {
                kind: ValueKind::Mapping,
                ..
            }
        ));
    }

    #[test]
    fn last_dumper_registration_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("first"));
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("second"));

        let path = dir.path().join("a.out");
        registry
            .dump(&Value::Null, &path, &WriteOptions::new())
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn load_requires_an_extension() {
        let registry = FormatRegistry::new();
        let err = registry
            .load(PathBuf::from("no_extension"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, IoError::MissingSuffix(_)));
    }

    #[test]
    fn dump_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("x"));

        let path = dir.path().join("nested/deeper/a.out");
        registry
            .dump(&Value::Null, &path, &WriteOptions::new())
            .unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn dump_without_mkdir_surfaces_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FormatRegistry::new();
        registry.register_dumper(".out", ValueKind::Any, tagged_dumper("x"));

        let path = dir.path().join("missing/a.out");
        let err = registry
            .dump(&Value::Null, &path, &WriteOptions::new().no_mkdir())
            .unwrap_err();
        match err {
            IoError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_as_overrides_path_extension() {
        let mut registry = FormatRegistry::new();
        registry.register_loader(".num", tagged_loader("num"));
        let value = registry
            .load_as(Path::new("file.dat"), ".num", &ReadOptions::default())
            .unwrap();
        assert_eq!(value.as_str(), Some("num"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn defaults_include_yml_alias() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.canonical(".yml"), Suffix::new(".yaml"));
        assert!(registry.loader(".yml").is_ok());
    }

    #[cfg(feature = "json")]
    #[test]
    fn defaults_register_json_both_ways() {
        let registry = FormatRegistry::with_defaults();
        assert!(registry.loader(".json").is_ok());
        assert!(registry.dumper(".json", ValueKind::Mapping).is_ok());
        assert!(registry.dumper(".json", ValueKind::Table).is_ok());
    }
}
