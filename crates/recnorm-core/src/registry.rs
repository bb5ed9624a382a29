//! Function registries for sources, mappers, and reducers.
//!
//! A [`FunctionRegistry`] is built once, before any normalization run, and is
//! then only read. [`FunctionRegistry::default()`] seeds every built-in;
//! `register_*` adds custom functions or replaces built-ins of the same name.
//!
//! # Example
//!
//! ```
//! use recnorm_core::registry::FunctionRegistry;
//! use serde_json::Value;
//!
//! let registry = FunctionRegistry::default()
//!     .with_reducer_fn("count", |values: Vec<Value>, _params: &recnorm_model::Params| {
//!         Ok(Value::from(values.len()))
//!     });
//! assert!(registry.reducer_names().contains(&"count".to_string()));
//! ```

use std::collections::HashMap;

use anyhow::Result;
use recnorm_model::{Params, Record};
use serde_json::Value;

use crate::kinds::{FunctionKind, MapperKind, ReducerKind, SourceKind};
use crate::mappers::{FnMapper, Mapper, MapperEntry, NotBlank, NotEqual, Replace};
use crate::reducers::{AnyMatch, First, FnReducer, Highest, Lowest, Reducer, ReducerEntry, Unique};
use crate::sources::{AlternateValue, FnSource, GetValue, Source, SourceEntry};

/// Name-to-function table for one stage.
pub struct Registry<K, E: ?Sized> {
    entries: HashMap<K, Box<E>>,
}

impl<K: FunctionKind, E: ?Sized> Registry<K, E> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert an entry, replacing any previous entry of the same kind.
    fn insert(&mut self, kind: K, entry: Box<E>) {
        self.entries.insert(kind, entry);
    }

    /// Look up an entry by configured name (exact match).
    pub fn get(&self, name: &str) -> Option<&E> {
        self.entries.get(&K::from_name(name)).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&K::from_name(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().map(ToString::to_string).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type SourceRegistry = Registry<SourceKind, dyn SourceEntry>;
pub type MapperRegistry = Registry<MapperKind, dyn MapperEntry>;
pub type ReducerRegistry = Registry<ReducerKind, dyn ReducerEntry>;

/// The three function tables used by the engine.
pub struct FunctionRegistry {
    sources: SourceRegistry,
    mappers: MapperRegistry,
    reducers: ReducerRegistry,
}

impl FunctionRegistry {
    /// A registry without any functions, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            sources: Registry::new(),
            mappers: Registry::new(),
            reducers: Registry::new(),
        }
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn mappers(&self) -> &MapperRegistry {
        &self.mappers
    }

    pub fn reducers(&self) -> &ReducerRegistry {
        &self.reducers
    }

    /// Register a source under `name`, replacing any existing one.
    pub fn register_source<S: Source>(&mut self, name: &str, source: S) {
        self.sources.insert(SourceKind::from_name(name), Box::new(source));
    }

    /// Register a mapper under `name`, replacing any existing one.
    pub fn register_mapper<M: Mapper>(&mut self, name: &str, mapper: M) {
        self.mappers.insert(MapperKind::from_name(name), Box::new(mapper));
    }

    /// Register a reducer under `name`, replacing any existing one.
    pub fn register_reducer<R: Reducer>(&mut self, name: &str, reducer: R) {
        self.reducers.insert(ReducerKind::from_name(name), Box::new(reducer));
    }

    /// Register a closure taking raw parameters as a source.
    pub fn register_source_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Record, &Params) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_source(name, FnSource(f));
    }

    pub fn register_mapper_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<Value>, &Params) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.register_mapper(name, FnMapper(f));
    }

    pub fn register_reducer_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<Value>, &Params) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_reducer(name, FnReducer(f));
    }

    #[must_use]
    pub fn with_source<S: Source>(mut self, name: &str, source: S) -> Self {
        self.register_source(name, source);
        self
    }

    #[must_use]
    pub fn with_mapper<M: Mapper>(mut self, name: &str, mapper: M) -> Self {
        self.register_mapper(name, mapper);
        self
    }

    #[must_use]
    pub fn with_reducer<R: Reducer>(mut self, name: &str, reducer: R) -> Self {
        self.register_reducer(name, reducer);
        self
    }

    #[must_use]
    pub fn with_source_fn<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Record, &Params) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_source_fn(name, f);
        self
    }

    #[must_use]
    pub fn with_mapper_fn<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>, &Params) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.register_mapper_fn(name, f);
        self
    }

    #[must_use]
    pub fn with_reducer_fn<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Vec<Value>, &Params) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_reducer_fn(name, f);
        self
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.names()
    }

    pub fn mapper_names(&self) -> Vec<String> {
        self.mappers.names()
    }

    pub fn reducer_names(&self) -> Vec<String> {
        self.reducers.names()
    }
}

impl Default for FunctionRegistry {
    /// Registry seeded with every built-in function.
    fn default() -> Self {
        let mut registry = Self::empty();

        registry.register_source("getValue", GetValue);
        registry.register_source("alternateValue", AlternateValue);

        registry.register_mapper("notBlank", NotBlank);
        registry.register_mapper("notEqual", NotEqual);
        registry.register_mapper("replace", Replace);

        registry.register_reducer("anyMatch", AnyMatch);
        registry.register_reducer("first", First);
        registry.register_reducer("highest", Highest);
        registry.register_reducer("lowest", Lowest);
        registry.register_reducer("unique", Unique);

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_registry_has_builtins() {
        let registry = FunctionRegistry::default();
        assert_eq!(registry.source_names(), ["alternateValue", "getValue"]);
        assert_eq!(registry.mapper_names(), ["notBlank", "notEqual", "replace"]);
        assert_eq!(
            registry.reducer_names(),
            ["anyMatch", "first", "highest", "lowest", "unique"]
        );
    }

    #[test]
    fn empty_registry_has_nothing() {
        let registry = FunctionRegistry::empty();
        assert!(registry.sources().is_empty());
        assert!(registry.mappers().is_empty());
        assert!(registry.reducers().is_empty());
    }

    #[test]
    fn lookups_are_exact() {
        let registry = FunctionRegistry::default();
        assert!(registry.reducers().contains("first"));
        assert!(!registry.reducers().contains("First"));
        assert!(registry.reducers().get("FIRST").is_none());
    }

    #[test]
    fn registering_overwrites_builtin() {
        let registry = FunctionRegistry::default()
            .with_reducer_fn("first", |_values: Vec<Value>, _params: &Params| Ok(json!("custom")));
        assert_eq!(registry.reducers().len(), 5);

        let reducer = registry
            .reducers()
            .get("first")
            .unwrap()
            .prepare(Params::new())
            .unwrap();
        assert_eq!(reducer(vec![json!("a")]).unwrap(), json!("custom"));
    }

    #[test]
    fn custom_names_are_listed() {
        let mut registry = FunctionRegistry::default();
        registry.register_mapper_fn("upper", |values: Vec<Value>, _params: &Params| Ok(values));
        assert!(registry.mapper_names().contains(&"upper".to_string()));
        assert_eq!(registry.mappers().len(), 4);
    }
}
