//! Compilation of a [`NormalizationConfig`] into runnable field pipelines.
//!
//! Compiling resolves every function reference against the registry and
//! deserializes its parameters, so an unknown name or malformed parameter is
//! reported before any record is touched. The resulting plan borrows the
//! registry and is only valid for the duration of one run.

use recnorm_model::{FieldRule, FunctionRef, NormalizationConfig, Record};
use serde_json::Value;
use tracing::trace;

use crate::error::{NormalizeError, Result};
use crate::kinds::{FunctionKind, Stage};
use crate::mappers::{MapperEntry, PreparedMapper};
use crate::reducers::{PreparedReducer, ReducerEntry};
use crate::registry::{FunctionRegistry, Registry};
use crate::sources::{PreparedSource, SourceEntry};

/// Name of the source used when a rule does not configure one.
pub const DEFAULT_SOURCE: &str = "getValue";

/// The source → mappers → reducer pipeline for one output field.
pub struct FieldPlan<'r> {
    field: String,
    source: PreparedSource<'r>,
    source_desc: String,
    mappers: Vec<PreparedMapper<'r>>,
    mappers_desc: String,
    reducer: PreparedReducer<'r>,
    reducer_desc: String,
}

impl FieldPlan<'_> {
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Run the pipeline against one group of records.
    pub fn apply(&self, primary_key: &Value, records: &[Record]) -> Result<Value> {
        let values = records
            .iter()
            .map(|record| (self.source)(record))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|source| self.stage_error(primary_key, Stage::Source, source))?;

        let values = self
            .mappers
            .iter()
            .try_fold(values, |values, mapper| mapper(values))
            .map_err(|source| self.stage_error(primary_key, Stage::Mapper, source))?;

        (self.reducer)(values)
            .map_err(|source| self.stage_error(primary_key, Stage::Reducer, source))
    }

    fn stage_error(&self, primary_key: &Value, stage: Stage, source: anyhow::Error) -> NormalizeError {
        let rule = match stage {
            Stage::Source => format!("source: {}", self.source_desc),
            Stage::Mapper => format!("mappers: {}", self.mappers_desc),
            Stage::Reducer => format!("reducer: {}", self.reducer_desc),
        };
        NormalizeError::Stage {
            primary_key: primary_key.clone(),
            field: self.field.clone(),
            stage,
            rule,
            source,
        }
    }
}

/// Compiled pipelines for every active field rule, in configuration order.
pub struct NormalizationPlan<'r> {
    fields: Vec<FieldPlan<'r>>,
}

impl<'r> NormalizationPlan<'r> {
    /// Resolve every field rule in `config` against `registry`.
    pub fn compile(registry: &'r FunctionRegistry, config: &NormalizationConfig) -> Result<Self> {
        let fields = config
            .field_rules
            .active()
            .map(|(field, rule)| compile_field(registry, field, rule))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldPlan<'r>] {
        &self.fields
    }

    /// Build the normalized record for one group.
    pub fn apply(&self, primary_key: &Value, records: &[Record]) -> Result<Record> {
        let mut normalized = Record::new();
        for field in &self.fields {
            let value = field.apply(primary_key, records)?;
            normalized.insert(field.field.clone(), value);
        }
        Ok(normalized)
    }
}

fn compile_field<'r>(
    registry: &'r FunctionRegistry,
    field: &str,
    rule: &FieldRule,
) -> Result<FieldPlan<'r>> {
    trace!(field, "compiling field rule");

    let source_ref = source_ref(field, rule.source.as_ref());
    let source = resolve(registry.sources(), Stage::Source, field, &source_ref)?
        .prepare(source_ref.params.clone())
        .map_err(|source| invalid_params(Stage::Source, field, &source_ref, source))?;

    let mappers = rule
        .mappers
        .iter()
        .map(|mapper_ref| {
            resolve(registry.mappers(), Stage::Mapper, field, mapper_ref)?
                .prepare(mapper_ref.params.clone())
                .map_err(|source| invalid_params(Stage::Mapper, field, mapper_ref, source))
        })
        .collect::<Result<Vec<_>>>()?;

    let reducer = resolve(registry.reducers(), Stage::Reducer, field, &rule.reducer)?
        .prepare(rule.reducer.params.clone())
        .map_err(|source| invalid_params(Stage::Reducer, field, &rule.reducer, source))?;

    Ok(FieldPlan {
        field: field.to_string(),
        source,
        source_desc: source_ref.describe(),
        mappers,
        mappers_desc: format!(
            "[{}]",
            rule.mappers
                .iter()
                .map(FunctionRef::describe)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        reducer,
        reducer_desc: rule.reducer.describe(),
    })
}

/// The effective source reference for a field.
///
/// Without a configured source the field is copied by name. A configured
/// source that does not name a `field` parameter receives the output field.
fn source_ref(field: &str, configured: Option<&FunctionRef>) -> FunctionRef {
    let mut source = configured
        .cloned()
        .unwrap_or_else(|| FunctionRef::named(DEFAULT_SOURCE));
    if !source.params.contains_key("field") {
        source
            .params
            .insert("field".to_string(), Value::String(field.to_string()));
    }
    source
}

fn resolve<'r, K, E>(
    registry: &'r Registry<K, E>,
    stage: Stage,
    field: &str,
    function: &FunctionRef,
) -> Result<&'r E>
where
    K: FunctionKind,
    E: ?Sized,
{
    registry
        .get(&function.name)
        .ok_or_else(|| NormalizeError::UnknownFunction {
            stage,
            field: field.to_string(),
            name: function.name.clone(),
            registered: registry.names(),
        })
}

fn invalid_params(
    stage: Stage,
    field: &str,
    function: &FunctionRef,
    source: serde_json::Error,
) -> NormalizeError {
    NormalizeError::InvalidParams {
        stage,
        field: field.to_string(),
        name: function.name.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> NormalizationConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn default_source_copies_field() {
        let source = source_ref("name", None);
        assert_eq!(source.name, DEFAULT_SOURCE);
        assert_eq!(source.params.get("field"), Some(&json!("name")));
    }

    #[test]
    fn configured_field_is_kept() {
        let configured = FunctionRef::named("getValue").param("field", "other");
        let source = source_ref("name", Some(&configured));
        assert_eq!(source.params.get("field"), Some(&json!("other")));
    }

    #[test]
    fn compile_skips_null_rules() {
        let registry = FunctionRegistry::default();
        let config = config(json!({
            "primaryKey": "id",
            "primarySources": ["id"],
            "fieldRules": {"id": {"reducer": "first"}, "ignored": null}
        }));
        let plan = NormalizationPlan::compile(&registry, &config).unwrap();
        let fields: Vec<_> = plan.fields().iter().map(FieldPlan::field).collect();
        assert_eq!(fields, ["id"]);
    }

    #[test]
    fn unknown_mapper_fails_compile() {
        let registry = FunctionRegistry::default();
        let config = config(json!({
            "primaryKey": "id",
            "primarySources": ["id"],
            "fieldRules": {"id": {"mappers": ["notvalid"], "reducer": "unique"}}
        }));
        let err = NormalizationPlan::compile(&registry, &config).err().unwrap();
        assert!(matches!(err, NormalizeError::UnknownFunction { stage: Stage::Mapper, .. }));
        let message = err.to_string();
        assert!(message.contains("notvalid"), "{message}");
        assert!(message.contains("notBlank, notEqual, replace"), "{message}");
    }

    #[test]
    fn malformed_pattern_fails_compile() {
        let registry = FunctionRegistry::default();
        let config = config(json!({
            "primaryKey": "id",
            "primarySources": ["id"],
            "fieldRules": {"id": {
                "mappers": [{"name": "replace", "pattern": "(", "replacement": ""}],
                "reducer": "first"
            }}
        }));
        let err = NormalizationPlan::compile(&registry, &config).err().unwrap();
        assert!(matches!(err, NormalizeError::InvalidParams { stage: Stage::Mapper, .. }));
        assert_eq!(err.field(), "id");
    }
}
