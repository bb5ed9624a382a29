//! The normalization engine.
//!
//! [`Normalizer`] merges denormalized records into one record per primary key:
//!
//! 1. compile the configuration against the registry (fails fast on unknown
//!    functions or bad parameters)
//! 2. derive each record's primary key and group duplicates
//! 3. for every group and active field rule run source → mappers → reducer
//!
//! A run either returns every normalized record or an error; there are no
//! partial results.

use recnorm_model::{NormalizationConfig, Params, Record};
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::grouping::group_records;
use crate::mappers::Mapper;
use crate::plan::NormalizationPlan;
use crate::reducers::Reducer;
use crate::registry::FunctionRegistry;
use crate::sources::Source;

/// Result of a run with the counts needed for reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationOutput {
    /// One record per distinct primary key, in first-seen order.
    pub records: Vec<Record>,
    /// Number of input records.
    pub input_count: usize,
    /// Number of input records dropped for lacking a primary key.
    pub excluded_count: usize,
}

impl NormalizationOutput {
    pub fn output_count(&self) -> usize {
        self.records.len()
    }
}

/// Config-driven record normalizer owning its function registry.
#[derive(Default)]
pub struct Normalizer {
    registry: FunctionRegistry,
}

impl Normalizer {
    pub fn new(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn register_source<S: Source>(&mut self, name: &str, source: S) {
        self.registry.register_source(name, source);
    }

    pub fn register_mapper<M: Mapper>(&mut self, name: &str, mapper: M) {
        self.registry.register_mapper(name, mapper);
    }

    pub fn register_reducer<R: Reducer>(&mut self, name: &str, reducer: R) {
        self.registry.register_reducer(name, reducer);
    }

    pub fn register_source_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Record, &Params) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_source_fn(name, f);
    }

    pub fn register_mapper_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<Value>, &Params) -> anyhow::Result<Vec<Value>> + Send + Sync + 'static,
    {
        self.registry.register_mapper_fn(name, f);
    }

    pub fn register_reducer_fn<F>(&mut self, name: &str, f: F)
    where
        F: Fn(Vec<Value>, &Params) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_reducer_fn(name, f);
    }

    /// Merge `records` into first-normal-form records per `config`.
    ///
    /// # Errors
    ///
    /// Fails if a rule references an unregistered function, if parameters do
    /// not match a function, or if any function fails for any group.
    pub fn normalize_records(
        &self,
        records: &[Record],
        config: &NormalizationConfig,
    ) -> Result<Vec<Record>> {
        self.normalize(records, config).map(|output| output.records)
    }

    /// Like [`normalize_records`](Self::normalize_records), also reporting counts.
    pub fn normalize(
        &self,
        records: &[Record],
        config: &NormalizationConfig,
    ) -> Result<NormalizationOutput> {
        let span = info_span!("normalize", primary_key = %config.primary_key);
        let _guard = span.enter();

        info!(count = records.len(), "denormalized record count");
        let plan = NormalizationPlan::compile(&self.registry, config)?;

        info!(
            primary_key = %config.primary_key,
            primary_sources = ?config.primary_sources,
            "identifying primary key"
        );
        let grouping = group_records(records, config);

        let normalized = grouping
            .groups
            .iter()
            .map(|group| {
                debug!(
                    key = %group.key,
                    duplicates = group.records.len(),
                    "merging record"
                );
                plan.apply(&group.key, &group.records)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(count = normalized.len(), "normalized record count");
        Ok(NormalizationOutput {
            records: normalized,
            input_count: records.len(),
            excluded_count: grouping.excluded.len(),
        })
    }
}
