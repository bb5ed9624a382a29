use serde_json::Value;
use thiserror::Error;

use crate::kinds::Stage;

/// Errors raised by a normalization run. Any error aborts the whole run.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A field rule references a function that is not registered.
    #[error(
        "could not find {stage} `{name}` for field `{field}`; registered {stage}s: {}",
        registered.join(", ")
    )]
    UnknownFunction {
        stage: Stage,
        field: String,
        name: String,
        registered: Vec<String>,
    },

    /// The parameters configured for a function do not match what it expects.
    #[error("invalid parameters for {stage} `{name}` on field `{field}`")]
    InvalidParams {
        stage: Stage,
        field: String,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A registered function failed while processing a group.
    #[error("{} failed for primaryKey {primary_key} field `{field}` ({rule})", stage_verb(*stage))]
    Stage {
        primary_key: Value,
        field: String,
        stage: Stage,
        rule: String,
        #[source]
        source: anyhow::Error,
    },
}

fn stage_verb(stage: Stage) -> &'static str {
    match stage {
        Stage::Source => "getting values",
        Stage::Mapper => "mapping values",
        Stage::Reducer => "reducing values",
    }
}

impl NormalizeError {
    /// The field whose rule caused the error.
    pub fn field(&self) -> &str {
        match self {
            Self::UnknownFunction { field, .. }
            | Self::InvalidParams { field, .. }
            | Self::Stage { field, .. } => field,
        }
    }

    /// The stage the error is attributed to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnknownFunction { stage, .. }
            | Self::InvalidParams { stage, .. }
            | Self::Stage { stage, .. } => *stage,
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
