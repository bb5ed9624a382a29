//! Value sources: extract one raw value from one record.
//!
//! Sources are pure reads. A field that does not exist yields `null`, which
//! downstream mappers and reducers treat as blank.

use anyhow::Result;
use recnorm_model::params::{AlternateValueParams, GetValueParams};
use recnorm_model::{Params, Record, field_value, is_blank, strict_equals};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A function extracting a value from a single record.
///
/// # Example
///
/// ```
/// use recnorm_core::sources::Source;
/// use recnorm_model::Record;
/// use serde::Deserialize;
/// use serde_json::Value;
///
/// #[derive(Deserialize)]
/// struct UpperParams {
///     field: String,
/// }
///
/// struct Upper;
///
/// impl Source for Upper {
///     type Params = UpperParams;
///
///     fn extract(&self, record: &Record, params: &UpperParams) -> anyhow::Result<Value> {
///         Ok(match record.get(&params.field) {
///             Some(Value::String(s)) => Value::String(s.to_uppercase()),
///             other => other.cloned().unwrap_or(Value::Null),
///         })
///     }
/// }
/// ```
pub trait Source: Send + Sync + 'static {
    /// Parameters deserialized from the configuration when a plan is compiled.
    type Params: DeserializeOwned + Send + Sync + 'static;

    fn extract(&self, record: &Record, params: &Self::Params) -> Result<Value>;
}

/// A source with its parameters bound, ready to run against records.
pub type PreparedSource<'a> = Box<dyn Fn(&Record) -> Result<Value> + Send + Sync + 'a>;

/// Object-safe view of a [`Source`] stored in the registry.
pub trait SourceEntry: Send + Sync {
    /// Deserialize `params` and bind them to this source.
    fn prepare(&self, params: Params) -> Result<PreparedSource<'_>, serde_json::Error>;
}

impl<S: Source> SourceEntry for S {
    fn prepare(&self, params: Params) -> Result<PreparedSource<'_>, serde_json::Error> {
        let params: S::Params = serde_json::from_value(Value::Object(params))?;
        Ok(Box::new(move |record: &Record| self.extract(record, &params)))
    }
}

/// Returns `record[field]`, or `record[fallbackField]` when that is blank.
pub struct GetValue;

impl Source for GetValue {
    type Params = GetValueParams;

    fn extract(&self, record: &Record, params: &GetValueParams) -> Result<Value> {
        let value = field_value(record, &params.field);
        match &params.fallback_field {
            Some(fallback) if is_blank(&value) => Ok(field_value(record, fallback)),
            _ => Ok(value),
        }
    }
}

/// Returns `record[alternateField]` when `record[testField]` strictly equals
/// `testValue`, otherwise `record[defaultField]`.
pub struct AlternateValue;

impl Source for AlternateValue {
    type Params = AlternateValueParams;

    fn extract(&self, record: &Record, params: &AlternateValueParams) -> Result<Value> {
        let test = field_value(record, &params.test_field);
        let field = if strict_equals(&test, &params.test_value) {
            &params.alternate_field
        } else {
            &params.default_field
        };
        Ok(field_value(record, field))
    }
}

/// Adapts a closure over raw parameters to the [`Source`] trait.
pub struct FnSource<F>(pub F);

impl<F> Source for FnSource<F>
where
    F: Fn(&Record, &Params) -> Result<Value> + Send + Sync + 'static,
{
    type Params = Params;

    fn extract(&self, record: &Record, params: &Params) -> Result<Value> {
        (self.0)(record, params)
    }
}
