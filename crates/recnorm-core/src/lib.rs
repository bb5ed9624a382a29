//! Config-driven normalization of denormalized records.
//!
//! Records sharing a derived primary key are merged into one record. Each
//! output field is produced by a three-stage pipeline:
//!
//! - **sources**: extract a raw value from every record in the group
//! - **mappers**: filter or transform the extracted values
//! - **reducers**: condense the values into the field's output value
//!
//! Functions are looked up by name in a [`FunctionRegistry`] seeded with the
//! built-ins and open to custom registrations.
//!
//! # Example
//!
//! ```
//! use recnorm_core::Normalizer;
//! use recnorm_model::{FieldRule, NormalizationConfig, Record};
//! use serde_json::json;
//!
//! let records: Vec<Record> = serde_json::from_value(json!([
//!     {"id": 1, "value": 3},
//!     {"id": 1, "value": 4}
//! ])).unwrap();
//! let config = NormalizationConfig::new("id", ["id"])
//!     .with_rule("id", FieldRule::new("first"))
//!     .with_rule("value", FieldRule::new("unique"));
//!
//! let normalized = Normalizer::default().normalize_records(&records, &config).unwrap();
//! assert_eq!(normalized.len(), 1);
//! assert_eq!(normalized[0]["value"], json!([3, 4]));
//! ```

pub mod engine;
pub mod error;
pub mod grouping;
pub mod kinds;
pub mod mappers;
pub mod plan;
pub mod reducers;
pub mod registry;
pub mod sources;

pub use engine::{NormalizationOutput, Normalizer};
pub use error::{NormalizeError, Result};
pub use kinds::{MapperKind, ReducerKind, SourceKind, Stage};
pub use registry::FunctionRegistry;
