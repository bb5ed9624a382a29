//! Data model for record normalization.
//!
//! - **value**: record type and JSON value helpers (blank, equality, ordering)
//! - **config**: declarative [`NormalizationConfig`] and [`FieldRule`]s
//! - **params**: typed parameters for the built-in functions

pub mod config;
pub mod params;
pub mod value;

pub use config::{FieldRule, FieldRules, FunctionRef, NormalizationConfig, Params};
pub use value::{Record, compare_values, display_string, field_value, is_blank, is_missing, strict_equals};
