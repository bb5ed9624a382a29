//! File input and output for record normalization.
//!
//! - **input**: read a JSON array of records and a JSON or TOML config
//! - **output**: write normalized records as JSON

pub mod error;
pub mod input;
pub mod output;

pub use error::{IngestError, Result};
pub use input::{ConfigFormat, load_config, load_records, parse_config, parse_records};
pub use output::{to_json_string, write_records};
