//! Writing normalized records.

use std::fs;
use std::path::Path;

use recnorm_model::Record;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Serialize records as a JSON array.
pub fn to_json_string(records: &[Record], pretty: bool) -> Result<String> {
    let serialized = if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    };
    serialized.map_err(IngestError::Serialize)
}

/// Write records as a JSON array to `path`, replacing any existing file.
pub fn write_records(path: &Path, records: &[Record], pretty: bool) -> Result<()> {
    let json = to_json_string(records, pretty)?;
    fs::write(path, json).map_err(|source| IngestError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = records.len(), "wrote normalized records");
    Ok(())
}
