use std::path::PathBuf;
use std::time::Duration;

/// Outcome of a `normalize` command.
#[derive(Debug)]
pub struct NormalizeResult {
    pub input: PathBuf,
    pub config: PathBuf,
    /// `None` when the records were written to standard output.
    pub output: Option<PathBuf>,
    pub field_count: usize,
    pub input_count: usize,
    pub excluded_count: usize,
    pub output_count: usize,
    pub elapsed: Duration,
}
