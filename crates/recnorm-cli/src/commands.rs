use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{Level, info, info_span, trace};

use recnorm_core::{FunctionRegistry, Normalizer};
use recnorm_ingest::{load_config, load_records, to_json_string, write_records};

use crate::cli::NormalizeArgs;
use crate::logging::redact_value;
use crate::summary::functions_table;
use crate::types::NormalizeResult;

pub fn run_functions(registry: &FunctionRegistry) -> Result<()> {
    println!("{}", functions_table(registry));
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeResult> {
    run_normalize_with(&Normalizer::default(), args)
}

/// Run `normalize` with a caller-supplied normalizer.
pub fn run_normalize_with(normalizer: &Normalizer, args: &NormalizeArgs) -> Result<NormalizeResult> {
    let span = info_span!("run", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let config = load_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    let records = load_records(&args.input)
        .with_context(|| format!("load records {}", args.input.display()))?;

    let output = normalizer
        .normalize(&records, &config)
        .context("normalize records")?;

    if tracing::enabled!(Level::TRACE) {
        for record in &output.records {
            let rendered = serde_json::to_string(record).unwrap_or_default();
            trace!(record = redact_value(&rendered), "normalized record");
        }
    }

    match &args.output {
        Some(path) => {
            write_records(path, &output.records, args.pretty)
                .with_context(|| format!("write output {}", path.display()))?;
            info!(path = %path.display(), count = output.output_count(), "wrote records");
        }
        None => {
            let json = to_json_string(&output.records, args.pretty).context("serialize output")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("write standard output")?;
        }
    }

    Ok(NormalizeResult {
        input: args.input.clone(),
        config: args.config.clone(),
        output: args.output.clone(),
        field_count: config.field_rules.active().count(),
        input_count: output.input_count,
        excluded_count: output.excluded_count,
        output_count: output.output_count(),
        elapsed: start.elapsed(),
    })
}
