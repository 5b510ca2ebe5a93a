use anyhow::{bail, Context};
use clap::Args;
use num_bigint::BigInt;

const UNKNOWN: &str = "unknown";

/// Work unit handed to this worker by the orchestrator.
///
/// Every field can be given as a flag or through its environment variable. Only the batch
/// boundaries are ever interpreted, the rest is echoed back in the report.
#[derive(Args, Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    #[arg(long, env = "WORKER_ID", default_value = UNKNOWN)]
    pub worker_id: String,
    #[arg(long, env = "WORKER_INDEX", default_value = UNKNOWN)]
    pub worker_index: String,
    #[arg(long, env = "TOTAL_WORKERS", default_value = UNKNOWN)]
    pub total_workers: String,
    #[arg(long, env = "PROJECT", default_value = UNKNOWN)]
    pub project: String,
    #[arg(long, env = "BUCKET", default_value = UNKNOWN)]
    pub bucket: String,
    #[arg(long, env = "DATA_SOURCE", default_value = UNKNOWN)]
    pub data_source: String,
    #[arg(long, env = "WORKER_CONFIG", default_value = UNKNOWN)]
    pub worker_config: String,
    #[arg(long, env = "OUTPUT_PATH", default_value = UNKNOWN)]
    pub output_path: String,
    /// First item of the sub-batch (inclusive)
    #[arg(long, env = "BATCH_START", default_value = "0", allow_hyphen_values = true)]
    pub batch_start: String,
    /// End of the sub-batch (exclusive)
    #[arg(long, env = "BATCH_END", default_value = "0", allow_hyphen_values = true)]
    pub batch_end: String,
}

impl Default for Assignment {
    fn default() -> Self {
        Self {
            worker_id: UNKNOWN.into(),
            worker_index: UNKNOWN.into(),
            total_workers: UNKNOWN.into(),
            project: UNKNOWN.into(),
            bucket: UNKNOWN.into(),
            data_source: UNKNOWN.into(),
            worker_config: UNKNOWN.into(),
            output_path: UNKNOWN.into(),
            batch_start: "0".into(),
            batch_end: "0".into(),
        }
    }
}

/// Half-open item range `[start, end)` owned by one worker. Boundaries are unbounded integers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchRange {
    pub start: BigInt,
    pub end: BigInt,
}

impl BatchRange {
    /// Negative when the orchestrator hands out an inverted range. Not rejected.
    pub fn size(&self) -> BigInt {
        &self.end - &self.start
    }
}

impl Assignment {
    pub fn batch_range(&self) -> Result<BatchRange, anyhow::Error> {
        Ok(BatchRange {
            start: parse_boundary("BATCH_START", &self.batch_start)?,
            end: parse_boundary("BATCH_END", &self.batch_end)?,
        })
    }
}

// Decimal integer with optional sign and single underscores between digits, e.g. `-1_000`
fn parse_boundary(field: &str, value: &str) -> Result<BigInt, anyhow::Error> {
    let trimmed = value.trim();
    let digits = trimmed.trim_start_matches(['+', '-']);

    if digits.len() + 1 < trimmed.len()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        bail!("Invalid {} value {:?}: expected an integer", field, value);
    }

    trimmed
        .replace('_', "")
        .parse::<BigInt>()
        .with_context(|| format!("Invalid {} value {:?}: expected an integer", field, value))
}
