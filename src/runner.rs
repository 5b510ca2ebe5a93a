use std::{fmt, io::Write, thread::sleep, time::Duration};

use anyhow::Context;
use itertools::Itertools;
use num_bigint::BigInt;
use num_integer::Integer;

use crate::{
    assignment::{Assignment, BatchRange},
    config::Simulation,
};

/// Number of progress reports per sub-batch
pub const STEPS: usize = 5;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// One slice `[start, end)` of a worker's sub-batch. `number` is 1-based.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    pub number: usize,
    pub start: BigInt,
    pub end: BigInt,
}

/// Split `range` into `STEPS` consecutive slices using floor division. The last slice absorbs
/// the remainder.
pub fn steps(range: &BatchRange) -> Vec<Step> {
    let size = range.size();
    let steps = BigInt::from(STEPS);

    (0..=STEPS)
        .map(|i| &range.start + (BigInt::from(i) * &size).div_floor(&steps))
        .tuple_windows()
        .enumerate()
        .map(|(i, (start, end))| Step {
            number: i + 1,
            start,
            end,
        })
        .collect()
}

/// Stand-in for the real per-step workload
pub trait StepWork {
    fn startup(&mut self) {}
    fn step(&mut self, step: &Step);
}

/// Blocks the thread for fixed delays
#[derive(Clone, Copy, Debug)]
pub struct Simulated {
    startup: Duration,
    step: Duration,
}

impl From<&Simulation> for Simulated {
    fn from(value: &Simulation) -> Self {
        Self {
            startup: value.startup_delay(),
            step: value.step_delay(),
        }
    }
}

impl StepWork for Simulated {
    fn startup(&mut self) {
        if !self.startup.is_zero() {
            sleep(self.startup);
        }
    }

    fn step(&mut self, _step: &Step) {
        if !self.step.is_zero() {
            sleep(self.step);
        }
    }
}

pub struct Runner<W, S> {
    out: W,
    work: S,
}

impl<W, S> Runner<W, S>
where
    W: Write,
    S: StepWork,
{
    pub fn new(out: W, work: S) -> Self {
        Self { out, work }
    }

    /// Report on and simulate the whole sub-batch. Fails before writing anything if the batch
    /// boundaries don't parse.
    pub fn run(&mut self, assignment: &Assignment) -> Result<(), anyhow::Error> {
        let range = assignment.batch_range()?;

        tracing::debug!(
            worker_id = %assignment.worker_id,
            worker_index = %assignment.worker_index,
            start = %range.start,
            end = %range.end,
            "Starting worker",
        );

        self.work.startup();

        let a = assignment;
        self.line(format_args!("🚀 TaskFly Example Worker Starting!"))?;
        self.line(format_args!("{}", RULE))?;
        self.line(format_args!("Worker ID: {}", a.worker_id))?;
        self.line(format_args!("Worker Index: {}/{}", a.worker_index, a.total_workers))?;
        self.line(format_args!("Project: {}", a.project))?;
        self.line(format_args!("S3 Bucket: {}", a.bucket))?;
        self.line(format_args!("Data Source: {}", a.data_source))?;
        self.line(format_args!("Worker Config: {}", a.worker_config))?;
        self.line(format_args!("Output Path: {}", a.output_path))?;
        self.line(format_args!("Batch Range: {} - {}", a.batch_start, a.batch_end))?;
        self.line(format_args!("{}", RULE))?;
        self.line(format_args!(
            "📊 Processing {} items in this batch...",
            range.size()
        ))?;

        for step in steps(&range) {
            self.line(format_args!(
                "Worker {}: Processing step {}/{} (items {} - {})...",
                a.worker_index, step.number, STEPS, step.start, step.end
            ))?;
            tracing::debug!(step = step.number, "Simulating step");
            self.work.step(&step);
        }

        self.line(format_args!(
            "✅ Worker {}: Task completed successfully!",
            a.worker_index
        ))?;
        self.line(format_args!("📤 Results saved to: {}", a.output_path))?;

        tracing::debug!(worker_id = %a.worker_id, "Worker finished");
        Ok(())
    }

    // Flush every line so the orchestrator sees progress as it happens
    fn line(&mut self, args: fmt::Arguments<'_>) -> Result<(), anyhow::Error> {
        writeln!(self.out, "{}", args)
            .and_then(|_| self.out.flush())
            .context("Couldn't write progress report")
    }
}
