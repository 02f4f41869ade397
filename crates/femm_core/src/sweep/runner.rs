//! Sweep orchestrator: dispatches one unit of work per grid point on a worker
//! pool and assembles the results in grid order.
//!
//! A 1D sweep is a single batch of `n` units. A 2D sweep runs `n` batches,
//! one per row, strictly in sequence; row `i + 1` is dispatched only after
//! row `i` is fully collected. Results inside a batch keep input order
//! whatever order the workers finish in.
//!
//! Error policy is all-or-nothing: the first failing unit aborts its batch
//! and the whole sweep. Units already running are left to finish; their
//! results are discarded.

use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{FemmError, SweepError};

use super::{GridPoint, ResultGrid, SweepConfig, SweepMode, line_points, row_points};

/// Fixed-size pool that maps units of work over a batch of points
pub struct WorkerPool {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, SweepError> {
        if workers == 0 {
            return Err(SweepError::Config(
                "worker count must be greater than zero".to_string(),
            ));
        }
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("femm-worker-{i}"))
            .build()?;

        Ok(Self {
            #[cfg(feature = "parallel")]
            pool,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `unit` for every point and return results in the order of
    /// `points`. Blocks until the batch completes or a unit fails.
    pub fn map_ordered<R, F>(&self, points: &[GridPoint], unit: &F) -> Result<Vec<R>, SweepError>
    where
        R: Send,
        F: Fn(GridPoint) -> Result<R, FemmError> + Sync,
    {
        let run = |point: &GridPoint| {
            unit(*point).map_err(|source| SweepError::Unit {
                point: *point,
                source,
            })
        };

        #[cfg(feature = "parallel")]
        let results = self.pool.install(|| points.par_iter().map(run).collect());

        #[cfg(not(feature = "parallel"))]
        let results = points.iter().map(run).collect();

        results
    }
}

/// An assembled grid and the time spent producing it
#[derive(Debug, Clone)]
pub struct SweepOutcome<R> {
    pub grid: ResultGrid<R>,
    /// Wall-clock time of dispatch and collection
    pub elapsed: Duration,
}

/// Summary of a finished sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub mode: SweepMode,
    pub points: usize,
    pub workers: usize,
    /// Wall-clock time of dispatch and collection, excluding the consumer
    pub elapsed: Duration,
}

/// Run `unit` over the grid described by `config`.
///
/// The config is validated before anything is dispatched.
pub fn sweep<R, F>(config: &SweepConfig, unit: F) -> Result<SweepOutcome<R>, SweepError>
where
    R: Send,
    F: Fn(GridPoint) -> Result<R, FemmError> + Sync,
{
    config.validate()?;
    let pool = WorkerPool::new(config.workers)?;
    let n = config.iterations;

    tracing::info!(
        mode = %config.mode,
        points = config.total_points(),
        workers = pool.workers(),
        "sweep started"
    );

    let start = Instant::now();
    let grid = match config.mode {
        SweepMode::OneD => ResultGrid::Line(pool.map_ordered(&line_points(n), &unit)?),
        SweepMode::TwoD => {
            let mut rows = Vec::with_capacity(n);
            for x in 0..n {
                rows.push(pool.map_ordered(&row_points(x, n), &unit)?);
                tracing::debug!(row = x, of = n, "sweep row collected");
            }
            ResultGrid::Plane(rows)
        }
    };
    let elapsed = start.elapsed();

    tracing::info!(elapsed_secs = elapsed.as_secs_f64(), "sweep finished");
    Ok(SweepOutcome { grid, elapsed })
}

/// Run a sweep and hand the finished grid to `consumer` exactly once
pub fn sweep_into<R, F, C>(
    config: &SweepConfig,
    unit: F,
    consumer: C,
) -> Result<SweepReport, SweepError>
where
    R: Send,
    F: Fn(GridPoint) -> Result<R, FemmError> + Sync,
    C: FnOnce(ResultGrid<R>) -> Result<(), FemmError>,
{
    let outcome = sweep(config, unit)?;
    let report = SweepReport {
        mode: config.mode,
        points: outcome.grid.len(),
        workers: config.workers,
        elapsed: outcome.elapsed,
    };
    consumer(outcome.grid).map_err(SweepError::Consumer)?;
    Ok(report)
}
