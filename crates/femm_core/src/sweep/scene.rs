use crate::error::{FemmError, SweepError};

use super::{GridPoint, ResultGrid, SweepConfig, SweepReport, sweep_into};

/// A parametric study: one simulation per grid point plus a way to present
/// the assembled results.
///
/// `run` is called concurrently from worker threads. Each call must build
/// and own its model and session; nothing is shared between calls.
pub trait Scene: Sync {
    type Output: Send;

    /// `"1d"` or `"2d"`, case-insensitive
    fn mode(&self) -> &str;

    /// Steps per variable
    fn iterations(&self) -> usize;

    fn run(&self, point: GridPoint) -> Result<Self::Output, FemmError>;

    /// Receives the complete grid once the sweep has finished
    fn display_results(&self, results: ResultGrid<Self::Output>) -> Result<(), FemmError>;

    /// Value of a variable at step `index` when stepping from `start`
    /// towards `end` in `iterations` equal increments
    fn vary(&self, start: f64, end: f64, index: usize) -> f64 {
        let increment = (end - start) / self.iterations() as f64;
        start + index as f64 * increment
    }

    /// `iterations` evenly spaced samples from `start` to `end` inclusive
    fn axis(&self, start: f64, end: f64) -> Vec<f64> {
        linspace(start, end, self.iterations())
    }
}

pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Runs scenes on a worker pool
#[derive(Debug, Clone, Default)]
pub struct SceneRunner {
    workers: Option<usize>,
}

impl SceneRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the pool size (defaults to CPU count)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sweep `scene` and pass the results to its `display_results`.
    ///
    /// An unknown mode or a zero iteration count fails before any unit of
    /// work is dispatched.
    pub fn start<S: Scene>(&self, scene: &S) -> Result<SweepReport, SweepError> {
        let mut config = SweepConfig::parse(scene.mode(), scene.iterations())?;
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }

        tracing::info!(
            "Running scene with {} instances on {} workers",
            config.total_points(),
            config.workers
        );

        let report = sweep_into(
            &config,
            |point| scene.run(point),
            |grid| {
                tracing::info!("Displaying results");
                scene.display_results(grid)
            },
        )?;

        tracing::info!("Finished in {:.0} seconds", report.elapsed.as_secs_f64());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
