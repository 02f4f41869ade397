//! Parameter sweeps over one or two free variables.
//!
//! A sweep calls a unit of work once per grid point on a pool of workers
//! and returns the results in grid order:
//!
//! ```ignore
//! use femm_core::sweep::{SweepConfig, sweep};
//!
//! let config = SweepConfig::parse("2d", 10)?;
//! let outcome = sweep(&config, |point| {
//!     let model = CoilModel::new(&engine, point);
//!     femm_core::run_unit(model, point)
//! })?;
//! ```
//!
//! Units of work run on separate threads and each must open its own engine
//! session; sessions are never passed between workers.

mod config;
mod grid;
mod runner;
mod scene;

pub use config::*;
pub use grid::*;
pub use runner::*;
pub use scene::*;
