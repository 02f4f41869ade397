//! Scripting bridge for the FEMM finite-element engine
//!
//! This crate drives an external engine over its textual command protocol
//! and runs parametric sweeps of whole simulations in parallel:
//! - Command codec (call-expression encoding, literal reply decoding)
//! - Sessions that track the active problem domain and prefix commands
//! - Pre- and post-processor command sets
//! - A model lifecycle (start, pre, solve, post, close)
//! - 1D/2D sweeps on a worker pool with grid-ordered results
//!
//! # Example
//!
//! ```ignore
//! use femm_core::{Doctype, EngineConfig, Point};
//!
//! let mut session = EngineConfig::new("femm-bridge").connect()?;
//! session.new_document(Doctype::Magnetics)?;
//! session.pre().draw_rectangle(Point::new(0.0, 0.0), Point::new(10.0, 5.0), None)?;
//! session.pre().analyze(true)?;
//! session.pre().load_solution()?;
//! let b = session.post().get_point_values(Point::new(5.0, 2.5))?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod api;
pub mod doctype;
pub mod error;
pub mod model;
pub mod protocol;
pub mod session;
pub mod sweep;
pub mod transport;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use api::{Point, Postprocessor, Preprocessor};
pub use doctype::Doctype;
pub use error::{FemmError, Result, SweepError, TransportError};
pub use model::{Model, run_unit};
pub use protocol::{Arg, Command, Response, Value};
pub use session::Session;
pub use sweep::{GridPoint, ResultGrid, Scene, SceneRunner, SweepConfig, SweepMode};
pub use transport::{EngineConfig, ProcessTransport, Transport};
