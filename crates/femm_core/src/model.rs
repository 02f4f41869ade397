//! Simulation models and their lifecycle.

use crate::error::Result;
use crate::sweep::GridPoint;

/// A simulation that opens its own engine session.
///
/// A model must not depend on state from whoever dispatches it: sweeps build
/// one model per unit of work, possibly on another thread.
pub trait Model {
    type Output;

    /// Open a session
    fn start(&mut self) -> Result<()>;

    /// Build the geometry for the sweep coordinates `point`
    fn pre(&mut self, point: GridPoint) -> Result<()>;

    fn solve(&mut self) -> Result<()>;

    fn post(&mut self) -> Result<Self::Output>;

    /// Close the document and release the session
    fn close(&mut self) -> Result<()>;
}

/// Drive `model` from start to post, then close it.
///
/// `close` is attempted even when an earlier stage failed; the first error
/// is the one returned.
pub fn run_unit<M: Model>(mut model: M, point: GridPoint) -> Result<M::Output> {
    let outcome = drive(&mut model, point);
    let closed = model.close();
    match (outcome, closed) {
        (Ok(output), Ok(())) => Ok(output),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!("closing model after failure also failed: {close_err}");
            }
            Err(e)
        }
        (Ok(_), Err(e)) => Err(e),
    }
}

fn drive<M: Model>(model: &mut M, point: GridPoint) -> Result<M::Output> {
    model.start()?;
    model.pre(point)?;
    model.solve()?;
    model.post()
}
