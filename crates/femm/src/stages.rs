//! Running a model interactively, one stage at a time.

use std::io::BufRead;

use femm_core::{FemmError, GridPoint};

use crate::registry::StagedModel;

/// Last stage to run before handing the engine over to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pre,
    Solve,
    Post,
}

impl Stage {
    pub fn stop_message(self) -> &'static str {
        match self {
            Stage::Pre => "Preprocessor stopped.",
            Stage::Solve => "Solver view closed.",
            Stage::Post => "Postprocessor stopped.",
        }
    }
}

/// Start `model` and run it through every stage up to and including `last`.
///
/// Only the post stage produces output. The model is left open so the engine
/// window stays up; closing it is the caller's job.
pub fn run_stages(model: &mut dyn StagedModel, last: Stage) -> Result<Option<String>, FemmError> {
    tracing::info!("Running preprocessor...");
    model.start()?;
    model.pre(GridPoint::ORIGIN)?;
    if last == Stage::Pre {
        return Ok(None);
    }

    tracing::info!("Running solver...");
    model.solve()?;
    if last == Stage::Solve {
        return Ok(None);
    }

    tracing::info!("Running postprocessor...");
    model.post().map(Some)
}

/// Block until a line (or end of input) arrives on `input`
pub fn hold(mut input: impl BufRead, stop_message: &str) -> std::io::Result<()> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    tracing::info!("{stop_message}");
    Ok(())
}
