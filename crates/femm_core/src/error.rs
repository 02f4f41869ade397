use std::path::PathBuf;

use crate::sweep::GridPoint;

/// Errors raised while talking to the engine bridge process
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to spawn engine bridge `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine bridge closed its output stream")]
    Closed,
    #[error("engine bridge I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the command bridge and the model lifecycle
#[derive(Debug, thiserror::Error)]
pub enum FemmError {
    /// The engine answered with its error sentinel; carries the raw reply
    #[error("engine error: {0}")]
    Engine(String),
    /// A domain-scoped command was issued before any document was created
    #[error("no problem domain is active; create a document first")]
    ModeUnset,
    #[error("unknown problem domain `{0}`")]
    UnknownDoctype(String),
    #[error("configuration error: {0}")]
    Config(String),
    /// Failure reported by a user model or scene
    #[error("{0}")]
    Model(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FemmError {
    pub fn model(msg: impl Into<String>) -> Self {
        FemmError::Model(msg.into())
    }
}

/// Errors produced by the sweep orchestrator
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Invalid sweep settings; raised before anything is dispatched
    #[error("configuration error: {0}")]
    Config(String),
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    /// A unit of work failed and aborted its batch
    #[error("unit of work at ({}, {}) failed: {source}", point.x, point.y)]
    Unit {
        point: GridPoint,
        #[source]
        source: FemmError,
    },
    /// The result consumer failed after the grid was assembled
    #[error("result consumer failed: {0}")]
    Consumer(#[source] FemmError),
}

pub type Result<T> = std::result::Result<T, FemmError>;
