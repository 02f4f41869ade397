//! Configuration types for parameter sweeps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Number of free variables in a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SweepMode {
    /// First variable varies, second is fixed at 0
    OneD,
    /// Both variables vary over an N×N grid
    TwoD,
}

impl SweepMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            SweepMode::OneD => "1d",
            SweepMode::TwoD => "2d",
        }
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SweepMode {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(SweepMode::OneD),
            "2d" => Ok(SweepMode::TwoD),
            _ => Err(SweepError::Config(format!(
                "sweep mode must be `1d` or `2d`, got `{s}`"
            ))),
        }
    }
}

impl TryFrom<String> for SweepMode {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SweepMode> for String {
    fn from(mode: SweepMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Configuration for a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub mode: SweepMode,
    /// Steps per variable
    pub iterations: usize,
    /// Worker pool size (defaults to CPU count)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl SweepConfig {
    pub fn new(mode: SweepMode, iterations: usize) -> Self {
        Self {
            mode,
            iterations,
            workers: default_workers(),
        }
    }

    /// Parse a mode name such as `"2D"` and build a config
    pub fn parse(mode: &str, iterations: usize) -> Result<Self, SweepError> {
        let config = Self::new(mode.parse()?, iterations);
        config.validate()?;
        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.iterations == 0 {
            return Err(SweepError::Config(
                "iteration count must be greater than zero".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(SweepError::Config(
                "worker count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of units of work
    pub fn total_points(&self) -> usize {
        match self.mode {
            SweepMode::OneD => self.iterations,
            SweepMode::TwoD => self.iterations * self.iterations,
        }
    }
}
