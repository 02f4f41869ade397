//! Command-line front end for `femm_core`: settings, model and scene
//! registry, logging and interactive stage runs.

pub mod cli;
pub mod demo;
pub mod logging;
pub mod registry;
pub mod settings;
pub mod stages;

pub use cli::run;
pub use logging::init_logging;
pub use registry::Registry;
pub use settings::Settings;
