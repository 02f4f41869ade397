use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::init_logging;
use crate::registry::Registry;
use crate::settings::Settings;
use crate::stages::{self, Stage};

#[derive(Parser, Debug)]
#[command(name = "femm")]
#[command(about = "Build, solve and sweep FEMM models")]
pub struct Cli {
    /// Settings file
    #[arg(short, long, global = true, default_value = "femm.yaml")]
    pub config: PathBuf,

    /// Path to the data directory (default: ~/.femm/)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Close the model after the last stage instead of waiting for Enter
    #[arg(long, global = true)]
    pub no_hold: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Build the geometry and leave the pre-processor open
    Pre,
    /// Build and solve, then leave the solution open
    Solve,
    /// Build, solve and print the model's output
    Post,
    /// Sweep a registered scene on the worker pool
    Scene { name: String },
    /// List registered models and scenes
    List,
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".femm")
}

/// Parse the command line, set up logging and execute
pub fn run(registry: Registry) -> color_eyre::Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &cli.log_level)?;

    execute(&registry, &cli)
}

pub fn execute(registry: &Registry, cli: &Cli) -> color_eyre::Result<()> {
    let stage = match &cli.command {
        CliCommand::List => {
            println!("{}", listing(registry));
            return Ok(());
        }
        CliCommand::Scene { name } => {
            let settings = Settings::load(&cli.config)?;
            let report = registry.run_scene(name, &settings)?;
            println!(
                "{name}: {} instances on {} workers in {:.1}s",
                report.points,
                report.workers,
                report.elapsed.as_secs_f64()
            );
            return Ok(());
        }
        CliCommand::Pre => Stage::Pre,
        CliCommand::Solve => Stage::Solve,
        CliCommand::Post => Stage::Post,
    };

    let settings = Settings::load(&cli.config)?;
    run_model(registry, &settings, stage, !cli.no_hold)
}

/// Run the settings' model up to `stage`, optionally wait for the user, then
/// close it. The model is closed even when a stage fails.
fn run_model(
    registry: &Registry,
    settings: &Settings,
    stage: Stage,
    hold: bool,
) -> color_eyre::Result<()> {
    let mut model = registry.model(&settings.model, settings)?;
    tracing::info!(model = %settings.model, ?stage, "running model");

    let outcome = stages::run_stages(model.as_mut(), stage);
    if let Ok(Some(output)) = &outcome {
        println!("{output}");
    }
    if outcome.is_ok() && hold {
        println!("Press Enter to close the model.");
        stages::hold(std::io::stdin().lock(), stage.stop_message())?;
    }

    let closed = model.close();
    outcome?;
    closed?;
    Ok(())
}

fn listing(registry: &Registry) -> String {
    let mut out = String::from("Models:");
    for name in registry.model_names() {
        out.push_str("\n  ");
        out.push_str(name);
    }
    out.push_str("\nScenes:");
    for name in registry.scene_names() {
        out.push_str("\n  ");
        out.push_str(name);
    }
    out
}
