//! Name → constructor tables for models and scenes, filled in at startup.

use std::collections::BTreeMap;
use std::fmt::Debug;

use femm_core::sweep::SweepReport;
use femm_core::{FemmError, GridPoint, Model, Scene, SceneRunner, SweepError};

use crate::settings::Settings;

/// Object-safe view of a [`Model`] whose output is rendered for display
pub trait StagedModel {
    fn start(&mut self) -> Result<(), FemmError>;
    fn pre(&mut self, point: GridPoint) -> Result<(), FemmError>;
    fn solve(&mut self) -> Result<(), FemmError>;
    fn post(&mut self) -> Result<String, FemmError>;
    fn close(&mut self) -> Result<(), FemmError>;
}

impl<M> StagedModel for M
where
    M: Model,
    M::Output: Debug,
{
    fn start(&mut self) -> Result<(), FemmError> {
        Model::start(self)
    }

    fn pre(&mut self, point: GridPoint) -> Result<(), FemmError> {
        Model::pre(self, point)
    }

    fn solve(&mut self) -> Result<(), FemmError> {
        Model::solve(self)
    }

    fn post(&mut self) -> Result<String, FemmError> {
        Model::post(self).map(|output| format!("{output:#?}"))
    }

    fn close(&mut self) -> Result<(), FemmError> {
        Model::close(self)
    }
}

type ModelFactory = Box<dyn Fn(&Settings) -> Box<dyn StagedModel>>;
type SceneLauncher = Box<dyn Fn(&Settings) -> Result<SweepReport, SweepError>>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no model named `{name}` (known: {known})")]
    UnknownModel { name: String, known: String },
    #[error("no scene named `{name}` (known: {known})")]
    UnknownScene { name: String, known: String },
}

#[derive(Default)]
pub struct Registry {
    models: BTreeMap<String, ModelFactory>,
    scenes: BTreeMap<String, SceneLauncher>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_model<M, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        M: Model + 'static,
        M::Output: Debug,
        F: Fn(&Settings) -> M + 'static,
    {
        self.models.insert(
            name.to_string(),
            Box::new(move |settings: &Settings| -> Box<dyn StagedModel> {
                Box::new(factory(settings))
            }),
        );
        self
    }

    /// Register a scene; it is built and swept when launched
    pub fn register_scene<S, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        S: Scene + 'static,
        F: Fn(&Settings) -> S + 'static,
    {
        self.scenes.insert(
            name.to_string(),
            Box::new(move |settings: &Settings| {
                let scene = factory(settings);
                let mut runner = SceneRunner::new();
                if let Some(workers) = settings.workers {
                    runner = runner.with_workers(workers);
                }
                runner.start(&scene)
            }),
        );
        self
    }

    pub fn model(
        &self,
        name: &str,
        settings: &Settings,
    ) -> Result<Box<dyn StagedModel>, RegistryError> {
        let factory = self
            .models
            .get(name)
            .ok_or_else(|| RegistryError::UnknownModel {
                name: name.to_string(),
                known: join_names(self.model_names()),
            })?;
        Ok(factory(settings))
    }

    /// Build and sweep the scene registered as `name`
    pub fn run_scene(&self, name: &str, settings: &Settings) -> color_eyre::Result<SweepReport> {
        let launcher = self
            .scenes
            .get(name)
            .ok_or_else(|| RegistryError::UnknownScene {
                name: name.to_string(),
                known: join_names(self.scene_names()),
            })?;
        Ok(launcher(settings)?)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
