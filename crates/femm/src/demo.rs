//! Built-in axisymmetric air-core coil, usable as `model: Coil` and as the
//! `CoilSweep` scene.

use femm_core::api::{BlockProps, CircuitType, LengthUnit, ProblemDefinition, ProblemType};
use femm_core::{
    EngineConfig, FemmError, GridPoint, Model, Point, ProcessTransport, Result, ResultGrid, Scene,
    Session, Transport, run_unit,
};

use crate::registry::Registry;
use crate::settings::Settings;

const CIRCUIT: &str = "coil";
const WIRE: &str = "18 AWG";

/// Coil cross-section in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilGeometry {
    pub inner_radius: f64,
    pub width: f64,
    pub height: f64,
    pub turns: i64,
    /// Amperes
    pub current: f64,
}

impl Default for CoilGeometry {
    fn default() -> Self {
        Self {
            inner_radius: 10.0,
            width: 5.0,
            height: 20.0,
            turns: 100,
            current: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilReading {
    /// Webers
    pub flux_linkage: f64,
    /// Henries
    pub inductance: f64,
}

type Connector<T> = Box<dyn Fn() -> Result<Session<T>>>;

pub struct CoilModel<T: Transport = ProcessTransport> {
    geometry: CoilGeometry,
    connect: Connector<T>,
    session: Option<Session<T>>,
}

impl CoilModel {
    pub fn new(engine: EngineConfig, geometry: CoilGeometry) -> Self {
        Self::with_connector(geometry, move || engine.connect())
    }
}

impl<T: Transport> CoilModel<T> {
    pub fn with_connector(
        geometry: CoilGeometry,
        connect: impl Fn() -> Result<Session<T>> + 'static,
    ) -> Self {
        Self {
            geometry,
            connect: Box::new(connect),
            session: None,
        }
    }

    fn session(&mut self) -> Result<&mut Session<T>> {
        self.session
            .as_mut()
            .ok_or_else(|| FemmError::model("coil model used before start"))
    }
}

impl<T: Transport> Model for CoilModel<T> {
    type Output = CoilReading;

    fn start(&mut self) -> Result<()> {
        self.session = Some((self.connect)()?);
        Ok(())
    }

    /// Geometry is fixed when the model is built; `point` is not used
    fn pre(&mut self, _point: GridPoint) -> Result<()> {
        let g = self.geometry;
        let session = self.session()?;
        session.new_document("magnetics")?;

        let mut pre = session.pre();
        pre.problem_definition(&ProblemDefinition {
            frequency: Some(0.0),
            units: Some(LengthUnit::Millimeters),
            problem_type: Some(ProblemType::Axi),
            precision: Some(1e-8),
            depth: Some(0.0),
            minimum_angle: Some(30.0),
            ac_solver: None,
        })?;
        pre.get_material("Air")?;
        pre.get_material(WIRE)?;
        pre.add_circuit_prop(CIRCUIT, g.current, CircuitType::Series)?;

        let bottom = Point::new(g.inner_radius, -g.height / 2.0);
        let top = Point::new(g.inner_radius + g.width, g.height / 2.0);
        pre.draw_rectangle(bottom, top, None)?;

        pre.add_block_label(
            bottom.midpoint(top),
            Some(&BlockProps {
                block_name: Some(WIRE.to_string()),
                auto_mesh: true,
                in_circuit: Some(CIRCUIT.to_string()),
                turns: Some(g.turns),
                ..Default::default()
            }),
        )?;
        pre.add_block_label(
            Point::new(g.inner_radius / 2.0, g.height),
            Some(&BlockProps {
                block_name: Some("Air".to_string()),
                auto_mesh: true,
                ..Default::default()
            }),
        )?;

        pre.make_abc(None)?;
        pre.zoom_natural()
    }

    fn solve(&mut self) -> Result<()> {
        let mut pre = self.session()?.pre();
        pre.analyze(true)?;
        pre.load_solution()
    }

    fn post(&mut self) -> Result<CoilReading> {
        let session = self.session()?;
        // (current, voltage, flux linkage)
        let props = session
            .call("o_getcircuitproperties", &[CIRCUIT.into()], true)?
            .to_f64_vec();
        let (current, flux_linkage) = match props.as_slice() {
            [current, _, flux, ..] => (*current, *flux),
            _ => {
                return Err(FemmError::model(format!(
                    "unexpected circuit properties {props:?}"
                )));
            }
        };
        let inductance = if current == 0.0 {
            0.0
        } else {
            flux_linkage / current
        };
        Ok(CoilReading {
            flux_linkage,
            inductance,
        })
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            session.pre().close()?;
        }
        Ok(())
    }
}

/// Inductance over inner radius (rows) and current (columns)
pub struct CoilSweep {
    engine: EngineConfig,
    iterations: usize,
}

impl CoilSweep {
    const RADIUS_MM: (f64, f64) = (5.0, 25.0);
    const CURRENT_A: (f64, f64) = (1.0, 10.0);

    pub fn new(engine: EngineConfig, iterations: usize) -> Self {
        Self { engine, iterations }
    }

    fn geometry_at(&self, point: GridPoint) -> CoilGeometry {
        let (r0, r1) = Self::RADIUS_MM;
        let (i0, i1) = Self::CURRENT_A;
        CoilGeometry {
            inner_radius: self.vary(r0, r1, point.x),
            current: self.vary(i0, i1, point.y),
            ..Default::default()
        }
    }
}

impl Scene for CoilSweep {
    type Output = CoilReading;

    fn mode(&self) -> &str {
        "2d"
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn run(&self, point: GridPoint) -> Result<CoilReading> {
        let model = CoilModel::new(self.engine.clone(), self.geometry_at(point));
        run_unit(model, point)
    }

    fn display_results(&self, results: ResultGrid<CoilReading>) -> Result<()> {
        let rows: Vec<f64> = (0..self.iterations)
            .map(|x| self.geometry_at(GridPoint::new(x, 0)).inner_radius)
            .collect();
        let columns: Vec<f64> = (0..self.iterations)
            .map(|y| self.geometry_at(GridPoint::new(0, y)).current)
            .collect();
        println!("{}", inductance_table(&results, &rows, &columns));
        Ok(())
    }
}

/// Inductance in microhenries, one row per radius
fn inductance_table(results: &ResultGrid<CoilReading>, radii: &[f64], currents: &[f64]) -> String {
    let mut table = format!("{:>10}", "r (mm)");
    for current in currents {
        table.push_str(&format!("{:>12}", format!("{current:.2} A")));
    }
    for (x, radius) in radii.iter().enumerate() {
        table.push_str(&format!("\n{radius:>10.2}"));
        for y in 0..currents.len() {
            match results.get(GridPoint::new(x, y)) {
                Some(reading) => table.push_str(&format!("{:>12.3}", reading.inductance * 1e6)),
                None => table.push_str(&format!("{:>12}", "-")),
            }
        }
    }
    table
}

/// Add the coil model and sweep to `registry`
pub fn register(registry: &mut Registry) {
    registry
        .register_model("Coil", |settings: &Settings| {
            CoilModel::new(settings.engine.clone(), CoilGeometry::default())
        })
        .register_scene("CoilSweep", |settings: &Settings| {
            CoilSweep::new(settings.engine.clone(), 5)
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use femm_core::TransportError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Records commands and answers from a queue, `""` once it runs dry
    #[derive(Clone, Default)]
    struct Script {
        sent: Rc<RefCell<Vec<String>>>,
        replies: Rc<RefCell<VecDeque<(String, String)>>>,
    }

    impl Script {
        fn on(self, command: &str, reply: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back((command.to_string(), reply.to_string()));
            self
        }
    }

    impl Transport for Script {
        fn exchange(&mut self, command: &str) -> std::result::Result<String, TransportError> {
            self.sent.borrow_mut().push(command.to_string());
            let mut replies = self.replies.borrow_mut();
            match replies.front() {
                Some((expected, _)) if expected == command => {
                    Ok(replies.pop_front().map(|(_, r)| r).unwrap_or_default())
                }
                _ => Ok(String::new()),
            }
        }
    }

    fn model(script: &Script, geometry: CoilGeometry) -> CoilModel<Script> {
        let script = script.clone();
        CoilModel::with_connector(geometry, move || Ok(Session::new(script.clone())))
    }

    #[test]
    fn test_coil_inductance_from_circuit_properties() {
        let script = Script::default().on(
            "mo_getcircuitproperties(\"coil\")",
            "[2.0, 0.0, 0.004]",
        );
        let geometry = CoilGeometry {
            current: 2.0,
            ..Default::default()
        };

        let reading = run_unit(model(&script, geometry), GridPoint::ORIGIN).unwrap();

        assert_eq!(reading.flux_linkage, 0.004);
        assert_eq!(reading.inductance, 0.002);

        let sent = script.sent.borrow();
        assert_eq!(sent[0], "newdocument(0)");
        assert!(sent.contains(&"mi_addcircprop(\"coil\", 2.0, 1)".to_string()));
        assert!(sent.contains(&"mi_addnode(10.0, -10.0)".to_string()));
        assert!(sent.contains(&"mi_addnode(15.0, 10.0)".to_string()));
        assert!(sent.contains(&"mi_makeABC()".to_string()));
        assert_eq!(sent.last().map(String::as_str), Some("mi_close()"));
    }

    #[test]
    fn test_malformed_circuit_reply_is_an_error() {
        let script = Script::default().on("mo_getcircuitproperties(\"coil\")", "(1.0)");

        let err = run_unit(model(&script, CoilGeometry::default()), GridPoint::ORIGIN).unwrap_err();

        assert!(matches!(err, FemmError::Model(_)));
        assert_eq!(
            script.sent.borrow().last().map(String::as_str),
            Some("mi_close()")
        );
    }

    #[test]
    fn test_sweep_varies_radius_then_current() {
        let sweep = CoilSweep::new(EngineConfig::new("unused"), 4);

        let g = sweep.geometry_at(GridPoint::new(2, 1));

        assert_eq!(g.inner_radius, 15.0);
        assert_eq!(g.current, 3.25);
        assert_eq!(g.turns, CoilGeometry::default().turns);
    }

    #[test]
    fn test_inductance_table_layout() {
        let reading = |inductance| CoilReading {
            flux_linkage: 0.0,
            inductance,
        };
        let grid = ResultGrid::Plane(vec![
            vec![reading(1e-6), reading(2e-6)],
            vec![reading(3e-6), reading(4e-6)],
        ]);

        let table = inductance_table(&grid, &[5.0, 15.0], &[1.0, 5.5]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("r (mm)"));
        assert!(lines[0].ends_with("5.50 A"));
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            ["15.00", "3.000", "4.000"]
        );
    }
}
