//! Sweep orchestrator tests
//!
//! - 1D ordering independent of completion order
//! - 2D shape and row-major placement
//! - Fail-fast configuration errors with no dispatch
//! - All-or-nothing batches
//! - Scene runner and per-unit sessions

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::support::FakeEngine;
use crate::error::{FemmError, SweepError};
use crate::session::Session;
use crate::sweep::{
    GridPoint, ResultGrid, Scene, SceneRunner, SweepConfig, SweepMode, sweep, sweep_into,
};
use crate::{Doctype, Point};

#[test]
fn test_1d_sweep_preserves_order() {
    let config = SweepConfig::parse("1D", 5).unwrap().with_workers(4);

    let outcome = sweep(&config, |p| {
        // later points finish first
        std::thread::sleep(Duration::from_millis(((5 - p.x) * 5) as u64));
        Ok(p.x * p.x)
    })
    .unwrap();

    assert_eq!(outcome.grid, ResultGrid::Line(vec![0, 1, 4, 9, 16]));
}

#[test]
fn test_1d_sweep_fixes_second_variable() {
    let config = SweepConfig::parse("1d", 4).unwrap();

    let outcome = sweep(&config, |p| Ok(p.y)).unwrap();

    assert_eq!(outcome.grid, ResultGrid::Line(vec![0, 0, 0, 0]));
}

#[test]
fn test_2d_sweep_shape() {
    let config = SweepConfig::parse("2D", 3).unwrap().with_workers(2);
    let run = |p: GridPoint| p.x * 10 + p.y;

    let outcome = sweep(&config, |p| Ok(run(p))).unwrap();

    let rows = outcome.grid.as_plane().unwrap();
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 3);
        for (j, value) in row.iter().enumerate() {
            assert_eq!(*value, run(GridPoint::new(i, j)));
        }
    }
}

#[test]
fn test_2d_rows_run_in_sequence() {
    let config = SweepConfig::parse("2d", 4).unwrap().with_workers(4);
    let order = Mutex::new(Vec::new());

    sweep(&config, |p| {
        order.lock().unwrap().push(p.x);
        Ok(())
    })
    .unwrap();

    let order = order.into_inner().unwrap();
    assert_eq!(order.len(), 16);
    assert!(order.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_invalid_mode_dispatches_nothing() {
    struct TypoScene {
        dispatched: AtomicUsize,
    }

    impl Scene for TypoScene {
        type Output = ();

        fn mode(&self) -> &str {
            "1d-typo"
        }

        fn iterations(&self) -> usize {
            3
        }

        fn run(&self, _point: GridPoint) -> Result<(), FemmError> {
            self.dispatched.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn display_results(&self, _results: ResultGrid<()>) -> Result<(), FemmError> {
            Ok(())
        }
    }

    let scene = TypoScene {
        dispatched: AtomicUsize::new(0),
    };

    let err = SceneRunner::new().start(&scene).unwrap_err();

    assert!(matches!(err, SweepError::Config(_)));
    assert_eq!(scene.dispatched.load(Ordering::SeqCst), 0);
}

#[test]
fn test_zero_workers_dispatches_nothing() {
    let dispatched = AtomicUsize::new(0);
    let config = SweepConfig::new(SweepMode::OneD, 3).with_workers(0);

    let result = sweep(&config, |_| {
        dispatched.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert!(matches!(result, Err(SweepError::Config(_))));
    assert_eq!(dispatched.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unit_failure_aborts_sweep() {
    let config = SweepConfig::parse("2d", 3).unwrap().with_workers(2);
    let consumed = AtomicUsize::new(0);

    let err = sweep_into(
        &config,
        |p| {
            if p == GridPoint::new(1, 2) {
                Err(FemmError::Engine("error: mesh failed".to_string()))
            } else {
                Ok(p.x + p.y)
            }
        },
        |_grid| {
            consumed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    )
    .unwrap_err();

    match err {
        SweepError::Unit { point, source } => {
            assert_eq!(point, GridPoint::new(1, 2));
            assert!(matches!(source, FemmError::Engine(_)));
        }
        other => panic!("expected unit error, got {other:?}"),
    }
    assert_eq!(consumed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_consumer_receives_complete_grid_once() {
    let config = SweepConfig::parse("2d", 2).unwrap();
    let calls = AtomicUsize::new(0);

    let report = sweep_into(
        &config,
        |p| Ok((p.x, p.y)),
        |grid| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(grid.shape(), vec![2, 2]);
            assert_eq!(grid.get(GridPoint::new(1, 0)), Some(&(1, 0)));
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.points, 4);
    assert_eq!(report.mode, SweepMode::TwoD);
}

#[test]
fn test_consumer_failure_is_reported() {
    let config = SweepConfig::parse("1d", 2).unwrap();

    let err = sweep_into(&config, |p| Ok(p.x), |_| Err(FemmError::model("plot failed")))
        .unwrap_err();

    assert!(matches!(err, SweepError::Consumer(FemmError::Model(_))));
}

/// Each unit opens its own session on its own engine and measures a field
struct FieldScene {
    engines: Mutex<Vec<FakeEngine>>,
}

impl Scene for FieldScene {
    type Output = usize;

    fn mode(&self) -> &str {
        "2D"
    }

    fn iterations(&self) -> usize {
        3
    }

    fn run(&self, point: GridPoint) -> Result<usize, FemmError> {
        let engine = FakeEngine::new();
        engine.reply("").reply("").reply(&format!("({})", point.x * 3 + point.y));
        self.engines.lock().unwrap().push(engine.clone());

        let mut session = Session::new(engine);
        session.new_document(Doctype::Magnetics)?;
        session
            .pre()
            .add_node(Point::new(self.vary(0.0, 3.0, point.x), 0.0), None)?;
        let value = session
            .post()
            .block_integral(0)?
            .value()
            .and_then(|v| v.as_i64())
            .ok_or_else(|| FemmError::model("no integral"))?;
        Ok(value as usize)
    }

    fn display_results(&self, results: ResultGrid<usize>) -> Result<(), FemmError> {
        let flat: Vec<usize> = results.iter().map(|(_, v)| *v).collect();
        if flat == (0..9).collect::<Vec<_>>() {
            Ok(())
        } else {
            Err(FemmError::model(format!("unexpected grid {flat:?}")))
        }
    }
}

#[test]
fn test_scene_units_own_their_sessions() {
    let scene = FieldScene {
        engines: Mutex::new(Vec::new()),
    };

    let report = SceneRunner::new().with_workers(3).start(&scene).unwrap();

    assert_eq!(report.points, 9);
    assert_eq!(report.workers, 3);
    let engines = scene.engines.into_inner().unwrap();
    assert_eq!(engines.len(), 9);
    for engine in engines {
        let sent = engine.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], "newdocument(0)");
        assert_eq!(sent[2], "mo_blockintegral(0)");
    }
}

#[test]
fn test_scene_vary_and_axis() {
    let scene = FieldScene {
        engines: Mutex::new(Vec::new()),
    };

    assert_eq!(scene.vary(0.0, 3.0, 2), 2.0);
    assert_eq!(scene.axis(0.0, 1.0), vec![0.0, 0.5, 1.0]);
}
