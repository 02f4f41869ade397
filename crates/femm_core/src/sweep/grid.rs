use serde::{Deserialize, Serialize};

/// Grid indices of one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    pub const ORIGIN: GridPoint = GridPoint { x: 0, y: 0 };

    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Points of a 1D sweep: `x` in `0..n`, `y` fixed at 0
pub fn line_points(n: usize) -> Vec<GridPoint> {
    (0..n).map(|x| GridPoint::new(x, 0)).collect()
}

/// Points of row `x` of a 2D sweep
pub fn row_points(x: usize, n: usize) -> Vec<GridPoint> {
    (0..n).map(|y| GridPoint::new(x, y)).collect()
}

/// Results of a sweep in grid order.
///
/// `Plane` is row-major: the outer index is the first variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultGrid<R> {
    Line(Vec<R>),
    Plane(Vec<Vec<R>>),
}

impl<R> ResultGrid<R> {
    /// `[n]` for a line, `[rows, cols]` for a plane
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ResultGrid::Line(values) => vec![values.len()],
            ResultGrid::Plane(rows) => {
                vec![rows.len(), rows.first().map_or(0, Vec::len)]
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultGrid::Line(values) => values.len(),
            ResultGrid::Plane(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `point`; a line ignores `point.y`
    pub fn get(&self, point: GridPoint) -> Option<&R> {
        match self {
            ResultGrid::Line(values) => values.get(point.x),
            ResultGrid::Plane(rows) => rows.get(point.x).and_then(|row| row.get(point.y)),
        }
    }

    pub fn as_line(&self) -> Option<&[R]> {
        match self {
            ResultGrid::Line(values) => Some(values),
            ResultGrid::Plane(_) => None,
        }
    }

    pub fn as_plane(&self) -> Option<&[Vec<R>]> {
        match self {
            ResultGrid::Plane(rows) => Some(rows),
            ResultGrid::Line(_) => None,
        }
    }

    /// Iterate `(point, value)` pairs in row-major order
    pub fn iter(&self) -> Box<dyn Iterator<Item = (GridPoint, &R)> + '_> {
        match self {
            ResultGrid::Line(values) => Box::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(x, v)| (GridPoint::new(x, 0), v)),
            ),
            ResultGrid::Plane(rows) => Box::new(rows.iter().enumerate().flat_map(|(x, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(y, v)| (GridPoint::new(x, y), v))
            })),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(R) -> U) -> ResultGrid<U> {
        match self {
            ResultGrid::Line(values) => ResultGrid::Line(values.into_iter().map(f).collect()),
            ResultGrid::Plane(rows) => ResultGrid::Plane(
                rows.into_iter()
                    .map(|row| row.into_iter().map(&mut f).collect())
                    .collect(),
            ),
        }
    }
}
