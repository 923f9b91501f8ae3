// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{
    fmt,
    fs::File,
    io,
    path::{Path, PathBuf},
};

use ndarray::{arr0, Array0, Array1, Array3};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, WriteNpzError};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    geometry::{deg_to_rad, rad_to_deg, relative_pose, Pose},
    planner::{get_optimal_path, PlanError},
};

const GRID_NAME: &str = "hs.npy";
const RESOLUTION_NAME: &str = "resolution.npy";
const ANGLE_RESOLUTION_NAME: &str = "angle_resolution.npy";
const BOUNDS_NAME: &str = "bounds.npy";

/// Errors building, loading or saving a heuristic table.
#[derive(Debug)]
pub enum TableError {
    /// The table file could not be opened or created.
    Io(io::Error),
    /// The archive or one of its arrays could not be read.
    ReadNpz(ReadNpzError),
    /// The archive could not be written.
    WriteNpz(WriteNpzError),
    /// Linear resolution is not finite and positive.
    InvalidResolution(f64),
    /// Angle resolution, in degrees, is not finite and positive.
    InvalidAngleResolution(f64),
    /// Bounds are not three non-negative limits within the grid shape.
    InvalidBounds(Vec<i64>),
    /// One of the grid axes has no cells.
    EmptyGrid([usize; 3]),
    /// The exact planner failed while building the table.
    Plan(PlanError),
}

impl std::error::Error for TableError {}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> TableError {
        TableError::Io(err)
    }
}

impl From<ReadNpzError> for TableError {
    fn from(err: ReadNpzError) -> TableError {
        TableError::ReadNpz(err)
    }
}

impl From<WriteNpzError> for TableError {
    fn from(err: WriteNpzError) -> TableError {
        TableError::WriteNpz(err)
    }
}

impl From<PlanError> for TableError {
    fn from(err: PlanError) -> TableError {
        TableError::Plan(err)
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            TableError::Io(err) => write!(f, "io error: {}", err),
            TableError::ReadNpz(err) => write!(f, "npz read error: {}", err),
            TableError::WriteNpz(err) => write!(f, "npz write error: {}", err),
            TableError::InvalidResolution(value) => write!(f, "invalid resolution: {}", value),
            TableError::InvalidAngleResolution(value) => {
                write!(f, "invalid angle resolution: {}", value)
            }
            TableError::InvalidBounds(bounds) => write!(f, "invalid bounds: {:?}", bounds),
            TableError::EmptyGrid(shape) => write!(f, "empty grid: {:?}", shape),
            TableError::Plan(err) => write!(f, "planning error: {}", err),
        }
    }
}

/// Precomputed path lengths from the origin facing +x to the grid of
/// relative goals `(|dx|, |dy|, dθ)`.
///
/// The x and y axes are indexed by `round(d / resolution)` and the θ axis
/// by `round(dθ in degrees / angle_resolution)` wrapped around the axis
/// length.  The bounds limit the x, y and θ indices a lookup may use, they
/// never exceed the grid shape.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicTable {
    grid: Array3<f64>,
    resolution: f64,
    angle_resolution: f64,
    bounds: [usize; 3],
}

impl HeuristicTable {
    /// Validates the grid and metadata into a table.  `bounds` holds the
    /// `[nx, ny, nθ]` index limits as stored in the archive.
    pub fn new(
        grid: Array3<f64>,
        resolution: f64,
        angle_resolution: f64,
        bounds: &[i64],
    ) -> Result<Self, TableError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(TableError::InvalidResolution(resolution));
        }
        if !(angle_resolution.is_finite() && angle_resolution > 0.0) {
            return Err(TableError::InvalidAngleResolution(angle_resolution));
        }

        let shape = grid.dim();
        let shape = [shape.0, shape.1, shape.2];
        if shape.contains(&0) {
            return Err(TableError::EmptyGrid(shape));
        }

        if bounds.len() != 3 {
            return Err(TableError::InvalidBounds(bounds.to_vec()));
        }
        let mut checked = [0usize; 3];
        for (axis, &bound) in bounds.iter().enumerate() {
            if bound <= 0 || bound as usize > shape[axis] {
                return Err(TableError::InvalidBounds(bounds.to_vec()));
            }
            checked[axis] = bound as usize;
        }

        Ok(HeuristicTable {
            grid,
            resolution,
            angle_resolution,
            bounds: checked,
        })
    }

    /// Reads a table from an `.npz` archive holding the arrays `hs`,
    /// `resolution`, `angle_resolution` and `bounds`.  The grid may be
    /// stored as either f64 or f32.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let mut npz = NpzReader::new(File::open(path)?)?;

        let grid: Array3<f64> = match npz.by_name(GRID_NAME) {
            Ok(grid) => grid,
            Err(err) => {
                debug!("grid is not f64, trying f32: {}", err);
                let grid: Array3<f32> = npz.by_name(GRID_NAME).map_err(|_| err)?;
                grid.mapv(f64::from)
            }
        };
        let resolution: Array0<f64> = npz.by_name(RESOLUTION_NAME)?;
        let angle_resolution: Array0<f64> = npz.by_name(ANGLE_RESOLUTION_NAME)?;
        let bounds: Array1<i64> = npz.by_name(BOUNDS_NAME)?;

        let table = Self::new(
            grid,
            resolution.into_scalar(),
            angle_resolution.into_scalar(),
            &bounds.to_vec(),
        )?;
        info!(
            "loaded heuristic table shape={:?} resolution={} angle_resolution={} bounds={:?}",
            table.grid.shape(),
            table.resolution,
            table.angle_resolution,
            table.bounds
        );
        Ok(table)
    }

    /// Writes the table in the layout `load` reads.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let mut npz = NpzWriter::new(File::create(path)?);
        npz.add_array(GRID_NAME, &self.grid)?;
        npz.add_array(RESOLUTION_NAME, &arr0(self.resolution))?;
        npz.add_array(ANGLE_RESOLUTION_NAME, &arr0(self.angle_resolution))?;
        let bounds = Array1::from_iter(self.bounds.iter().map(|&b| b as i64));
        npz.add_array(BOUNDS_NAME, &bounds)?;
        npz.finish()?;
        Ok(())
    }

    /// Computes the exact optimal path length from the origin to every cell
    /// of a `cells_x` × `cells_y` grid spaced by `resolution`, over a full
    /// turn of headings spaced by `angle_resolution` degrees.
    #[instrument(skip_all)]
    pub fn build(
        resolution: f64,
        angle_resolution: f64,
        cells_x: usize,
        cells_y: usize,
    ) -> Result<Self, TableError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(TableError::InvalidResolution(resolution));
        }
        if !(angle_resolution.is_finite() && angle_resolution > 0.0 && angle_resolution <= 360.0)
        {
            return Err(TableError::InvalidAngleResolution(angle_resolution));
        }
        let cells_theta = (360.0 / angle_resolution).round() as usize;
        let shape = [cells_x, cells_y, cells_theta];
        if shape.contains(&0) {
            return Err(TableError::EmptyGrid(shape));
        }

        let origin = Pose::default();
        let mut grid = Array3::<f64>::zeros(shape);
        for ((ix, iy, itheta), value) in grid.indexed_iter_mut() {
            let goal = Pose::new(
                ix as f64 * resolution,
                iy as f64 * resolution,
                deg_to_rad(itheta as f64 * angle_resolution),
            );
            *value = get_optimal_path(&origin, &goal)?.length();
        }
        info!("built heuristic table shape={:?}", shape);

        let bounds = shape.map(|b| b as i64);
        Self::new(grid, resolution, angle_resolution, &bounds)
    }

    /// Grid spacing along x and y.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Grid spacing of the heading axis in degrees.
    pub fn angle_resolution(&self) -> f64 {
        self.angle_resolution
    }

    /// Index limits `[nx, ny, nθ]`.
    pub fn bounds(&self) -> [usize; 3] {
        self.bounds
    }

    /// Raw path lengths indexed by `(ix, iy, iθ)`.
    pub fn grid(&self) -> &Array3<f64> {
        &self.grid
    }

    /// Nearest grid value for a relative goal, or None outside the bounds.
    pub fn get(&self, relative: &Pose) -> Option<f64> {
        if !(relative.x.is_finite() && relative.y.is_finite() && relative.heading.is_finite()) {
            return None;
        }

        let ix = (relative.x / self.resolution).round_ties_even().abs();
        let iy = (relative.y / self.resolution).round_ties_even().abs();
        let itheta = (rad_to_deg(relative.heading) / self.angle_resolution).round_ties_even()
            as i64;
        let itheta = itheta.rem_euclid(self.grid.dim().2 as i64) as usize;

        if ix >= self.bounds[0] as f64 || iy >= self.bounds[1] as f64 || itheta >= self.bounds[2]
        {
            return None;
        }

        self.grid.get((ix as usize, iy as usize, itheta)).copied()
    }
}

/// Distance estimate for a search based planner.  Answers from a
/// precomputed table when one is present and covers the query, otherwise
/// computes the exact optimal path length.
///
/// Table lookups quantize the goal so they may under or over estimate the
/// exact distance.
#[derive(Debug, Clone, Default)]
pub struct Heuristic {
    table: Option<HeuristicTable>,
}

impl Heuristic {
    /// A heuristic which always computes the exact distance.
    pub fn exact() -> Self {
        Heuristic { table: None }
    }

    /// A heuristic answering from `table` where it covers the query.
    pub fn with_table(table: HeuristicTable) -> Self {
        Heuristic { table: Some(table) }
    }

    /// Loads the table at `path` if one is configured.  A table which
    /// cannot be loaded is reported once and the heuristic falls back to
    /// exact distances for its whole lifetime.
    pub fn from_config(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path,
            None => {
                debug!("no precomputed heuristic configured");
                return Self::exact();
            }
        };

        match HeuristicTable::load(path) {
            Ok(table) => Self::with_table(table),
            Err(err) => {
                warn!(
                    "could not load precomputed heuristic {}: {}",
                    path.display(),
                    err
                );
                Self::exact()
            }
        }
    }

    /// The loaded table, if any.
    pub fn table(&self) -> Option<&HeuristicTable> {
        self.table.as_ref()
    }

    /// Table value for the query or None when the table is absent or does
    /// not cover it.
    pub fn lookup(&self, start: &Pose, end: &Pose) -> Option<f64> {
        let table = self.table.as_ref()?;
        let value = table.get(&relative_pose(start, end));
        if value.is_none() {
            trace!("heuristic query outside table bounds");
        }
        value
    }

    /// Table value when available, otherwise the exact optimal length.
    pub fn distance(&self, start: &Pose, end: &Pose) -> Result<f64, PlanError> {
        match self.lookup(start, end) {
            Some(value) => Ok(value),
            None => Ok(get_optimal_path(start, end)?.length()),
        }
    }
}

/// Convenience for configuration values held as owned paths.
impl From<Option<PathBuf>> for Heuristic {
    fn from(path: Option<PathBuf>) -> Self {
        Heuristic::from_config(path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reedsshepp-{}-{}", std::process::id(), name))
    }

    fn constant_table(value: f64) -> HeuristicTable {
        let grid = Array3::<f64>::from_elem((10, 10, 36), value);
        HeuristicTable::new(grid, 0.5, 10.0, &[10, 10, 36]).unwrap()
    }

    #[test]
    fn table_value_is_served() {
        let heuristic = Heuristic::with_table(constant_table(42.0));
        let start = Pose::new(1.0, 1.0, 0.0);
        let end = Pose::new(2.0, 3.0, 1.0);
        assert_eq!(heuristic.lookup(&start, &end), Some(42.0));
        assert_eq!(heuristic.distance(&start, &end), Ok(42.0));
    }

    #[test]
    fn quantization_folds_signs() {
        let mut grid = Array3::<f64>::zeros((4, 4, 4));
        grid[(2, 1, 3)] = 7.0;
        let heuristic =
            Heuristic::with_table(HeuristicTable::new(grid, 1.0, 90.0, &[4, 4, 4]).unwrap());
        let start = Pose::default();

        // dθ = -90 degrees wraps onto index 3
        assert_eq!(heuristic.lookup(&start, &Pose::new(2.2, 0.9, -PI / 2.0)), Some(7.0));
        assert_eq!(heuristic.lookup(&start, &Pose::new(-1.8, -1.1, -PI / 2.0)), Some(7.0));
        assert_eq!(heuristic.lookup(&start, &Pose::new(2.0, 1.0, 0.0)), Some(0.0));
    }

    #[test]
    fn out_of_bounds_falls_back() {
        let heuristic = Heuristic::with_table(constant_table(42.0));
        let start = Pose::new(0.0, 0.0, 0.0);
        let end = Pose::new(20.0, 0.0, 0.0);
        assert_eq!(heuristic.lookup(&start, &end), None);
        let distance = heuristic.distance(&start, &end).unwrap();
        assert!((distance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn partial_bounds_fall_back() {
        let grid = Array3::<f64>::from_elem((4, 4, 8), 99.0);
        let heuristic =
            Heuristic::with_table(HeuristicTable::new(grid, 1.0, 45.0, &[4, 2, 4]).unwrap());
        let start = Pose::default();

        assert_eq!(heuristic.lookup(&start, &Pose::new(1.0, 1.0, 0.0)), Some(99.0));
        assert_eq!(heuristic.lookup(&start, &Pose::new(1.0, 1.0, 3.0 * PI / 4.0)), Some(99.0));

        let misses = [
            // θ index 5 is inside the grid but past bounds[2]
            Pose::new(1.0, 0.0, 225f64.to_radians()),
            Pose::new(1.0, 0.0, -135f64.to_radians()),
            // y index 2 is inside the grid but past bounds[1]
            Pose::new(1.0, 2.0, 0.0),
            Pose::new(1.0, -2.0, 0.0),
        ];
        for end in misses {
            assert_eq!(heuristic.lookup(&start, &end), None, "{:?}", end);
            let exact = get_optimal_path(&start, &end).unwrap().length();
            assert_eq!(heuristic.distance(&start, &end), Ok(exact));
        }
    }

    #[test]
    fn absent_table_matches_exact() {
        let heuristic = Heuristic::exact();
        let pairs = [
            (Pose::new(0.0, 0.0, 0.0), Pose::new(3.0, 4.0, PI / 2.0)),
            (Pose::new(1.0, 2.0, 0.5), Pose::new(-3.0, 4.0, -2.0)),
            (Pose::new(-4.0, 0.5, 3.0), Pose::new(-4.5, 1.0, -3.0)),
        ];
        for (start, end) in pairs {
            let exact = get_optimal_path(&start, &end).unwrap().length();
            assert_eq!(heuristic.distance(&start, &end), Ok(exact));
        }
    }

    #[test]
    fn missing_or_corrupt_file_degrades() {
        let missing = temp_path("missing.npz");
        let heuristic = Heuristic::from_config(Some(missing.as_path()));
        assert!(heuristic.table().is_none());

        let corrupt = temp_path("corrupt.npz");
        std::fs::write(&corrupt, b"definitely not a zip archive").unwrap();
        let heuristic = Heuristic::from_config(Some(corrupt.as_path()));
        assert!(heuristic.table().is_none());
        std::fs::remove_file(&corrupt).unwrap();

        let start = Pose::new(0.0, 0.0, 0.0);
        let end = Pose::new(0.0, 3.0, 0.0);
        let exact = get_optimal_path(&start, &end).unwrap().length();
        assert_eq!(heuristic.distance(&start, &end), Ok(exact));

        assert!(Heuristic::from_config(None).table().is_none());
    }

    #[test]
    fn build_save_load() {
        let table = HeuristicTable::build(0.5, 45.0, 6, 5).unwrap();
        assert_eq!(table.grid().dim(), (6, 5, 8));
        assert_eq!(table.bounds(), [6, 5, 8]);
        let turn = get_optimal_path(&Pose::default(), &Pose::new(0.0, 0.0, PI)).unwrap();
        assert!((table.grid()[(0, 0, 4)] - turn.length()).abs() < 1e-9);
        assert!((table.grid()[(4, 0, 0)] - 2.0).abs() < 1e-9);

        let path = temp_path("table.npz");
        table.save(&path).unwrap();
        let heuristic = Heuristic::from_config(Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();

        let loaded = heuristic.table().unwrap();
        assert_eq!(loaded, &table);

        // a query on a grid point returns the stored value
        let start = Pose::new(3.0, -1.0, PI / 2.0);
        let end = Pose::new(3.0, 0.0, PI / 2.0);
        assert_eq!(heuristic.lookup(&start, &end), Some(table.grid()[(2, 0, 0)]));
    }

    #[test]
    fn invalid_tables() {
        let grid = Array3::<f64>::zeros((2, 2, 2));
        assert!(matches!(
            HeuristicTable::new(grid.clone(), 0.0, 1.0, &[2, 2, 2]),
            Err(TableError::InvalidResolution(_))
        ));
        assert!(matches!(
            HeuristicTable::new(grid.clone(), 1.0, f64::NAN, &[2, 2, 2]),
            Err(TableError::InvalidAngleResolution(_))
        ));
        assert!(matches!(
            HeuristicTable::new(grid.clone(), 1.0, 1.0, &[3, 2, 2]),
            Err(TableError::InvalidBounds(_))
        ));
        assert!(matches!(
            HeuristicTable::new(grid, 1.0, 1.0, &[2, 2]),
            Err(TableError::InvalidBounds(_))
        ));
        assert!(matches!(
            HeuristicTable::new(Array3::zeros((0, 2, 2)), 1.0, 1.0, &[1, 2, 2]),
            Err(TableError::EmptyGrid(_))
        ));
    }
}
