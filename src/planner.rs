// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::fmt;

use tracing::trace;

use crate::{
    formulas::FORMULAS,
    geometry::{relative_pose, Pose},
    path::Path,
};

/// Errors from planning and sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanError {
    /// No family produced a finite maneuver.
    NoPath,
    /// Turning radius is not finite and positive.
    InvalidRadius(f64),
    /// Sampling resolution is not finite and positive.
    InvalidResolution(f64),
}

impl std::error::Error for PlanError {}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            PlanError::NoPath => write!(f, "no feasible maneuver between poses"),
            PlanError::InvalidRadius(radius) => write!(f, "invalid turning radius: {}", radius),
            PlanError::InvalidResolution(resolution) => {
                write!(f, "invalid sampling resolution: {}", resolution)
            }
        }
    }
}

/// Returns every non-degenerate candidate from the twelve families and their
/// timeflip and reflection variants, in enumeration order.  Positions are in
/// units of the turning radius.  Candidates with a non-finite length, which
/// only arise from non-finite poses, are dropped.
pub fn get_all_paths(start: &Pose, end: &Pose) -> Vec<Path> {
    let Pose { x, y, heading: phi } = relative_pose(start, end);

    FORMULAS
        .iter()
        .flat_map(|formula| {
            [
                formula(x, y, phi),
                formula(-x, y, -phi).timeflip(),
                formula(x, -y, -phi).reflect(),
                formula(-x, -y, phi).timeflip().reflect(),
            ]
        })
        .map(Path::without_zero_elements)
        .filter(|path| !path.is_empty() && path.length().is_finite())
        .collect()
}

/// Returns the shortest candidate between two poses.  Among equal lengths
/// the first candidate in enumeration order wins.
pub fn get_optimal_path(start: &Pose, end: &Pose) -> Result<Path, PlanError> {
    let mut best: Option<(f64, Path)> = None;
    for path in get_all_paths(start, end) {
        let length = path.length();
        match &best {
            Some((best_length, _)) if length >= *best_length => (),
            _ => best = Some((length, path)),
        }
    }

    match best {
        Some((length, path)) => {
            trace!(length, "optimal path {}", path);
            Ok(path)
        }
        None => Err(PlanError::NoPath),
    }
}

/// Plans between poses given in world units for a vehicle with the given
/// turning radius.  The returned path is in unit radius parameters, multiply
/// its length by `radius` for the world distance.
pub fn get_optimal_path_with_radius(
    start: &Pose,
    end: &Pose,
    radius: f64,
) -> Result<Path, PlanError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(PlanError::InvalidRadius(radius));
    }
    get_optimal_path(&start.scaled(1.0 / radius), &end.scaled(1.0 / radius))
}
