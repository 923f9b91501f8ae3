// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Reeds-Shepp Library
//!
//! This library computes optimal paths for a car-like vehicle which can
//! drive both forwards and backwards with a bounded turning radius, and
//! provides a precomputed distance heuristic for search based planners.
//!
//! # Features
//!
//! - **Path Families** - The twelve closed-form Reeds-Shepp formulas
//! - **Optimal Paths** - Shortest of the 48 symmetric candidates
//! - **Sampling** - Dense world frame poses along a path
//! - **Heuristic** - Quantized table lookup with exact fallback
//!
//! All lengths are in units of the turning radius unless a radius is given.
//!
//! # Binaries
//!
//! - `rsplan` - Compute, sample and print the optimal path between poses
//! - `rsprecompute` - Build the heuristic table offline

#![warn(missing_docs)]

/// Angles, polar coordinates and relative poses
pub mod geometry;

/// Path elements and paths
pub mod path;

/// The twelve Reeds-Shepp path families
pub mod formulas;

/// Candidate expansion and optimal path selection
pub mod planner;

/// Sampling of paths into world frame poses
pub mod sampler;

/// Precomputed distance heuristic
pub mod heuristic;

pub use geometry::Pose;
pub use heuristic::{Heuristic, HeuristicTable, TableError};
pub use path::{Gear, Path, PathElement, Steering};
pub use planner::{get_all_paths, get_optimal_path, get_optimal_path_with_radius, PlanError};
pub use sampler::{sample_path, PathSampler, Sample};
