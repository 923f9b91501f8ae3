// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{fmt, path::PathBuf};

use clap::{Parser, ValueEnum};
use reedsshepp::{sampler::DEFAULT_RESOLUTION, Pose};
use tracing::level_filters::LevelFilter;

/// How the planned path is printed.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// start pose as "x y heading" with the heading in radians
    #[arg(
        long,
        default_value = "0 0 0",
        value_delimiter = ' ',
        num_args = 3,
        allow_negative_numbers = true
    )]
    pub start: Vec<f64>,

    /// end pose as "x y heading" with the heading in radians
    #[arg(
        long,
        value_delimiter = ' ',
        num_args = 3,
        required = true,
        allow_negative_numbers = true
    )]
    pub end: Vec<f64>,

    /// Vehicle turning radius, in the same unit as the poses.
    #[arg(long, env, default_value = "1")]
    pub radius: f64,

    /// Arc length between samples, in units of the turning radius.
    #[arg(long, env, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: f64,

    /// Print the sampled poses along the path.
    #[arg(long)]
    pub sample: bool,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Precomputed heuristic table (.npz) used to answer the distance query.
    #[arg(long, env)]
    pub precomputed: Option<PathBuf>,

    /// Application log level
    #[arg(long, env, default_value = "info")]
    pub rust_log: LevelFilter,
}

impl Args {
    pub fn start_pose(&self) -> Pose {
        Pose::new(self.start[0], self.start[1], self.start[2])
    }

    pub fn end_pose(&self) -> Pose {
        Pose::new(self.end[0], self.end[1], self.end[2])
    }
}
