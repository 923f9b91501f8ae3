// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{path::PathBuf, time::Instant};

use clap::Parser;
use log::{debug, info};
use reedsshepp::HeuristicTable;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid spacing along x and y, in units of the turning radius.
    #[arg(short, long, default_value = "0.1")]
    resolution: f64,

    /// Grid spacing of the heading axis in degrees.
    #[arg(short, long, default_value = "5")]
    angle_resolution: f64,

    /// Number of cells along x.
    #[arg(short = 'x', long, default_value = "100")]
    cells_x: usize,

    /// Number of cells along y.
    #[arg(short = 'y', long, default_value = "100")]
    cells_y: usize,

    /// Output table file.
    #[arg(short, long, default_value = "reeds_shepp_heuristic.npz")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    debug!("{:?}", args);

    let now = Instant::now();
    let table = HeuristicTable::build(
        args.resolution,
        args.angle_resolution,
        args.cells_x,
        args.cells_y,
    )?;
    info!(
        "computed {} cells in {:?}",
        table.grid().len(),
        now.elapsed()
    );

    table.save(&args.output)?;
    println!(
        "{}: shape={:?} resolution={} angle_resolution={}",
        args.output.display(),
        table.grid().shape(),
        table.resolution(),
        table.angle_resolution()
    );

    Ok(())
}
