// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::{Args, OutputFormat};
use clap::Parser;
use reedsshepp::{get_optimal_path_with_radius, sample_path, Heuristic, Path, Sample};
use serde_json::{json, Value};
use tracing::{debug, info, info_span};
use tracing_subscriber::{layer::SubscriberExt as _, Layer as _, Registry};

fn elements_json(path: &Path) -> Value {
    path.iter()
        .map(|e| {
            json!({
                "steering": e.steering.to_string(),
                "gear": e.gear.sign(),
                "param": e.param(),
            })
        })
        .collect()
}

fn samples_json(samples: &[Sample]) -> Value {
    samples
        .iter()
        .map(|s| json!([s.pose.x, s.pose.y, s.pose.heading, s.gear.sign()]))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(args.rust_log);
    let subscriber = Registry::default().with(stdout_log);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    let heuristic = Heuristic::from(args.precomputed.clone());
    let start = args.start_pose();
    let end = args.end_pose();
    debug!("start={:?} end={:?} radius={}", start, end, args.radius);

    let path = info_span!("plan").in_scope(|| {
        get_optimal_path_with_radius(&start, &end, args.radius)
    })?;
    let length = path.length() * args.radius;
    info!("optimal path {} world length={:.3}", path, length);

    // The table is built for a unit turning radius.
    let (unit_start, unit_end) = (start.scaled(1.0 / args.radius), end.scaled(1.0 / args.radius));
    let cached = heuristic.lookup(&unit_start, &unit_end);
    let estimate = cached.unwrap_or_else(|| path.length()) * args.radius;

    let samples: Vec<Sample> = if args.sample {
        sample_path(&path, &start, args.radius, args.resolution)?.collect()
    } else {
        Vec::new()
    };

    match args.format {
        OutputFormat::Text => {
            println!("{}", path);
            println!("length: {:.6}", length);
            println!(
                "heuristic: {:.6} ({})",
                estimate,
                if cached.is_some() { "table" } else { "exact" }
            );
            for s in &samples {
                println!(
                    "{:.4} {:.4} {:.4} {}",
                    s.pose.x,
                    s.pose.y,
                    s.pose.heading,
                    s.gear.sign()
                );
            }
        }
        OutputFormat::Json => {
            let mut output = json!({
                "start": [start.x, start.y, start.heading],
                "end": [end.x, end.y, end.heading],
                "radius": args.radius,
                "length": length,
                "heuristic": estimate,
                "cached": cached.is_some(),
                "elements": elements_json(&path),
            });
            if args.sample {
                output["samples"] = samples_json(&samples);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
