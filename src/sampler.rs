// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    geometry::Pose,
    path::{Gear, Path, PathElement},
    planner::PlanError,
};

/// Default arc length between samples, in units of the turning radius.
pub const DEFAULT_RESOLUTION: f64 = 0.1;

/// A world frame pose along a path and the gear used to reach it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    /// World frame pose.
    pub pose: Pose,
    /// Gear of the element the pose lies on.
    pub gear: Gear,
}

/// Walks a path from a world frame start pose, yielding a sample every
/// `resolution` of arc length.  The last sample of every element lands
/// exactly on the element's end and the start pose itself is not yielded.
#[derive(Debug, Clone)]
pub struct PathSampler<'a> {
    elements: &'a [PathElement],
    radius: f64,
    resolution: f64,
    index: usize,
    progress: f64,
    origin: Pose,
    last: Option<Pose>,
}

/// Creates a sampler over `path` anchored at `start`.  Positions produced by
/// the path are multiplied by `radius`, headings are not.
pub fn sample_path<'a>(
    path: &'a Path,
    start: &Pose,
    radius: f64,
    resolution: f64,
) -> Result<PathSampler<'a>, PlanError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(PlanError::InvalidRadius(radius));
    }
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(PlanError::InvalidResolution(resolution));
    }

    Ok(PathSampler {
        elements: path.elements(),
        radius,
        resolution,
        index: 0,
        progress: 0.0,
        origin: *start,
        last: None,
    })
}

impl Iterator for PathSampler<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            let element = self.elements.get(self.index)?;
            let remaining = element.param() - self.progress;

            if remaining > 0.0 {
                let step = self.progress + self.resolution;
                // snap when the step is lost to rounding on long elements
                self.progress = if remaining <= self.resolution || step <= self.progress {
                    element.param()
                } else {
                    step
                };

                let local = element.evaluate(self.progress);
                let pose = self.origin.compose(&local, self.radius);
                self.last = Some(pose);

                return Some(Sample {
                    pose,
                    gear: element.gear,
                });
            }

            // The next element starts where this one ended.
            if let Some(last) = self.last.take() {
                self.origin = last;
            }
            self.index += 1;
            self.progress = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::{
        geometry::normalize_angle,
        path::Steering,
        planner::get_optimal_path,
    };

    fn assert_close(a: &Pose, b: &Pose, tolerance: f64) {
        assert!((a.x - b.x).abs() < tolerance, "{:?} != {:?}", a, b);
        assert!((a.y - b.y).abs() < tolerance, "{:?} != {:?}", a, b);
        assert!(
            normalize_angle(a.heading - b.heading).abs() < tolerance,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn endpoint_reaches_goal() {
        let pairs = [
            (Pose::new(1.0, 2.0, 0.5), Pose::new(-3.0, 4.0, -2.0)),
            (Pose::new(0.0, 0.0, 0.0), Pose::new(0.0, 3.0, 0.0)),
            (Pose::new(0.0, 0.0, 0.0), Pose::new(0.0, 0.0, PI)),
            (Pose::new(2.0, -1.0, 1.2), Pose::new(4.5, -6.0, -0.3)),
        ];
        for (start, end) in pairs {
            let path = get_optimal_path(&start, &end).unwrap();
            let last = sample_path(&path, &start, 1.0, DEFAULT_RESOLUTION)
                .unwrap()
                .last()
                .unwrap();
            assert_close(&last.pose, &end, 1e-3);
        }
    }

    #[test]
    fn sample_count_and_gear() {
        let start = Pose::new(1.0, 2.0, 0.5);
        let path = get_optimal_path(&start, &Pose::new(-3.0, 4.0, -2.0)).unwrap();
        let samples: Vec<_> = sample_path(&path, &start, 1.0, 0.1).unwrap().collect();
        assert_eq!(samples.len(), 53);
        assert_eq!(samples[0].gear, path.elements()[0].gear);
        assert_eq!(samples.last().unwrap().gear, path.elements()[path.len() - 1].gear);
    }

    #[test]
    fn resolution_changes_density_only() {
        let start = Pose::new(-1.0, 0.5, 2.0);
        let end = Pose::new(3.0, -2.0, -1.0);
        let path = get_optimal_path(&start, &end).unwrap();

        let coarse: Vec<_> = sample_path(&path, &start, 1.0, 0.5).unwrap().collect();
        let fine: Vec<_> = sample_path(&path, &start, 1.0, 0.01).unwrap().collect();
        assert!(fine.len() > coarse.len());
        assert_close(&coarse.last().unwrap().pose, &fine.last().unwrap().pose, 1e-9);
    }

    #[test]
    fn restartable() {
        let start = Pose::new(0.0, 0.0, 0.0);
        let path = get_optimal_path(&start, &Pose::new(3.0, 4.0, FRAC_PI_2)).unwrap();
        let sampler = sample_path(&path, &start, 1.0, 0.25).unwrap();
        let first: Vec<_> = sampler.clone().collect();
        let second: Vec<_> = sampler.collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn radius_scales_positions() {
        let path = Path::new(vec![
            PathElement::new(FRAC_PI_2, Steering::Left, Gear::Forward),
            PathElement::new(2.0, Steering::Straight, Gear::Backward),
        ]);
        let start = Pose::new(10.0, 0.0, 0.0);
        let samples: Vec<_> = sample_path(&path, &start, 3.0, 0.1).unwrap().collect();

        // quarter turn left on a radius 3 circle, then 6 units in reverse
        let corner = samples
            .iter()
            .find(|s| s.gear == Gear::Backward)
            .map(|s| s.pose)
            .unwrap();
        assert!((corner.x - 13.0).abs() < 1e-9);
        assert!((corner.y - 3.0 + 0.3).abs() < 1e-9);
        assert_close(&samples.last().unwrap().pose, &Pose::new(13.0, -3.0, FRAC_PI_2), 1e-9);
    }

    #[test]
    fn invalid_parameters() {
        let path = Path::default();
        let start = Pose::default();
        assert!(matches!(
            sample_path(&path, &start, 1.0, 0.0),
            Err(PlanError::InvalidResolution(_))
        ));
        assert!(matches!(
            sample_path(&path, &start, -1.0, 0.1),
            Err(PlanError::InvalidRadius(_))
        ));
        assert_eq!(sample_path(&path, &start, 1.0, 0.1).unwrap().count(), 0);
    }

    #[test]
    fn step_below_precision_snaps_to_end() {
        let far = 2f64.powi(60);
        let length = far + 4096.0;
        let path = Path::new(vec![PathElement::new(length, Steering::Straight, Gear::Forward)]);
        let mut sampler = sample_path(&path, &Pose::default(), 1.0, 1.0).unwrap();
        // far + 1.0 rounds back to far
        sampler.progress = far;
        assert_eq!(far + sampler.resolution, far);

        let sample = sampler.next().unwrap();
        assert_eq!(sampler.progress, length);
        assert_eq!(sample.pose.x, length);
        assert_eq!(sampler.next(), None);
    }
}
