// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::f64::consts::{PI, TAU};

use nalgebra::{Rotation2, Vector2};

/// An oriented position in the plane.  The heading is in radians and is
/// conventionally kept in [-π, π) although relative poses are not normalized.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pose {
    /// Position along x.
    pub x: f64,
    /// Position along y.
    pub y: f64,
    /// Heading in radians, counter-clockwise from +x.
    pub heading: f64,
}

impl Pose {
    /// Creates a pose.
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    /// Scales the position by `factor`, the heading is unchanged.
    pub fn scaled(&self, factor: f64) -> Self {
        Pose {
            x: self.x * factor,
            y: self.y * factor,
            heading: self.heading,
        }
    }

    /// Maps a pose expressed in this pose's local frame, with positions
    /// multiplied by `scale`, back into the frame this pose lives in.
    pub fn compose(&self, local: &Pose, scale: f64) -> Pose {
        let rotated = Rotation2::new(self.heading) * Vector2::new(local.x, local.y);
        Pose {
            x: rotated.x * scale + self.x,
            y: rotated.y * scale + self.y,
            heading: normalize_angle(local.heading + self.heading),
        }
    }
}

impl From<[f64; 3]> for Pose {
    fn from(v: [f64; 3]) -> Self {
        Pose::new(v[0], v[1], v[2])
    }
}

impl From<(f64, f64, f64)> for Pose {
    fn from((x, y, heading): (f64, f64, f64)) -> Self {
        Pose::new(x, y, heading)
    }
}

/// Returns the representative of theta mod 2π which lies in [-π, π).
pub fn normalize_angle(theta: f64) -> f64 {
    let theta = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if theta >= PI {
        theta - TAU
    } else {
        theta
    }
}

/// Polar coordinates (r, θ) of the point (x, y).
pub fn to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Expresses `p2` in the frame whose origin is `p1` and whose x-axis points
/// along `p1.heading`.
pub fn relative_pose(p1: &Pose, p2: &Pose) -> Pose {
    let delta = Vector2::new(p2.x - p1.x, p2.y - p1.y);
    let local = Rotation2::new(-p1.heading) * delta;
    Pose {
        x: local.x,
        y: local.y,
        heading: p2.heading - p1.heading,
    }
}

/// Degrees to radians.
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Radians to degrees.
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_range() {
        for theta in [
            0.0,
            PI,
            -PI,
            TAU,
            -TAU,
            3.0 * PI,
            -3.0 * PI,
            1000.0 * TAU + 0.25,
            -1e6,
            1e9,
            -1e-17,
        ] {
            let n = normalize_angle(theta);
            assert!((-PI..PI).contains(&n), "{} -> {}", theta, n);
        }
        assert_eq!(normalize_angle(PI), -PI);
        assert!((normalize_angle(1000.0 * TAU + 0.25) - 0.25).abs() < 1e-9);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn polar() {
        let (r, theta) = to_polar(3.0, 4.0);
        assert!((r - 5.0).abs() < 1e-12);
        assert!((theta - 4.0f64.atan2(3.0)).abs() < 1e-12);

        let (r, theta) = to_polar(0.0, -2.0);
        assert!((r - 2.0).abs() < 1e-12);
        assert!((theta + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn relative() {
        let p1 = Pose::new(1.0, 1.0, PI / 2.0);
        let p2 = Pose::new(1.0, 3.0, PI);
        let rel = relative_pose(&p1, &p2);
        assert!((rel.x - 2.0).abs() < 1e-12);
        assert!(rel.y.abs() < 1e-12);
        assert!((rel.heading - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn compose_inverts_relative() {
        let p1 = Pose::new(-2.0, 0.5, 2.3);
        let p2 = Pose::new(4.0, -1.5, -0.7);
        let back = p1.compose(&relative_pose(&p1, &p2), 1.0);
        assert!((back.x - p2.x).abs() < 1e-9);
        assert!((back.y - p2.y).abs() < 1e-9);
        assert!((back.heading - p2.heading).abs() < 1e-9);
    }
}
