// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! The twelve Reeds-Shepp path families.
//!
//! Each function takes the goal `(x, y, phi)` relative to a start at the
//! origin facing +x and returns the single path of its family reaching it,
//! or an empty path when the family cannot.  The formulas are those of
//! Reeds & Shepp, "Optimal paths for a car that goes both forwards and
//! backwards" (1990), section 8, with the published typos corrected.
//!
//! Notation in the family names: C is a turn, S a straight, `|` a cusp
//! (gear change), `u` marks two turns of equal length and `[π/2]` a quarter
//! turn.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    geometry::{normalize_angle as m, to_polar},
    path::{Gear, Path, PathElement, Steering},
};

/// Signature shared by every path family.
pub type Formula = fn(f64, f64, f64) -> Path;

/// All families in enumeration order.  The order is used to break ties
/// between candidates of equal length.
pub const FORMULAS: [Formula; 12] = [
    csc_same, csc_opposite, c_c_c, c_cc, cc_c, ccu_cuc, c_cucu_c, c_c2sc_same, csc2_c_same,
    c_c2sc_opposite, csc2_c_opposite, c_c2sc2_c,
];

fn acos(v: f64) -> f64 {
    v.clamp(-1.0, 1.0).acos()
}

fn asin(v: f64) -> f64 {
    v.clamp(-1.0, 1.0).asin()
}

fn sqrt(v: f64) -> f64 {
    v.max(0.0).sqrt()
}

/// Circle centre offset for families ending on a turn in the same
/// direction as the first.
fn polar_same(x: f64, y: f64, phi: f64) -> (f64, f64) {
    to_polar(x - phi.sin(), y - 1.0 + phi.cos())
}

/// Circle centre offset for families ending on a turn in the opposite
/// direction to the first.
fn polar_opposite(x: f64, y: f64, phi: f64) -> (f64, f64) {
    to_polar(x + phi.sin(), y - 1.0 - phi.cos())
}

fn path(elements: &[(f64, Steering, Gear)]) -> Path {
    elements
        .iter()
        .map(|&(param, steering, gear)| PathElement::new(param, steering, gear))
        .collect::<Vec<_>>()
        .into()
}

/// 8.1: CSC with both turns in the same direction.
pub fn csc_same(x: f64, y: f64, phi: f64) -> Path {
    let (u, t) = polar_same(x, y, phi);
    let v = m(phi - t);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Straight, Gear::Forward),
        (v, Steering::Left, Gear::Forward),
    ])
}

/// 8.2: CSC with turns in opposite directions.
pub fn csc_opposite(x: f64, y: f64, phi: f64) -> Path {
    let phi = m(phi);
    let (rho, t1) = polar_opposite(x, y, phi);

    if rho * rho < 4.0 {
        return Path::default();
    }

    let u = sqrt(rho * rho - 4.0);
    let t = m(t1 + 2.0f64.atan2(u));
    let v = m(t - phi);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Straight, Gear::Forward),
        (v, Steering::Right, Gear::Forward),
    ])
}

/// 8.3: C|C|C
pub fn c_c_c(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_same(x, y, phi);

    if rho > 4.0 {
        return Path::default();
    }

    let a = acos(rho / 4.0);
    let t = m(theta + FRAC_PI_2 + a);
    let u = m(PI - 2.0 * a);
    let v = m(phi - t - u);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Right, Gear::Backward),
        (v, Steering::Left, Gear::Forward),
    ])
}

/// 8.4 (first form): C|CC
pub fn c_cc(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_same(x, y, phi);

    if rho > 4.0 {
        return Path::default();
    }

    let a = acos(rho / 4.0);
    let t = m(theta + FRAC_PI_2 + a);
    let u = m(PI - 2.0 * a);
    let v = m(t + u - phi);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Right, Gear::Backward),
        (v, Steering::Left, Gear::Backward),
    ])
}

/// 8.4 (second form): CC|C
pub fn cc_c(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_same(x, y, phi);

    if rho > 4.0 {
        return Path::default();
    }

    let u = acos(1.0 - rho * rho / 8.0);
    // 2 sin(u) / rho tends to 1 as rho goes to 0
    let ratio = if rho > 0.0 { 2.0 * u.sin() / rho } else { 1.0 };
    let a = asin(ratio);
    let t = m(theta + FRAC_PI_2 - a);
    let v = m(t - u - phi);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Right, Gear::Forward),
        (v, Steering::Left, Gear::Backward),
    ])
}

/// 8.7: CCu|CuC
pub fn ccu_cuc(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_opposite(x, y, phi);

    if rho > 4.0 {
        return Path::default();
    }

    let (t, u) = if rho <= 2.0 {
        let a = acos((rho + 2.0) / 4.0);
        (m(theta + FRAC_PI_2 + a), m(a))
    } else {
        let a = acos((rho - 2.0) / 4.0);
        (m(theta + FRAC_PI_2 - a), m(PI - a))
    };
    let v = m(phi - t + 2.0 * u);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Right, Gear::Forward),
        (u, Steering::Left, Gear::Backward),
        (v, Steering::Right, Gear::Backward),
    ])
}

/// 8.8: C|CuCu|C
pub fn c_cucu_c(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_opposite(x, y, phi);
    let u1 = (20.0 - rho * rho) / 16.0;

    if !(rho <= 6.0 && (0.0..=1.0).contains(&u1)) {
        return Path::default();
    }

    let u = acos(u1);
    let a = asin(2.0 * u.sin() / rho);
    let t = m(theta + FRAC_PI_2 + a);
    let v = m(t - phi);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Right, Gear::Backward),
        (u, Steering::Left, Gear::Backward),
        (v, Steering::Right, Gear::Forward),
    ])
}

/// 8.9 (first form): C|C[π/2]SC, final turn in the first turn's direction.
pub fn c_c2sc_same(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_same(x, y, phi);

    if rho < 2.0 {
        return Path::default();
    }

    let u = sqrt(rho * rho - 4.0) - 2.0;
    let a = 2.0f64.atan2(u + 2.0);
    let t = m(theta + FRAC_PI_2 + a);
    let v = m(t - phi + FRAC_PI_2);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (FRAC_PI_2, Steering::Right, Gear::Backward),
        (u, Steering::Straight, Gear::Backward),
        (v, Steering::Left, Gear::Backward),
    ])
}

/// 8.9 (second form): CSC[π/2]|C, final turn in the first turn's direction.
pub fn csc2_c_same(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_same(x, y, phi);

    if rho < 2.0 {
        return Path::default();
    }

    let u = sqrt(rho * rho - 4.0) - 2.0;
    let a = (u + 2.0).atan2(2.0);
    let t = m(theta + FRAC_PI_2 - a);
    let v = m(t - phi - FRAC_PI_2);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Straight, Gear::Forward),
        (FRAC_PI_2, Steering::Right, Gear::Forward),
        (v, Steering::Left, Gear::Backward),
    ])
}

/// 8.10 (first form): C|C[π/2]SC, final turn opposite the first.
pub fn c_c2sc_opposite(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_opposite(x, y, phi);

    if rho < 2.0 {
        return Path::default();
    }

    let t = m(theta + FRAC_PI_2);
    let u = rho - 2.0;
    let v = m(phi - t - FRAC_PI_2);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (FRAC_PI_2, Steering::Right, Gear::Backward),
        (u, Steering::Straight, Gear::Backward),
        (v, Steering::Right, Gear::Backward),
    ])
}

/// 8.10 (second form): CSC[π/2]|C, final turn opposite the first.
pub fn csc2_c_opposite(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_opposite(x, y, phi);

    if rho < 2.0 {
        return Path::default();
    }

    let t = m(theta);
    let u = rho - 2.0;
    let v = m(phi - t - FRAC_PI_2);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (u, Steering::Straight, Gear::Forward),
        (FRAC_PI_2, Steering::Left, Gear::Forward),
        (v, Steering::Right, Gear::Backward),
    ])
}

/// 8.11: C|C[π/2]SC[π/2]|C
pub fn c_c2sc2_c(x: f64, y: f64, phi: f64) -> Path {
    let (rho, theta) = polar_opposite(x, y, phi);

    if rho < 4.0 {
        return Path::default();
    }

    let u = sqrt(rho * rho - 4.0) - 4.0;
    let a = 2.0f64.atan2(u + 4.0);
    let t = m(theta + FRAC_PI_2 + a);
    let v = m(t - phi);

    path(&[
        (t, Steering::Left, Gear::Forward),
        (FRAC_PI_2, Steering::Right, Gear::Backward),
        (u, Steering::Straight, Gear::Backward),
        (FRAC_PI_2, Steering::Left, Gear::Backward),
        (v, Steering::Right, Gear::Forward),
    ])
}
