// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::fmt;

use crate::geometry::Pose;

/// Direction of curvature for a path element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Steering {
    /// Counter-clockwise turn.
    Left = 1,
    /// Clockwise turn.
    Right = -1,
    /// No turn.
    Straight = 0,
}

impl Steering {
    /// Sign of the heading change when driving forward.
    pub fn sign(self) -> i8 {
        self as i8
    }

    /// Swaps left and right, straight is unchanged.
    pub fn reversed(self) -> Self {
        match self {
            Steering::Left => Steering::Right,
            Steering::Right => Steering::Left,
            Steering::Straight => Steering::Straight,
        }
    }
}

impl fmt::Display for Steering {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Steering::Left => write!(f, "L"),
            Steering::Right => write!(f, "R"),
            Steering::Straight => write!(f, "S"),
        }
    }
}

/// Direction of travel for a path element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Gear {
    /// Driving forward.
    Forward = 1,
    /// Driving in reverse.
    Backward = -1,
}

impl Gear {
    /// +1 forward, -1 backward.
    pub fn sign(self) -> i8 {
        self as i8
    }

    /// The opposite gear.
    pub fn reversed(self) -> Self {
        match self {
            Gear::Forward => Gear::Backward,
            Gear::Backward => Gear::Forward,
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Gear::Forward => write!(f, "+"),
            Gear::Backward => write!(f, "-"),
        }
    }
}

/// A single arc or straight segment of a unit turning radius path.  The
/// param is the arc length, which for turns equals the turned angle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PathElement {
    param: f64,
    /// Curvature direction.
    pub steering: Steering,
    /// Travel direction.
    pub gear: Gear,
}

impl PathElement {
    /// Creates an element, a negative param is stored as its magnitude
    /// travelled in the opposite gear.
    pub fn new(param: f64, steering: Steering, gear: Gear) -> Self {
        if param >= 0.0 {
            PathElement {
                param,
                steering,
                gear,
            }
        } else {
            PathElement {
                param: -param,
                steering,
                gear: gear.reversed(),
            }
        }
    }

    /// Non-negative arc length of the element.
    pub fn param(&self) -> f64 {
        self.param
    }

    /// Same element turning the other way.
    pub fn reverse_steering(&self) -> Self {
        PathElement {
            steering: self.steering.reversed(),
            ..*self
        }
    }

    /// Same element driven in the other gear.
    pub fn reverse_gear(&self) -> Self {
        PathElement {
            gear: self.gear.reversed(),
            ..*self
        }
    }

    /// Pose reached in the element's local frame after travelling `t` along
    /// it, with the start of the element at the origin facing +x.
    pub fn evaluate(&self, t: f64) -> Pose {
        let t = t * self.gear.sign() as f64;
        match self.steering {
            Steering::Straight => Pose::new(t, 0.0, 0.0),
            Steering::Left => Pose::new(t.sin(), 1.0 - t.cos(), t),
            Steering::Right => Pose::new(t.sin(), t.cos() - 1.0, -t),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{:.2}", self.steering, self.gear, self.param)
    }
}

/// An ordered sequence of path elements.  An empty path means the maneuver
/// does not exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Wraps the elements in driving order.
    pub fn new(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Elements in driving order.
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when the path has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the elements in driving order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// Sum of all element params.
    pub fn length(&self) -> f64 {
        self.elements.iter().map(PathElement::param).sum()
    }

    /// Drives the same path with every gear inverted.
    pub fn timeflip(&self) -> Self {
        Path {
            elements: self.elements.iter().map(PathElement::reverse_gear).collect(),
        }
    }

    /// Mirrors the path across the start's x-axis.
    pub fn reflect(&self) -> Self {
        Path {
            elements: self
                .elements
                .iter()
                .map(PathElement::reverse_steering)
                .collect(),
        }
    }

    /// Drops elements which carry no motion.
    pub fn without_zero_elements(self) -> Self {
        Path {
            elements: self
                .elements
                .into_iter()
                .filter(|e| e.param != 0.0)
                .collect(),
        }
    }
}

impl From<Vec<PathElement>> for Path {
    fn from(elements: Vec<PathElement>) -> Self {
        Path::new(elements)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "] length={:.3}", self.length())
    }
}
