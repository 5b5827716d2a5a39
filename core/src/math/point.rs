//! Cartesian points and the turn test shared by the contour stages.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Point in the sensor frame, same units as the scan ranges.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Direction of travel through three consecutive points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Collinear,
    Clockwise,
    CounterClockwise,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_polar(range: f64, bearing: f64) -> Self {
        let (sin, cos) = bearing.sin_cos();
        Self::new(range * cos, range * sin)
    }

    #[inline]
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate about the origin by `angle` radians, counter-clockwise.
    #[inline]
    pub fn rotated(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// `(q.y - p.y)(r.x - q.x) - (q.x - p.x)(r.y - q.y)`.
    ///
    /// Negative for a counter-clockwise turn p -> q -> r, positive for
    /// clockwise, zero when collinear.
    #[inline]
    pub fn orientation_value(p: &Point2, q: &Point2, r: &Point2) -> f64 {
        (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
    }

    pub fn orientation(p: &Point2, q: &Point2, r: &Point2) -> Turn {
        let value = Self::orientation_value(p, q, r);
        if value == 0.0 {
            Turn::Collinear
        } else if value > 0.0 {
            Turn::Clockwise
        } else {
            Turn::CounterClockwise
        }
    }
}

impl Add for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2::new(self.x - other.x, self.y - other.y)
    }
}
