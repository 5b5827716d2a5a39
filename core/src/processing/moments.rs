//! Centroid, central moments, and the seven invariant moments of a contour.
//!
//! Moments are taken over the polygon vertices treated as unit point masses,
//! so `mu_00` is the vertex count.

use crate::math::Point2;
use crate::telemetry::log::LogManager;

/// Raw central moments `mu_pq = sum(X^p * Y^q)` about the centroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CentralMoments {
    pub mu00: f64,
    pub mu20: f64,
    pub mu02: f64,
    pub mu11: f64,
    pub mu30: f64,
    pub mu03: f64,
    pub mu21: f64,
    pub mu12: f64,
}

impl CentralMoments {
    /// `eta_pq = mu_pq / mu_00^(1 + (p + q) / 2)`.
    pub fn normalized(&self) -> CentralMoments {
        if self.mu00 == 0.0 {
            return CentralMoments::default();
        }
        let second = self.mu00.powi(2);
        let third = self.mu00.powf(2.5);
        CentralMoments {
            mu00: 1.0,
            mu20: self.mu20 / second,
            mu02: self.mu02 / second,
            mu11: self.mu11 / second,
            mu30: self.mu30 / third,
            mu03: self.mu03 / third,
            mu21: self.mu21 / third,
            mu12: self.mu12 / third,
        }
    }
}

/// The seven Hu-style invariants, unchanged by translation and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MomentSet(pub [f64; 7]);

impl MomentSet {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

pub struct MomentAnalyzer;

impl MomentAnalyzer {
    /// Unweighted mean of the vertices; the origin for an empty slice.
    pub fn centroid(vertices: &[Point2]) -> Point2 {
        if vertices.is_empty() {
            return Point2::ORIGIN;
        }
        let count = vertices.len() as f64;
        let sum = vertices
            .iter()
            .fold(Point2::ORIGIN, |acc, &vertex| acc + vertex);
        Point2::new(sum.x / count, sum.y / count)
    }

    pub fn central_moments(vertices: &[Point2], centroid: &Point2) -> CentralMoments {
        let mut moments = CentralMoments {
            mu00: vertices.len() as f64,
            ..Default::default()
        };
        for vertex in vertices {
            let Point2 { x, y } = *vertex - *centroid;
            moments.mu20 += x * x;
            moments.mu02 += y * y;
            moments.mu11 += x * y;
            moments.mu30 += x * x * x;
            moments.mu03 += y * y * y;
            moments.mu21 += x * x * y;
            moments.mu12 += x * y * y;
        }
        moments
    }

    pub fn moments(vertices: &[Point2], centroid: &Point2) -> MomentSet {
        let eta = Self::central_moments(vertices, centroid).normalized();
        let set = Self::invariants(&eta);
        LogManager::new("moments").record(&format!("invariants {:?}", set.0));
        set
    }

    pub fn invariants(eta: &CentralMoments) -> MomentSet {
        let a = eta.mu30 - 3.0 * eta.mu12;
        let b = 3.0 * eta.mu21 - eta.mu03;
        let c = eta.mu30 + eta.mu12;
        let d = eta.mu21 + eta.mu03;
        let spread = eta.mu20 - eta.mu02;

        MomentSet([
            eta.mu20 + eta.mu02,
            spread * spread + 4.0 * eta.mu11 * eta.mu11,
            a * a + b * b,
            c * c + d * d,
            a * c * (c * c - 3.0 * d * d) + b * d * (3.0 * c * c - d * d),
            spread * (c * c - d * d) + 4.0 * eta.mu11 * c * d,
            b * c * (c * c - 3.0 * d * d) - a * d * (3.0 * c * c - d * d),
        ])
    }
}
