use crate::math::Point2;
use crate::processing::moments::CentralMoments;
use crate::telemetry::log::LogManager;
use std::f64::consts::PI;

/// Everything the shape scalars are derived from.
#[derive(Debug, Clone, Copy)]
pub struct ShapeInput<'a> {
    pub area: f64,
    pub perimeter: f64,
    pub convex_perimeter: f64,
    pub centroid: Point2,
    pub vertices: &'a [Point2],
    /// Raw (not normalized) central moments about `centroid`.
    pub moments: &'a CentralMoments,
}

/// Dimensionless shape scalars.
///
/// Compactness, roundness, and form factor sit near 1 for convex,
/// near-circular contours. They are not clamped, so concave or
/// self-intersecting contours can exceed 1. A ratio whose divisor is exactly
/// zero is reported as 0 and counted in `substitutions`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeMetrics {
    pub compactness: f64,
    pub roundness: f64,
    pub form_factor: f64,
    pub eccentricity: f64,
    pub circum_circle_area: f64,
    pub substitutions: usize,
}

impl ShapeMetrics {
    /// The four scalars in feature-vector order.
    pub fn scalars(&self) -> [f64; 4] {
        [
            self.compactness,
            self.roundness,
            self.form_factor,
            self.eccentricity,
        ]
    }
}

pub struct ShapeDescriptor;

impl ShapeDescriptor {
    pub fn describe(input: &ShapeInput<'_>) -> ShapeMetrics {
        let logger = LogManager::new("shape");
        let mut substitutions = 0;
        let mut ratio = |name: &str, numerator: f64, divisor: f64| {
            if divisor == 0.0 {
                substitutions += 1;
                logger.warn(&format!("{} divisor is zero, reporting 0", name));
                0.0
            } else {
                numerator / divisor
            }
        };

        let circle_area_scaled = 4.0 * PI * input.area;
        let circum_circle_area = Self::circumscribed_circle_area(&input.centroid, input.vertices);
        let mu = input.moments;
        let elongation = (mu.mu02 - mu.mu20).powi(2) + 4.0 * mu.mu11 * mu.mu11;

        let compactness = ratio(
            "compactness",
            circle_area_scaled,
            input.perimeter * input.perimeter,
        );
        let roundness = ratio(
            "roundness",
            circle_area_scaled,
            input.convex_perimeter * input.convex_perimeter,
        );
        let form_factor = ratio("form factor", input.area, circum_circle_area);
        let eccentricity = ratio("eccentricity", elongation, input.area);

        let metrics = ShapeMetrics {
            compactness,
            roundness,
            form_factor,
            eccentricity,
            circum_circle_area,
            substitutions,
        };
        logger.record(&format!("{:?}", metrics));
        metrics
    }

    /// Area of the smallest centroid-centred circle holding every vertex.
    pub fn circumscribed_circle_area(centroid: &Point2, vertices: &[Point2]) -> f64 {
        let max_dist = vertices
            .iter()
            .map(|vertex| centroid.distance(vertex))
            .fold(0.0, f64::max);
        PI * max_dist * max_dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::moments::MomentAnalyzer;
    use approx::assert_abs_diff_eq;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
        ]
    }

    #[test]
    fn square_ratios() {
        let vertices = square();
        let centroid = MomentAnalyzer::centroid(&vertices);
        let moments = MomentAnalyzer::central_moments(&vertices, &centroid);
        let metrics = ShapeDescriptor::describe(&ShapeInput {
            area: 4.0,
            perimeter: 8.0,
            convex_perimeter: 8.0,
            centroid,
            vertices: &vertices,
            moments: &moments,
        });

        assert_abs_diff_eq!(metrics.compactness, PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.roundness, PI / 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.circum_circle_area, 2.0 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.form_factor, 2.0 / PI, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.eccentricity, 0.0, epsilon = 1e-12);
        assert_eq!(metrics.substitutions, 0);
    }

    #[test]
    fn eccentricity_uses_raw_second_order_moments() {
        let vertices = square();
        let moments = CentralMoments {
            mu00: 4.0,
            mu20: 2.0,
            mu02: 8.0,
            mu11: 1.0,
            ..Default::default()
        };
        let metrics = ShapeDescriptor::describe(&ShapeInput {
            area: 10.0,
            perimeter: 8.0,
            convex_perimeter: 8.0,
            centroid: Point2::ORIGIN,
            vertices: &vertices,
            moments: &moments,
        });
        assert_abs_diff_eq!(metrics.eccentricity, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_divisors_become_zero() {
        let vertices = [Point2::new(2.0, 0.0)];
        let moments = MomentAnalyzer::central_moments(&vertices, &vertices[0]);
        let metrics = ShapeDescriptor::describe(&ShapeInput {
            area: 0.0,
            perimeter: 0.0,
            convex_perimeter: 0.0,
            centroid: vertices[0],
            vertices: &vertices,
            moments: &moments,
        });

        assert_eq!(metrics.scalars(), [0.0; 4]);
        assert_eq!(metrics.substitutions, 4);
    }
}
