use crate::math::Point2;
use crate::scan::RangeScan;
use crate::telemetry::log::LogManager;

/// Closed contour reconstructed from a scan, one vertex per range sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
    /// Shoelace area; positive when the vertices run counter-clockwise.
    pub signed_area: f64,
    pub perimeter: f64,
}

impl Polygon {
    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

pub struct PolygonBuilder;

impl PolygonBuilder {
    pub fn build(scan: &RangeScan) -> Polygon {
        let vertices: Vec<Point2> = scan
            .ranges
            .iter()
            .enumerate()
            .map(|(idx, &range)| Point2::from_polar(range, scan.bearing(idx)))
            .collect();
        Self::from_vertices(vertices)
    }

    /// Area and perimeter of an implicitly closed vertex loop.
    ///
    /// The closing edge from the last vertex back to the first is always
    /// counted, so two vertices give twice their separation and a single
    /// vertex gives zero.
    pub fn from_vertices(vertices: Vec<Point2>) -> Polygon {
        let mut twice_area = 0.0;
        let mut perimeter = 0.0;

        for (idx, current) in vertices.iter().enumerate() {
            let next = &vertices[(idx + 1) % vertices.len()];
            twice_area += current.x * next.y - next.x * current.y;
            perimeter += current.distance(next);
        }

        let polygon = Polygon {
            vertices,
            signed_area: twice_area / 2.0,
            perimeter,
        };
        LogManager::new("polygon").record(&format!(
            "vertices {} area {:.4} perimeter {:.4}",
            polygon.len(),
            polygon.area(),
            polygon.perimeter
        ));
        polygon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

    #[test]
    fn unit_ranges_over_quarter_turns_form_a_diamond() {
        let scan = RangeScan::new(vec![1.0; 4], 0.0, FRAC_PI_2);
        let polygon = PolygonBuilder::build(&scan);
        assert_eq!(polygon.len(), 4);
        assert_abs_diff_eq!(polygon.signed_area, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(polygon.perimeter, 4.0 * SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_sweep_has_negative_signed_area() {
        let scan = RangeScan::new(vec![1.0; 4], 0.0, -FRAC_PI_2);
        let polygon = PolygonBuilder::build(&scan);
        assert_abs_diff_eq!(polygon.signed_area, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(polygon.area(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn two_points_count_the_closing_edge() {
        let scan = RangeScan::new(vec![3.0, 3.0], 0.0, PI);
        let polygon = PolygonBuilder::build(&scan);
        assert_abs_diff_eq!(polygon.perimeter, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(polygon.area(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn single_and_empty_inputs_are_degenerate() {
        let single = PolygonBuilder::build(&RangeScan::new(vec![5.0], 0.3, 0.1));
        assert_eq!(single.perimeter, 0.0);
        assert_eq!(single.area(), 0.0);

        let empty = PolygonBuilder::from_vertices(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.perimeter, 0.0);
        assert_eq!(empty.area(), 0.0);
    }
}
