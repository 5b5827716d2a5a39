use crate::math::Point2;
use crate::prelude::{FeatureBlock, FeatureError, FeatureResult, MOMENT_FEATURES, SHAPE_FEATURES};
use crate::processing::hull::{ConvexHull, ConvexHullBuilder};
use crate::processing::moments::{CentralMoments, MomentAnalyzer, MomentSet};
use crate::processing::polygon::{Polygon, PolygonBuilder};
use crate::processing::shape::{ShapeDescriptor, ShapeInput, ShapeMetrics};
use crate::scan::RangeScan;

/// Every intermediate of the contour chain for one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourAnalysis {
    pub polygon: Polygon,
    pub hull: ConvexHull,
    pub centroid: Point2,
    pub central_moments: CentralMoments,
    pub moments: MomentSet,
    pub shape: ShapeMetrics,
}

/// Polygon, hull, moment, and shape stages chained over one scan.
pub struct ContourFeatures;

impl ContourFeatures {
    pub fn analyze(scan: &RangeScan) -> FeatureResult<ContourAnalysis> {
        if scan.is_empty() {
            return Err(FeatureError::EmptyScan);
        }

        let polygon = PolygonBuilder::build(scan);
        let hull = ConvexHullBuilder::build(&polygon.vertices);
        let centroid = MomentAnalyzer::centroid(&polygon.vertices);
        let central_moments = MomentAnalyzer::central_moments(&polygon.vertices, &centroid);
        let moments = MomentAnalyzer::invariants(&central_moments.normalized());
        let shape = ShapeDescriptor::describe(&ShapeInput {
            area: polygon.area(),
            perimeter: polygon.perimeter,
            convex_perimeter: hull.perimeter,
            centroid,
            vertices: &polygon.vertices,
            moments: &central_moments,
        });

        Ok(ContourAnalysis {
            polygon,
            hull,
            centroid,
            central_moments,
            moments,
            shape,
        })
    }
}

impl FeatureBlock for ContourFeatures {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn width(&self) -> usize {
        SHAPE_FEATURES + MOMENT_FEATURES
    }

    fn append(
        &self,
        _scan: &RangeScan,
        contour: &ContourAnalysis,
        out: &mut Vec<f64>,
    ) -> FeatureResult<()> {
        out.extend(contour.shape.scalars());
        out.extend_from_slice(contour.moments.as_slice());
        Ok(())
    }
}
