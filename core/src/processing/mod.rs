pub mod assembler;
pub mod contour;
pub mod hull;
pub mod moments;
pub mod polygon;
pub mod range_stats;
pub mod shape;

pub use assembler::FeatureExtractor;
pub use contour::{ContourAnalysis, ContourFeatures};
pub use hull::{ConvexHull, ConvexHullBuilder};
pub use moments::{CentralMoments, MomentAnalyzer, MomentSet};
pub use polygon::{Polygon, PolygonBuilder};
pub use range_stats::RangeStatistics;
pub use shape::{ShapeDescriptor, ShapeInput, ShapeMetrics};
