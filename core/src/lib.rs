//! Shape and range-statistics features for single 2D range scans.
//!
//! A scan is rebuilt as a closed polygon, reduced to its convex hull,
//! centroid, and invariant moments, and summarised as a fixed-length vector
//! for a downstream place classifier. Every call is a pure function of one
//! `RangeScan`.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod scan;
pub mod telemetry;

pub use prelude::{FeatureBlock, FeatureConfig, FeatureError, FeatureResult, ThresholdGrid};
pub use processing::FeatureExtractor;
pub use scan::{FeatureVector, RangeScan};
