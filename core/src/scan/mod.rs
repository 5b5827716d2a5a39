pub mod feature_vector;
pub mod range_scan;

pub use feature_vector::FeatureVector;
pub use range_scan::RangeScan;
