pub mod point;
pub mod stats;

pub use point::{Point2, Turn};
pub use stats::StatsHelper;
