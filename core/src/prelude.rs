use crate::processing::ContourAnalysis;
use crate::scan::RangeScan;
use serde::{Deserialize, Serialize};

/// Upper bound on the values a single grid may produce.
pub const MAX_THRESHOLDS: usize = 1_000_000;

/// Evenly spaced thresholds `start, start + step, ...` strictly below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdGrid {
    pub start: f64,
    pub step: f64,
    pub end: f64,
}

impl ThresholdGrid {
    pub const fn new(start: f64, step: f64, end: f64) -> Self {
        Self { start, step, end }
    }

    pub fn validate(&self, name: &str) -> FeatureResult<()> {
        if !(self.start.is_finite() && self.step.is_finite() && self.end.is_finite()) {
            return Err(FeatureError::Configuration(format!(
                "{} grid has non-finite bounds",
                name
            )));
        }
        if self.step <= 0.0 {
            return Err(FeatureError::Configuration(format!(
                "{} grid step must be positive, got {}",
                name, self.step
            )));
        }
        if self.end <= self.start {
            return Err(FeatureError::Configuration(format!(
                "{} grid end {} must exceed start {}",
                name, self.end, self.start
            )));
        }
        if self.count().is_none() {
            return Err(FeatureError::Configuration(format!(
                "{} grid step {} yields more than {} thresholds",
                name, self.step, MAX_THRESHOLDS
            )));
        }
        Ok(())
    }

    /// Number of thresholds in the grid; 0 for a grid `validate` rejects.
    pub fn len(&self) -> usize {
        self.count().unwrap_or(0)
    }

    /// Computed from the span rather than by accumulating `step`, so
    /// `0..20 step 0.5` is exactly 40 values. `start` itself always counts.
    fn count(&self) -> Option<usize> {
        if !(self.start.is_finite() && self.step.is_finite() && self.end.is_finite())
            || self.step <= 0.0
            || self.end <= self.start
        {
            return None;
        }
        let span = (self.end - self.start) / self.step;
        if !span.is_finite() {
            return None;
        }
        let count = (span - 1e-9).ceil().max(1.0);
        if count > MAX_THRESHOLDS as f64 {
            return None;
        }
        Some(count as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |k| self.start + k as f64 * self.step)
    }
}

/// Threshold grids that shape the range-statistics block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub range_diff: ThresholdGrid,
    pub gap_fine: ThresholdGrid,
    pub gap_coarse: ThresholdGrid,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            range_diff: ThresholdGrid::new(0.0, 5.0, 50.0),
            gap_fine: ThresholdGrid::new(0.0, 0.5, 20.0),
            gap_coarse: ThresholdGrid::new(20.0, 5.0, 50.0),
        }
    }
}

/// Shape scalars appended after the range-statistics block.
pub const SHAPE_FEATURES: usize = 4;
/// Invariant moments appended last.
pub const MOMENT_FEATURES: usize = 7;

impl FeatureConfig {
    pub fn validate(&self) -> FeatureResult<()> {
        self.range_diff.validate("range_diff")?;
        self.gap_fine.validate("gap_fine")?;
        self.gap_coarse.validate("gap_coarse")?;
        Ok(())
    }

    /// Length of the range-statistics block alone.
    pub fn range_block_len(&self) -> usize {
        2 + 2 * self.range_diff.len() + 2 + self.gap_fine.len() + self.gap_coarse.len()
    }

    /// Total feature-vector length for this configuration.
    pub fn feature_len(&self) -> usize {
        self.range_block_len() + SHAPE_FEATURES + MOMENT_FEATURES
    }

    /// Column names in feature-vector order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_len());
        names.push("range_diff_mean_inf".to_string());
        names.push("range_diff_sdev_inf".to_string());
        for t in self.range_diff.values() {
            names.push(format!("range_diff_mean_{}", t));
            names.push(format!("range_diff_sdev_{}", t));
        }
        names.push("range_mean".to_string());
        names.push("range_sdev".to_string());
        for t in self.gap_fine.values().chain(self.gap_coarse.values()) {
            names.push(format!("gaps_{}", t));
        }
        for name in ["compactness", "roundness", "form_factor", "eccentricity"] {
            names.push(name.to_string());
        }
        for k in 1..=MOMENT_FEATURES {
            names.push(format!("moment_{}", k));
        }
        names
    }
}

/// Common error type for feature extraction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("scan contains no range samples")]
    EmptyScan,
    #[error("non-finite {what} at index {index}")]
    NonFiniteValue { what: &'static str, index: usize },
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type FeatureResult<T> = Result<T, FeatureError>;

/// A contiguous block of the feature vector computed from one scan.
///
/// Blocks hold only configuration; every call works on its own
/// intermediates, so one block can serve many threads at once. The contour
/// chain is run once per scan and handed to every block.
pub trait FeatureBlock: Send + Sync {
    fn name(&self) -> &'static str;
    /// Number of values `append` pushes for every scan.
    fn width(&self) -> usize;
    fn append(
        &self,
        scan: &RangeScan,
        contour: &ContourAnalysis,
        out: &mut Vec<f64>,
    ) -> FeatureResult<()>;
}
