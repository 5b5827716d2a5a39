use crate::prelude::{FeatureError, FeatureResult};
use ndarray::ArrayView1;

pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean and population standard deviation of `samples`.
    pub fn mean_sdev(samples: &[f64]) -> FeatureResult<(f64, f64)> {
        let view = ArrayView1::from(samples);
        let mean = view.mean().ok_or(FeatureError::EmptyScan)?;
        Ok((mean, view.std(0.0)))
    }
}
