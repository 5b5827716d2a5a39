use crate::math::stats::StatsHelper;
use crate::prelude::{FeatureBlock, FeatureConfig, FeatureError, FeatureResult};
use crate::processing::contour::ContourAnalysis;
use crate::scan::RangeScan;
use crate::telemetry::log::LogManager;

/// Range-difference and gap statistics taken straight from the range array.
///
/// Every statistic walks the scan as a ring: the last sample pairs with the
/// first.
pub struct RangeStatistics {
    config: FeatureConfig,
    logger: LogManager,
}

impl RangeStatistics {
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("range_stats"),
        }
    }

    /// Mean and population standard deviation of `|min(r[i+1], t) - min(r[i], t)|`.
    pub fn mean_sdev_range_diff(ranges: &[f64], threshold: f64) -> FeatureResult<(f64, f64)> {
        let diffs: Vec<f64> = ring_pairs(ranges)
            .map(|(a, b)| (b.min(threshold) - a.min(threshold)).abs())
            .collect();
        StatsHelper::mean_sdev(&diffs)
    }

    /// Appends the whole block for `ranges` to `out`.
    pub fn append_ranges(&self, ranges: &[f64], out: &mut Vec<f64>) -> FeatureResult<()> {
        if ranges.is_empty() {
            return Err(FeatureError::EmptyScan);
        }
        let before = out.len();

        let (mean, sdev) = Self::mean_sdev_range_diff(ranges, f64::INFINITY)?;
        out.extend([mean, sdev]);
        for threshold in self.config.range_diff.values() {
            let (mean, sdev) = Self::mean_sdev_range_diff(ranges, threshold)?;
            out.extend([mean, sdev]);
        }

        let (mean, sdev) = StatsHelper::mean_sdev(ranges)?;
        out.extend([mean, sdev]);

        for threshold in self
            .config
            .gap_fine
            .values()
            .chain(self.config.gap_coarse.values())
        {
            out.push(Self::n_gaps(ranges, threshold) as f64);
        }

        self.logger.record(&format!(
            "samples {} range mean {:.4} sdev {:.4} block {}",
            ranges.len(),
            mean,
            sdev,
            out.len() - before
        ));
        Ok(())
    }

    /// Count of neighbouring samples whose unclipped difference exceeds `threshold`.
    pub fn n_gaps(ranges: &[f64], threshold: f64) -> usize {
        ring_pairs(ranges)
            .filter(|(a, b)| (b - a).abs() > threshold)
            .count()
    }
}

fn ring_pairs(ranges: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    ranges
        .iter()
        .copied()
        .zip(ranges.iter().copied().cycle().skip(1))
}

impl FeatureBlock for RangeStatistics {
    fn name(&self) -> &'static str {
        "range_stats"
    }

    fn width(&self) -> usize {
        self.config.range_block_len()
    }

    fn append(
        &self,
        scan: &RangeScan,
        _contour: &ContourAnalysis,
        out: &mut Vec<f64>,
    ) -> FeatureResult<()> {
        self.append_ranges(&scan.ranges, out)
    }
}
