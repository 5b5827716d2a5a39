use crate::prelude::{FeatureBlock, FeatureConfig, FeatureError, FeatureResult};
use crate::processing::contour::{ContourAnalysis, ContourFeatures};
use crate::processing::range_stats::RangeStatistics;
use crate::scan::{FeatureVector, RangeScan};
use crate::telemetry::log::LogManager;

/// Builds one feature vector per scan: range statistics, then the four shape
/// scalars, then the seven invariant moments.
///
/// The extractor holds only validated configuration, so a single instance
/// can be shared across worker threads.
pub struct FeatureExtractor {
    config: FeatureConfig,
    blocks: Vec<Box<dyn FeatureBlock>>,
    logger: LogManager,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> FeatureResult<Self> {
        config.validate()?;
        let blocks: Vec<Box<dyn FeatureBlock>> = vec![
            Box::new(RangeStatistics::new(config.clone())),
            Box::new(ContourFeatures),
        ];
        Ok(Self {
            config,
            blocks,
            logger: LogManager::new("extractor"),
        })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn feature_len(&self) -> usize {
        self.blocks.iter().map(|block| block.width()).sum()
    }

    pub fn extract(&self, scan: &RangeScan) -> FeatureResult<FeatureVector> {
        self.extract_with_contour(scan).map(|(vector, _)| vector)
    }

    /// Feature vector plus the contour intermediates it was built from.
    pub fn extract_with_contour(
        &self,
        scan: &RangeScan,
    ) -> FeatureResult<(FeatureVector, ContourAnalysis)> {
        scan.validate()?;
        let contour = ContourFeatures::analyze(scan)?;

        let mut values = Vec::with_capacity(self.feature_len());
        for block in &self.blocks {
            let before = values.len();
            block.append(scan, &contour, &mut values)?;
            debug_assert_eq!(values.len() - before, block.width(), "{}", block.name());
        }

        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(FeatureError::NonFiniteValue {
                what: "feature",
                index,
            });
        }

        self.logger.record(&format!(
            "scan of {} samples -> {} features",
            scan.len(),
            values.len()
        ));
        Ok((FeatureVector::new(values), contour))
    }
}
