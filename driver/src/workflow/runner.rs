use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::warn;
use placecore::telemetry::{Metrics, MetricsRecorder};
use placecore::{FeatureExtractor, FeatureResult, FeatureVector, RangeScan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;

/// Contour figures reported next to each feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub samples: usize,
    pub longest_range_index: Option<usize>,
    pub area: f64,
    pub perimeter: f64,
    pub convex_perimeter: f64,
    pub hull_vertices: usize,
    pub substitutions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub features: FeatureVector,
    pub summary: ScanSummary,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    extractor: Arc<FeatureExtractor>,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let extractor = config.to_extractor()?;
        Ok(Self {
            config,
            extractor: Arc::new(extractor),
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Scan built from a ranges-only row using the configured bearings.
    pub fn scan_from_ranges(&self, ranges: Vec<f64>) -> RangeScan {
        RangeScan::new(ranges, self.config.angle_min, self.config.angle_increment)
    }

    pub fn analyze(&self, scan: &RangeScan) -> FeatureResult<ScanResult> {
        let outcome = self
            .extractor
            .extract_with_contour(scan)
            .map(|(features, contour)| ScanResult {
                features,
                summary: ScanSummary {
                    samples: scan.len(),
                    longest_range_index: scan.longest_range_index(),
                    area: contour.polygon.area(),
                    perimeter: contour.polygon.perimeter,
                    convex_perimeter: contour.hull.perimeter,
                    hull_vertices: contour.hull.indices.len(),
                    substitutions: contour.shape.substitutions,
                },
            });

        match &outcome {
            Ok(result) => {
                self.metrics.record_processed();
                self.metrics.record_substitutions(result.summary.substitutions);
            }
            Err(err) => {
                self.metrics.record_error();
                warn!("extraction failed: {}", err);
            }
        }
        outcome
    }

    pub fn execute(&self, scan: &RangeScan) -> anyhow::Result<ScanResult> {
        self.analyze(scan)
            .with_context(|| format!("extracting features from {} samples", scan.len()))
    }

    /// Extracts every scan on a pool of `workers` threads; results keep input order.
    pub fn execute_batch(
        &self,
        scans: Vec<RangeScan>,
    ) -> anyhow::Result<Vec<FeatureResult<ScanResult>>> {
        let workers = self.config.workers.max(1);
        let runtime = TokioBuilder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .build()
            .context("creating batch runtime")?;
        runtime.block_on(self.execute_batch_async(scans))
    }

    pub async fn execute_batch_async(
        &self,
        scans: Vec<RangeScan>,
    ) -> anyhow::Result<Vec<FeatureResult<ScanResult>>> {
        let handles: Vec<_> = scans
            .into_iter()
            .map(|scan| {
                let runner = self.clone();
                tokio::task::spawn_blocking(move || runner.analyze(&scan))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("joining extraction task")?);
        }
        Ok(results)
    }
}
