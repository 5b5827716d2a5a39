use anyhow::Context;
use placecore::{FeatureConfig, FeatureExtractor};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub features: FeatureConfig,
    /// Bearing of the first sample for rows that carry ranges only.
    pub angle_min: f64,
    pub angle_increment: f64,
    /// Upper bound on concurrent extractions in batch mode.
    pub workers: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            angle_min: -PI,
            angle_increment: TAU / 360.0,
            workers: 4,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .features
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        angle_min: Option<f64>,
        angle_increment: Option<f64>,
        workers: Option<usize>,
    ) -> Self {
        if let Some(angle_min) = angle_min {
            self.angle_min = angle_min;
        }
        if let Some(angle_increment) = angle_increment {
            self.angle_increment = angle_increment;
        }
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self
    }

    pub fn to_extractor(&self) -> anyhow::Result<FeatureExtractor> {
        FeatureExtractor::new(self.features.clone()).context("building feature extractor")
    }
}
