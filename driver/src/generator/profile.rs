use anyhow::{ensure, Context};
use placecore::RangeScan;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Kind of place a synthetic scan is taken in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScenePlace {
    Room,
    Corridor,
    Doorway,
    Open,
}

impl ScenePlace {
    pub const ALL: [ScenePlace; 4] = [
        ScenePlace::Room,
        ScenePlace::Corridor,
        ScenePlace::Doorway,
        ScenePlace::Open,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScenePlace::Room => "room",
            ScenePlace::Corridor => "corridor",
            ScenePlace::Doorway => "doorway",
            ScenePlace::Open => "open",
        }
    }
}

/// Configuration for generating a synthetic full-turn scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub place: ScenePlace,
    pub samples: usize,
    /// Extent along the sensor's x axis, metres.
    pub width: f64,
    /// Extent along the sensor's y axis, metres.
    pub depth: f64,
    pub max_range: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            place: ScenePlace::Room,
            samples: 360,
            width: 6.0,
            depth: 4.0,
            max_range: 30.0,
            noise: 0.02,
            seed: 0,
        }
    }
}

/// Distance from the centre of a `width` x `depth` rectangle to its wall at `bearing`.
fn rectangle_range(width: f64, depth: f64, bearing: f64) -> f64 {
    let (sin, cos) = bearing.sin_cos();
    let along_x = if cos.abs() > f64::EPSILON {
        width / 2.0 / cos.abs()
    } else {
        f64::INFINITY
    };
    let along_y = if sin.abs() > f64::EPSILON {
        depth / 2.0 / sin.abs()
    } else {
        f64::INFINITY
    };
    along_x.min(along_y)
}

fn ideal_range(config: &GeneratorConfig, bearing: f64) -> f64 {
    match config.place {
        ScenePlace::Room => rectangle_range(config.width, config.depth, bearing),
        ScenePlace::Corridor => rectangle_range(config.max_range * 2.0, config.depth, bearing),
        ScenePlace::Doorway => {
            // An opening in the +x wall a quarter of the room's depth wide.
            let half_gap = (config.depth / 8.0).atan2(config.width / 2.0);
            if bearing.abs() < half_gap {
                config.max_range
            } else {
                rectangle_range(config.width, config.depth, bearing)
            }
        }
        ScenePlace::Open => config.max_range,
    }
}

pub fn build_scan_from_config(config: &GeneratorConfig) -> anyhow::Result<RangeScan> {
    ensure!(config.samples > 0, "generator needs at least one sample");
    ensure!(
        config.width > 0.0 && config.depth > 0.0 && config.max_range > 0.0,
        "generator extents must be positive"
    );
    ensure!(config.noise >= 0.0, "generator noise must be non-negative");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let angle_increment = TAU / config.samples as f64;
    let mut ranges = Vec::with_capacity(config.samples);

    for index in 0..config.samples {
        let bearing = -PI + index as f64 * angle_increment;
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        let range = (ideal_range(config, bearing) + jitter).clamp(0.0, config.max_range);
        ranges.push(range);
    }

    let scan = RangeScan::new(ranges, -PI, angle_increment);
    scan.validate()
        .with_context(|| format!("generated {} scan is invalid", config.place.label()))?;
    Ok(scan)
}

/// `per_place` scans of every place, each with its own seed.
pub fn build_labeled_scans(
    per_place: usize,
    base: &GeneratorConfig,
) -> anyhow::Result<Vec<(String, RangeScan)>> {
    let mut scans = Vec::with_capacity(per_place * ScenePlace::ALL.len());
    for (place_index, place) in ScenePlace::ALL.iter().enumerate() {
        for k in 0..per_place {
            let config = GeneratorConfig {
                place: *place,
                seed: base
                    .seed
                    .wrapping_add((place_index * per_place + k) as u64),
                ..base.clone()
            };
            scans.push((place.label().to_string(), build_scan_from_config(&config)?));
        }
    }
    Ok(scans)
}
