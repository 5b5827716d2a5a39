use crate::prelude::{FeatureError, FeatureResult};
use serde::{Deserialize, Serialize};

/// One sweep of range samples taken at evenly spaced bearings.
///
/// Sample `i` lies at bearing `angle_min + i * angle_increment`. Ranges are
/// expected to be finite and non-negative; invalid returns are filtered by the
/// sensor driver before a scan reaches this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeScan {
    pub ranges: Vec<f64>,
    pub angle_min: f64,
    pub angle_increment: f64,
}

impl RangeScan {
    pub fn new(ranges: Vec<f64>, angle_min: f64, angle_increment: f64) -> Self {
        Self {
            ranges,
            angle_min,
            angle_increment,
        }
    }

    /// Scan of `count` samples spread evenly over a full turn.
    pub fn full_turn(ranges: Vec<f64>) -> Self {
        let count = ranges.len().max(1);
        Self::new(ranges, 0.0, std::f64::consts::TAU / count as f64)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    pub fn bearing(&self, index: usize) -> f64 {
        self.angle_min + index as f64 * self.angle_increment
    }

    /// Index of the farthest return; the first one wins on ties.
    pub fn longest_range_index(&self) -> Option<usize> {
        self.ranges
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, &range)| match best {
                Some((_, longest)) if longest >= range => best,
                _ => Some((idx, range)),
            })
            .map(|(idx, _)| idx)
    }

    pub fn validate(&self) -> FeatureResult<()> {
        if self.ranges.is_empty() {
            return Err(FeatureError::EmptyScan);
        }
        if !self.angle_min.is_finite() {
            return Err(FeatureError::NonFiniteValue {
                what: "angle_min",
                index: 0,
            });
        }
        if !self.angle_increment.is_finite() {
            return Err(FeatureError::NonFiniteValue {
                what: "angle_increment",
                index: 0,
            });
        }
        if let Some(index) = self.ranges.iter().position(|r| !r.is_finite()) {
            return Err(FeatureError::NonFiniteValue {
                what: "range",
                index,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearings_follow_increment() {
        let scan = RangeScan::new(vec![1.0, 2.0, 3.0], -1.0, 0.5);
        assert_eq!(scan.bearing(0), -1.0);
        assert_eq!(scan.bearing(2), 0.0);
    }

    #[test]
    fn longest_range_prefers_first_on_ties() {
        let scan = RangeScan::full_turn(vec![1.0, 4.0, 2.0, 4.0]);
        assert_eq!(scan.longest_range_index(), Some(1));
        assert_eq!(RangeScan::full_turn(vec![]).longest_range_index(), None);
    }

    #[test]
    fn validate_rejects_empty_and_non_finite() {
        assert_eq!(
            RangeScan::full_turn(vec![]).validate(),
            Err(FeatureError::EmptyScan)
        );
        assert_eq!(
            RangeScan::full_turn(vec![1.0, f64::NAN]).validate(),
            Err(FeatureError::NonFiniteValue {
                what: "range",
                index: 1
            })
        );
        assert!(RangeScan::new(vec![1.0], 0.0, f64::INFINITY)
            .validate()
            .is_err());
        assert!(RangeScan::full_turn(vec![1.0]).validate().is_ok());
    }

    #[test]
    fn scan_deserializes_from_json() {
        let scan: RangeScan = serde_json::from_str(
            r#"{"ranges":[1.0,2.5],"angle_min":-3.14,"angle_increment":0.01}"#,
        )
        .unwrap();
        assert_eq!(scan.len(), 2);
        assert_eq!(scan.angle_increment, 0.01);
    }
}
