use approx::assert_abs_diff_eq;
use placecore::math::Point2;
use placecore::processing::{
    ContourFeatures, ConvexHullBuilder, MomentAnalyzer, PolygonBuilder, RangeStatistics,
};
use placecore::{FeatureConfig, FeatureExtractor, RangeScan, ThresholdGrid};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Deterministic, strictly positive, bumpy room-like scan.
fn wiggly_scan(samples: usize, phase: f64) -> RangeScan {
    let ranges = (0..samples)
        .map(|i| {
            let t = i as f64 / samples as f64 * TAU;
            4.0 + 1.5 * (3.0 * t).sin() + 0.8 * (7.0 * t + 0.3).cos() + 0.4 * (13.0 * t).sin()
        })
        .collect();
    RangeScan::new(ranges, phase, TAU / samples as f64)
}

#[test]
fn circle_ratios_converge_to_one() {
    let mut previous = f64::INFINITY;
    for samples in [16, 64, 256, 1024] {
        let analysis = ContourFeatures::analyze(&RangeScan::full_turn(vec![5.0; samples])).unwrap();
        let shape = analysis.shape;
        let worst = [shape.compactness, shape.roundness, shape.form_factor]
            .iter()
            .map(|v| (v - 1.0).abs())
            .fold(0.0, f64::max);
        assert!(worst < previous, "error {} did not shrink at {}", worst, samples);
        previous = worst;
    }
    assert!(previous < 1e-4);
}

/// Bumpy scan over `span` radians instead of a full turn.
fn fan_scan(samples: usize, span: f64, phase: f64) -> RangeScan {
    let ranges = (0..samples)
        .map(|i| {
            let t = i as f64 * 2.3 + phase;
            6.0 + 4.0 * t.sin() + 1.5 * (3.7 * t).cos()
        })
        .collect();
    RangeScan::new(ranges, phase, span / (samples - 1) as f64)
}

fn assert_hull_contains(scan: &RangeScan) {
    let polygon = PolygonBuilder::build(scan);
    let hull = ConvexHullBuilder::build(&polygon.vertices);

    assert!(hull.indices.windows(2).all(|w| w[0] < w[1]));
    assert!(hull.indices.iter().all(|&idx| idx < scan.len()));
    assert_eq!(hull.indices.len(), hull.boundary.len());

    let corners: Vec<Point2> = hull.points(&polygon.vertices).copied().collect();
    for (idx, p) in corners.iter().enumerate() {
        let q = &corners[(idx + 1) % corners.len()];
        for (vertex, r) in polygon.vertices.iter().enumerate() {
            // Counter-clockwise hull: nothing may sit to the right of an edge.
            assert!(
                Point2::orientation_value(p, q, r) <= 1e-9,
                "vertex {} outside hull edge, scan {:?}",
                vertex,
                scan
            );
        }
    }
    assert!(hull.perimeter <= polygon.perimeter + 1e-9);
}

#[test]
fn hull_contains_every_vertex() {
    for (samples, phase) in [(90, 0.0), (360, 1.1), (257, -2.5)] {
        let scan = wiggly_scan(samples, phase);
        assert_hull_contains(&scan);
        let hull = ConvexHullBuilder::build(&PolygonBuilder::build(&scan).vertices);
        assert!(hull.indices.len() < samples);
    }
}

#[test]
fn hull_contains_every_vertex_of_partial_sweeps() {
    let spans = [0.5, FRAC_PI_2, 2.0, PI, 3.5, 3.0 * FRAC_PI_2, 5.5];
    for (k, span) in spans.iter().enumerate() {
        for samples in 3..15 {
            for phase in [-0.6, 0.0, 1.3 + k as f64] {
                assert_hull_contains(&fan_scan(samples, *span, phase));
                assert_hull_contains(&fan_scan(samples, -*span, phase));
            }
        }
    }
}

#[test]
fn hull_handles_farthest_sample_last() {
    for span in [FRAC_PI_2, PI, 1.5 * PI] {
        let ranges: Vec<f64> = (0..12).map(|i| 2.0 + i as f64 * 0.75).collect();
        let scan = RangeScan::new(ranges, 0.2, span / 11.0);
        assert_eq!(scan.longest_range_index(), Some(11));
        assert_hull_contains(&scan);

        let hull = ConvexHullBuilder::build(&PolygonBuilder::build(&scan).vertices);
        assert!(hull.indices.contains(&11));
    }
}

#[test]
fn moments_are_rigid_motion_invariant() {
    let base_scan = wiggly_scan(180, 0.0);
    let rotated_scan = wiggly_scan(180, 0.9);

    let base = ContourFeatures::analyze(&base_scan).unwrap();
    let rotated = ContourFeatures::analyze(&rotated_scan).unwrap();
    for (lhs, rhs) in base.moments.0.iter().zip(rotated.moments.0.iter()) {
        assert_abs_diff_eq!(*lhs, *rhs, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(base.shape.compactness, rotated.shape.compactness, epsilon = 1e-9);
    assert_abs_diff_eq!(base.shape.roundness, rotated.shape.roundness, epsilon = 1e-9);

    let shifted: Vec<Point2> = base
        .polygon
        .vertices
        .iter()
        .map(|p| p.rotated(-0.4) + Point2::new(25.0, -7.0))
        .collect();
    let moved = MomentAnalyzer::moments(&shifted, &MomentAnalyzer::centroid(&shifted));
    for (lhs, rhs) in base.moments.0.iter().zip(moved.0.iter()) {
        assert_abs_diff_eq!(*lhs, *rhs, epsilon = 1e-9);
    }
}

#[test]
fn vector_length_depends_only_on_config() {
    let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
    for samples in [1, 2, 3, 17, 720] {
        let vector = extractor.extract(&wiggly_scan(samples, 0.2)).unwrap();
        assert_eq!(vector.len(), 81);
    }

    let config = FeatureConfig {
        range_diff: ThresholdGrid::new(0.0, 10.0, 30.0),
        gap_fine: ThresholdGrid::new(0.0, 1.0, 5.0),
        gap_coarse: ThresholdGrid::new(5.0, 5.0, 10.0),
    };
    let expected = 2 + 2 * 3 + 2 + 5 + 1 + 4 + 7;
    let extractor = FeatureExtractor::new(config).unwrap();
    for samples in [4, 64] {
        let vector = extractor.extract(&wiggly_scan(samples, 0.0)).unwrap();
        assert_eq!(vector.len(), expected);
        assert_eq!(extractor.config().feature_names().len(), expected);
    }
}

#[test]
fn vector_layout_follows_block_order() {
    let scan = RangeScan::full_turn(vec![10.0, 20.0, 10.0, 20.0]);
    let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
    let vector = extractor.extract(&scan).unwrap();
    let values = vector.as_slice();

    let (mean, sdev) = RangeStatistics::mean_sdev_range_diff(&scan.ranges, f64::INFINITY).unwrap();
    assert_eq!(values[0], mean);
    assert_eq!(values[1], sdev);

    let analysis = ContourFeatures::analyze(&scan).unwrap();
    assert_eq!(&values[70..74], &analysis.shape.scalars());
    assert_eq!(&values[74..], analysis.moments.as_slice());
}

#[test]
fn scans_extract_independently_across_threads() {
    let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
    let scans: Vec<RangeScan> = (0..8).map(|k| wiggly_scan(60 + k, k as f64)).collect();
    let serial: Vec<_> = scans.iter().map(|s| extractor.extract(s).unwrap()).collect();

    let shared = &extractor;
    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = scans
            .iter()
            .map(|scan| scope.spawn(move || shared.extract(scan).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(serial, parallel);
}
