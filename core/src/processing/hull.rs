use crate::math::{Point2, Turn};
use crate::telemetry::log::LogManager;
use std::f64::consts::{PI, TAU};

/// Convex hull of a polygon's vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    /// Hull vertices as strictly increasing polygon indices.
    pub indices: Vec<usize>,
    /// The same vertices in counter-clockwise traversal order.
    ///
    /// Differs from `indices` when the sensor sits outside the hull, where
    /// scan order interleaves the near and far sides.
    pub boundary: Vec<usize>,
    pub perimeter: f64,
}

impl ConvexHull {
    /// Hull corners in counter-clockwise order.
    pub fn points<'a>(&'a self, vertices: &'a [Point2]) -> impl Iterator<Item = &'a Point2> + 'a {
        self.boundary.iter().map(move |&idx| &vertices[idx])
    }
}

/// Convex hull builder for scan polygons.
///
/// When the scan winds exactly once around the sensor with every angular
/// step under a half turn, the sensor lies inside the hull and the scan's own
/// angular order is used: a single pass from the farthest vertex, popping
/// every vertex that fails a strict turn in the sweep direction, then a
/// closing pass over the wrap. Any other scan (narrow field of view, samples
/// at the sensor, overlapping bearings) falls back to a monotone chain over
/// the vertices sorted by coordinate.
pub struct ConvexHullBuilder;

impl ConvexHullBuilder {
    pub fn build(vertices: &[Point2]) -> ConvexHull {
        let boundary = Self::hull_boundary(vertices);
        let perimeter = Self::closed_length(&boundary, vertices);
        let mut indices = boundary.clone();
        indices.sort_unstable();
        indices.dedup();
        LogManager::new("hull").record(&format!(
            "hull vertices {}/{} perimeter {:.4}",
            indices.len(),
            vertices.len(),
            perimeter
        ));
        ConvexHull {
            indices,
            boundary,
            perimeter,
        }
    }

    fn hull_boundary(vertices: &[Point2]) -> Vec<usize> {
        let count = vertices.len();
        if count < 3 {
            return (0..count).collect();
        }
        match Self::sweep_direction(vertices) {
            Some(sweep) => Self::angular_pass(vertices, sweep),
            None => Self::monotone_chain(vertices),
        }
    }

    /// Direction of a sweep that circles the origin exactly once with every
    /// step strictly inside a half turn, or `None` for any other vertex loop.
    fn sweep_direction(vertices: &[Point2]) -> Option<Turn> {
        let mut direction = None;
        let mut total = 0.0;
        for (p, q) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
            let cross = p.x * q.y - q.x * p.y;
            let step = if cross > 0.0 {
                Turn::CounterClockwise
            } else if cross < 0.0 {
                Turn::Clockwise
            } else {
                return None;
            };
            match direction {
                None => direction = Some(step),
                Some(turn) if turn != step => return None,
                Some(_) => {}
            }
            let angle = cross.atan2(p.x * q.x + p.y * q.y);
            // A step of a half turn puts the sensor on the hull boundary.
            if angle.abs() >= PI - 1e-9 {
                return None;
            }
            total += angle;
        }
        if (total.abs() - TAU).abs() < 1e-6 {
            direction
        } else {
            None
        }
    }

    /// Single pass in scan order; the origin must be strictly inside the hull.
    fn angular_pass(vertices: &[Point2], sweep: Turn) -> Vec<usize> {
        let count = vertices.len();
        let keeps = |p: usize, q: usize, r: usize| {
            Point2::orientation(&vertices[p], &vertices[q], &vertices[r]) == sweep
        };

        let start = Self::farthest_from_origin(vertices);
        let order: Vec<usize> = (start..count).chain(0..start).collect();

        let mut stack: Vec<usize> = order[..3].to_vec();
        for &idx in &order[3..] {
            while stack.len() >= 2 && !keeps(stack[stack.len() - 2], stack[stack.len() - 1], idx) {
                stack.pop();
            }
            stack.push(idx);
        }

        // Closing pass: the forward scan never compared the tail with the
        // head, nor the seeded second vertex with its predecessor.
        let mut head = 0;
        loop {
            let mut changed = false;
            while stack.len() - head >= 3
                && !keeps(stack[stack.len() - 2], stack[stack.len() - 1], stack[head])
            {
                stack.pop();
                changed = true;
            }
            while stack.len() - head >= 3
                && !keeps(stack[stack.len() - 1], stack[head], stack[head + 1])
            {
                head += 1;
                changed = true;
            }
            while stack.len() - head >= 3
                && !keeps(stack[head], stack[head + 1], stack[head + 2])
            {
                stack.remove(head + 1);
                changed = true;
            }
            if !changed {
                break;
            }
        }

        let mut boundary = stack.split_off(head);
        if sweep == Turn::Clockwise {
            boundary.reverse();
        }
        boundary
    }

    /// Andrew's monotone chain; counter-clockwise, collinear points dropped.
    fn monotone_chain(vertices: &[Point2]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..vertices.len()).collect();
        order.sort_by(|&a, &b| {
            vertices[a]
                .x
                .total_cmp(&vertices[b].x)
                .then(vertices[a].y.total_cmp(&vertices[b].y))
                .then(a.cmp(&b))
        });
        let mut boundary = Self::half_chain(vertices, order.iter().copied());
        boundary.extend(Self::half_chain(vertices, order.iter().rev().copied()));
        boundary
    }

    /// One side of the monotone chain, without its final vertex.
    fn half_chain(vertices: &[Point2], order: impl Iterator<Item = usize>) -> Vec<usize> {
        let left_turn = |p: usize, q: usize, r: usize| {
            Point2::orientation(&vertices[p], &vertices[q], &vertices[r]) == Turn::CounterClockwise
        };
        let mut chain: Vec<usize> = Vec::new();
        for idx in order {
            while chain.len() >= 2
                && !left_turn(chain[chain.len() - 2], chain[chain.len() - 1], idx)
            {
                chain.pop();
            }
            chain.push(idx);
        }
        chain.pop();
        chain
    }

    fn farthest_from_origin(vertices: &[Point2]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::NEG_INFINITY;
        for (idx, vertex) in vertices.iter().enumerate() {
            let dist = vertex.x * vertex.x + vertex.y * vertex.y;
            if dist > best_dist {
                best = idx;
                best_dist = dist;
            }
        }
        best
    }

    /// Length of the loop through `boundary`, closing edge included.
    fn closed_length(boundary: &[usize], vertices: &[Point2]) -> f64 {
        if boundary.len() < 2 {
            return 0.0;
        }
        boundary
            .iter()
            .zip(boundary.iter().cycle().skip(1))
            .map(|(&a, &b)| vertices[a].distance(&vertices[b]))
            .sum()
    }
}
