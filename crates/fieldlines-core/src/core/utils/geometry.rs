use nalgebra::{Point2, Vector2};
use std::f64::consts::TAU;

/// Places `count` points evenly by angle on a circle.
///
/// Point `f` sits at angle `θ_f = 2πf / count`, measured counter-clockwise
/// from the positive x-axis, so the first point is always at
/// `center + (radius, 0)`.
pub fn seed_circle(center: &Point2<f64>, radius: f64, count: usize) -> Vec<Point2<f64>> {
    (0..count)
        .map(|f| {
            let theta = seed_angle(f, count);
            center + Vector2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

#[inline]
pub fn seed_angle(index: usize, count: usize) -> f64 {
    TAU * index as f64 / count as f64
}

/// Returns `points` equally spaced values from `start` to `end` inclusive.
///
/// The endpoints are exact. A single point yields `[start]`.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = points - 1;
            let step = (end - start) / last as f64;
            (0..points)
                .map(|i| if i == last { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Root-mean-square distance between two equally long polylines.
pub fn polyline_rmsd(a: &[Point2<f64>], b: &[Point2<f64>]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let n = a.len() as f64;
    let squared_dist_sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}
