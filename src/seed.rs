use glam::DVec2;

use crate::em2d::PointCharge;

/// `n` points evenly spaced in angle on a circle, starting at angle 0.
pub fn ring(center: DVec2, radius: f64, n: usize) -> Vec<DVec2> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let theta = std::f64::consts::TAU * i as f64 / n as f64;
        out.push(center + radius * DVec2::new(theta.cos(), theta.sin()));
    }
    out
}

/// Number of lines a charge spawns: `round(per_unit * |q|)`, at most `max`.
///
/// Zero-magnitude charges spawn nothing; NaN or negative products clamp to 0.
pub fn line_count(charge: &PointCharge, per_unit: f64, max: usize) -> usize {
    if charge.magnitude == 0.0 {
        return 0;
    }
    let n = (per_unit * charge.magnitude.abs()).round();
    if n.is_nan() || n <= 0.0 {
        0
    } else if n >= max as f64 {
        max
    } else {
        n as usize
    }
}
