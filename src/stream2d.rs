use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::TraceConfig;
use crate::em2d::{ChargeId, PointCharge, sample_field};
use crate::seed;

/// Which way a line is traced relative to the local field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Along the field; lines from positive charges.
    Outward,
    /// Against the field; lines from negative charges.
    Inward,
}

impl Direction {
    pub fn of(magnitude: f64) -> Self {
        if magnitude > 0.0 {
            Direction::Outward
        } else {
            Direction::Inward
        }
    }

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Outward => 1.0,
            Direction::Inward => -1.0,
        }
    }
}

/// Why a trace stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Last point lies outside the configured bounds.
    OutOfBounds,
    /// Last point came within the hit radius of a charge after the grace period.
    HitCharge,
    /// The field vanished at the last point, so there is no direction.
    ZeroField,
    /// `max_steps` were taken.
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLine {
    pub points: Vec<DVec2>,
    pub origin: ChargeId,
    pub direction: Direction,
    pub termination: Termination,
}

impl FieldLine {
    pub fn start(&self) -> Option<DVec2> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Number of steps taken; one less than the point count.
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Trace field lines from every nonzero charge.
///
/// Each charge spawns `round(lines_per_unit_charge * |q|)` lines on a ring of
/// `spawn_radius`. Lines that stop immediately are still returned.
pub fn trace_field_lines(charges: &[PointCharge], cfg: &TraceConfig) -> Vec<FieldLine> {
    let cfg = cfg.sanitized();
    let mut out = Vec::new();
    for c in charges {
        let n = seed::line_count(c, cfg.lines_per_unit_charge, cfg.max_lines_per_charge);
        if n == 0 {
            continue;
        }
        let direction = Direction::of(c.magnitude);
        for start in seed::ring(c.position, cfg.spawn_radius, n) {
            out.push(trace_from(charges, c.id, start, direction, &cfg));
        }
    }
    debug!(
        charges = charges.len(),
        lines = out.len(),
        points = out.iter().map(|l| l.points.len()).sum::<usize>(),
        "traced field lines"
    );
    out
}

/// Trace a single line from `start`, stepping along (or against) the field
/// until it leaves the bounds, reaches a charge, loses direction, or runs out
/// of steps.
pub fn trace_from(
    charges: &[PointCharge],
    origin: ChargeId,
    start: DVec2,
    direction: Direction,
    cfg: &TraceConfig,
) -> FieldLine {
    let cfg = cfg.sanitized();
    let sign = direction.sign();
    let mut pts = Vec::with_capacity(cfg.max_steps.min(1024) + 1);
    pts.push(start);
    let mut p = start;
    let mut steps = 0usize;

    let termination = loop {
        if steps >= cfg.max_steps {
            break Termination::StepLimit;
        }
        if cfg.bounds.is_outside(p) {
            break Termination::OutOfBounds;
        }
        if steps > cfg.grace_steps && near_any(p, charges, cfg.hit_radius_squared) {
            break Termination::HitCharge;
        }
        let s = sample_field(p, charges, &cfg.field);
        if s.magnitude == 0.0 {
            break Termination::ZeroField;
        }
        p += (s.field / s.magnitude) * cfg.step_size * sign;
        pts.push(p);
        steps += 1;
    };

    trace!(%origin, ?direction, ?termination, steps, "line done");
    FieldLine {
        points: pts,
        origin,
        direction,
        termination,
    }
}

fn near_any(p: DVec2, charges: &[PointCharge], r2: f64) -> bool {
    charges
        .iter()
        .any(|c| (p - c.position).length_squared() < r2)
}
