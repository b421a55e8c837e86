//! Engine configuration.
//!
//! Both config types deserialize from partial JSON: missing keys take their
//! defaults. Out-of-range values are clamped by [`TraceConfig::sanitized`]
//! instead of rejected.

use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Constants of the inverse-square law used by [`sample_field`](crate::sample_field).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Coupling constant `k`. A visualization scale, not the vacuum constant.
    pub coupling: f64,
    /// Charges closer than this to the query point contribute nothing.
    pub singularity_radius: f64,
}

impl FieldConfig {
    pub const DEFAULT_COUPLING: f64 = 200.0;
    pub const DEFAULT_SINGULARITY_RADIUS: f64 = 1.0;

    #[must_use]
    pub fn with_coupling(mut self, k: f64) -> Self {
        self.coupling = k;
        self
    }

    #[must_use]
    pub fn with_singularity_radius(mut self, r: f64) -> Self {
        self.singularity_radius = r;
        self
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            coupling: Self::DEFAULT_COUPLING,
            singularity_radius: Self::DEFAULT_SINGULARITY_RADIUS,
        }
    }
}

/// Axis-aligned rectangle a trace must stay inside. Edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// The normalized percentage-of-viewport plane.
    pub const UNIT_PERCENT: Self = Self {
        min: DVec2::ZERO,
        max: DVec2::splat(100.0),
    };

    #[must_use]
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// True when `p` lies strictly outside. NaN coordinates are never outside.
    #[inline]
    pub fn is_outside(&self, p: DVec2) -> bool {
        p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y
    }

    fn ordered(self) -> Self {
        Self {
            min: self.min.min(self.max),
            max: self.min.max(self.max),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNIT_PERCENT
    }
}

/// Options for [`trace_field_lines`](crate::trace_field_lines).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Distance moved per step.
    pub step_size: f64,
    /// Upper bound on steps per line; a line has at most `max_steps + 1` points.
    #[serde(deserialize_with = "clamped_steps")]
    pub max_steps: usize,
    /// Squared distance to a charge that counts as reaching it.
    pub hit_radius_squared: f64,
    pub bounds: Bounds,
    /// Lines spawned per unit of `|magnitude|`.
    pub lines_per_unit_charge: f64,
    /// Upper bound on lines spawned from one charge.
    pub max_lines_per_charge: usize,
    /// Distance from the charge center where traces begin.
    pub spawn_radius: f64,
    /// Steps a line must take before a charge hit can stop it.
    pub grace_steps: usize,
    pub field: FieldConfig,
}

impl TraceConfig {
    pub const DEFAULT_STEP_SIZE: f64 = 3.0;
    pub const DEFAULT_MAX_STEPS: usize = 500;
    pub const DEFAULT_HIT_RADIUS_SQUARED: f64 = 2.0;
    pub const DEFAULT_LINES_PER_UNIT_CHARGE: f64 = 2.0;
    pub const DEFAULT_MAX_LINES_PER_CHARGE: usize = 256;
    pub const DEFAULT_SPAWN_RADIUS: f64 = 2.0;
    pub const DEFAULT_GRACE_STEPS: usize = 5;

    /// Parse a (possibly partial) JSON object and sanitize the result.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Clamp every option into a range the tracer can run with.
    ///
    /// Non-finite scalars and a step size that is not positive fall back to
    /// their defaults, negative counts and radii become zero, and inverted
    /// bounds are reordered.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };
        let non_negative = |v: f64, d: f64| finite_or(v, d).max(0.0);
        Self {
            step_size: if self.step_size.is_finite() && self.step_size > 0.0 {
                self.step_size
            } else {
                Self::DEFAULT_STEP_SIZE
            },
            max_steps: self.max_steps,
            hit_radius_squared: non_negative(
                self.hit_radius_squared,
                Self::DEFAULT_HIT_RADIUS_SQUARED,
            ),
            bounds: self.bounds.ordered(),
            lines_per_unit_charge: non_negative(
                self.lines_per_unit_charge,
                Self::DEFAULT_LINES_PER_UNIT_CHARGE,
            ),
            max_lines_per_charge: self.max_lines_per_charge,
            spawn_radius: non_negative(self.spawn_radius, Self::DEFAULT_SPAWN_RADIUS),
            grace_steps: self.grace_steps,
            field: FieldConfig {
                coupling: finite_or(self.field.coupling, FieldConfig::DEFAULT_COUPLING),
                singularity_radius: non_negative(
                    self.field.singularity_radius,
                    FieldConfig::DEFAULT_SINGULARITY_RADIUS,
                ),
            },
        }
    }

    #[must_use]
    pub fn with_step_size(mut self, step: f64) -> Self {
        self.step_size = step;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    /// Set `max_steps` from a signed count, clamping negatives to zero.
    #[must_use]
    pub fn with_max_steps_signed(mut self, steps: i64) -> Self {
        self.max_steps = usize::try_from(steps.max(0)).unwrap_or(usize::MAX);
        self
    }

    #[must_use]
    pub fn with_lines_per_unit_charge(mut self, n: f64) -> Self {
        self.lines_per_unit_charge = n;
        self
    }

    #[must_use]
    pub fn with_max_lines_per_charge(mut self, n: usize) -> Self {
        self.max_lines_per_charge = n;
        self
    }

    #[must_use]
    pub fn with_spawn_radius(mut self, r: f64) -> Self {
        self.spawn_radius = r;
        self
    }

    #[must_use]
    pub fn with_hit_radius_squared(mut self, r2: f64) -> Self {
        self.hit_radius_squared = r2;
        self
    }

    #[must_use]
    pub fn with_grace_steps(mut self, steps: usize) -> Self {
        self.grace_steps = steps;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            step_size: Self::DEFAULT_STEP_SIZE,
            max_steps: Self::DEFAULT_MAX_STEPS,
            hit_radius_squared: Self::DEFAULT_HIT_RADIUS_SQUARED,
            bounds: Bounds::UNIT_PERCENT,
            lines_per_unit_charge: Self::DEFAULT_LINES_PER_UNIT_CHARGE,
            max_lines_per_charge: Self::DEFAULT_MAX_LINES_PER_CHARGE,
            spawn_radius: Self::DEFAULT_SPAWN_RADIUS,
            grace_steps: Self::DEFAULT_GRACE_STEPS,
            field: FieldConfig::default(),
        }
    }
}

// JSON callers may send a negative step count.
fn clamped_steps<'de, D: Deserializer<'de>>(de: D) -> Result<usize, D::Error> {
    let n = i64::deserialize(de)?;
    Ok(usize::try_from(n.max(0)).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lab_values() {
        let c = TraceConfig::default();
        assert_eq!(c.step_size, 3.0);
        assert_eq!(c.max_steps, 500);
        assert_eq!(c.hit_radius_squared, 2.0);
        assert_eq!(c.lines_per_unit_charge, 2.0);
        assert_eq!(c.max_lines_per_charge, 256);
        assert_eq!(c.spawn_radius, 2.0);
        assert_eq!(c.grace_steps, 5);
        assert_eq!(c.bounds, Bounds::UNIT_PERCENT);
        assert_eq!(c.field.coupling, 200.0);
        assert_eq!(c.field.singularity_radius, 1.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = TraceConfig::from_json(r#"{ "step_size": 1.5, "field": { "coupling": 10.0 } }"#)
            .unwrap();
        assert_eq!(c.step_size, 1.5);
        assert_eq!(c.max_steps, 500);
        assert_eq!(c.field.coupling, 10.0);
        assert_eq!(c.field.singularity_radius, 1.0);
    }

    #[test]
    fn negative_max_steps_clamps_to_zero() {
        let c = TraceConfig::from_json(r#"{ "max_steps": -7 }"#).unwrap();
        assert_eq!(c.max_steps, 0);
        assert_eq!(TraceConfig::default().with_max_steps_signed(-1).max_steps, 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            TraceConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn sanitize_clamps_bad_values() {
        let c = TraceConfig {
            step_size: f64::NAN,
            lines_per_unit_charge: -3.0,
            spawn_radius: -1.0,
            bounds: Bounds::new(DVec2::splat(100.0), DVec2::ZERO),
            ..TraceConfig::default()
        }
        .sanitized();
        assert_eq!(c.step_size, 3.0);
        assert_eq!(c.lines_per_unit_charge, 0.0);
        assert_eq!(c.spawn_radius, 0.0);
        assert_eq!(c.bounds, Bounds::UNIT_PERCENT);
    }

    #[test]
    fn step_size_must_be_positive() {
        for bad in [-3.0, 0.0, -0.0, f64::INFINITY] {
            let c = TraceConfig::default().with_step_size(bad).sanitized();
            assert_eq!(c.step_size, TraceConfig::DEFAULT_STEP_SIZE);
        }
        let c = TraceConfig::default().with_step_size(0.5).sanitized();
        assert_eq!(c.step_size, 0.5);
        let c = TraceConfig::from_json(r#"{ "step_size": -1.0 }"#).unwrap();
        assert_eq!(c.step_size, TraceConfig::DEFAULT_STEP_SIZE);
    }

    #[test]
    fn edges_are_inside_bounds() {
        let b = Bounds::UNIT_PERCENT;
        assert!(!b.is_outside(DVec2::new(0.0, 100.0)));
        assert!(b.is_outside(DVec2::new(-0.001, 50.0)));
        assert!(b.is_outside(DVec2::new(50.0, 100.5)));
        assert!(!b.is_outside(DVec2::new(f64::NAN, 50.0)));
    }
}
