//! Sensor probe readings: what the field looks like at a single point.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::em2d::{FieldSample, PointCharge, sample_field};

/// Magnitude below which the lab hides the direction arrow.
pub const ARROW_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeReading {
    pub position: DVec2,
    pub sample: FieldSample,
    /// Direction of the field, `atan2(Ey, Ex)` in degrees.
    pub angle_degrees: f64,
}

impl ProbeReading {
    /// Whether the field is strong enough to draw a direction arrow.
    pub fn shows_arrow(&self, threshold: f64) -> bool {
        self.sample.magnitude > threshold
    }

    /// Arrow length proportional to field strength, capped at `max`.
    pub fn arrow_length(&self, scale: f64, max: f64) -> f64 {
        (self.sample.magnitude * scale).min(max)
    }
}

pub fn probe(position: DVec2, charges: &[PointCharge], cfg: &FieldConfig) -> ProbeReading {
    let sample = sample_field(position, charges, cfg);
    ProbeReading {
        position,
        sample,
        angle_degrees: sample.field.y.atan2(sample.field.x).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn angle_follows_field() {
        let charges = [PointCharge::new(1, 50.0, 50.0, 1.0)];
        let cfg = FieldConfig::default();
        assert_relative_eq!(probe(DVec2::new(60.0, 50.0), &charges, &cfg).angle_degrees, 0.0);
        assert_relative_eq!(probe(DVec2::new(50.0, 60.0), &charges, &cfg).angle_degrees, 90.0);
        assert_relative_eq!(probe(DVec2::new(40.0, 50.0), &charges, &cfg).angle_degrees, 180.0);
    }

    #[test]
    fn arrow_hidden_for_weak_field() {
        let r = probe(DVec2::new(50.0, 50.0), &[], &FieldConfig::default());
        assert!(!r.shows_arrow(ARROW_THRESHOLD));
        assert_eq!(r.arrow_length(10.0, 100.0), 0.0);
    }

    #[test]
    fn arrow_length_is_capped() {
        let charges = [PointCharge::new(1, 50.0, 50.0, 5.0)];
        let r = probe(DVec2::new(52.0, 50.0), &charges, &FieldConfig::default());
        assert!(r.shows_arrow(ARROW_THRESHOLD));
        assert_eq!(r.arrow_length(10.0, 100.0), 100.0);
    }
}
