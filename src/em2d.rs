use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;

/// Opaque charge identifier, unique within a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargeId(pub u64);

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An idealized charge. `position` is in percent-of-viewport units but the
/// engine accepts any coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCharge {
    pub id: ChargeId,
    pub position: DVec2,
    /// Signed; the sign is the polarity.
    pub magnitude: f64,
}

impl PointCharge {
    pub fn new(id: u64, x: f64, y: f64, magnitude: f64) -> Self {
        Self {
            id: ChargeId(id),
            position: DVec2::new(x, y),
            magnitude,
        }
    }
}

/// Field, potential and field strength at one point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    /// (Ex, Ey)
    pub field: DVec2,
    pub potential: f64,
    pub magnitude: f64,
}

/// Superpose the inverse-square field and inverse-distance potential of
/// every charge at `p`.
///
/// A charge closer than `cfg.singularity_radius` is skipped entirely, so a
/// single charge sampled at its own position yields all zeros.
pub fn sample_field(p: DVec2, charges: &[PointCharge], cfg: &FieldConfig) -> FieldSample {
    let k = cfg.coupling;
    let mut e = DVec2::ZERO;
    let mut v = 0.0;
    for c in charges {
        let d = p - c.position;
        let r2 = d.length_squared();
        let r = r2.sqrt();
        if r < cfg.singularity_radius {
            continue;
        }
        e += (k * c.magnitude / r2) * (d / r);
        v += k * c.magnitude / r;
    }
    FieldSample {
        field: e,
        potential: v,
        magnitude: e.length(),
    }
}

/// [`sample_field`] with the default coupling and singularity radius.
pub fn sample_field_default(p: DVec2, charges: &[PointCharge]) -> FieldSample {
    sample_field(p, charges, &FieldConfig::default())
}
