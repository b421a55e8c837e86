use glam::DVec2;
use tracing::debug;

use crate::config::{FieldConfig, TraceConfig};
use crate::em2d::{ChargeId, FieldSample, PointCharge, sample_field};
use crate::error::SceneError;
use crate::probe::{ProbeReading, probe};
use crate::stream2d::{FieldLine, trace_field_lines};

/// Where new charges appear before the user drags them.
pub const SPAWN_CENTER: DVec2 = DVec2::splat(50.0);

/// Caller-owned scene state: the charge set, the sensor probe, and the
/// charge currently being dragged.
///
/// The engine functions stay pure; `Scene` only keeps ids unique and bumps
/// [`Scene::revision`] on every charge mutation so callers know when field
/// lines are stale.
#[derive(Debug, Clone)]
pub struct Scene {
    charges: Vec<PointCharge>,
    sensor: DVec2,
    drag: Option<ChargeId>,
    next_id: u64,
    revision: u64,
    pub field: FieldConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            charges: Vec::new(),
            sensor: SPAWN_CENTER,
            drag: None,
            next_id: 1,
            revision: 0,
            field: FieldConfig::default(),
        }
    }

    /// +5 and -5 on the horizontal midline, sensor between them.
    pub fn dipole() -> Self {
        let mut s = Self::new();
        s.charges = vec![
            PointCharge::new(1, 35.0, 50.0, 5.0),
            PointCharge::new(2, 65.0, 50.0, -5.0),
        ];
        s.next_id = 3;
        s
    }

    pub fn charges(&self) -> &[PointCharge] {
        &self.charges
    }

    pub fn get(&self, id: ChargeId) -> Option<&PointCharge> {
        self.charges.iter().find(|c| c.id == id)
    }

    pub fn sensor(&self) -> DVec2 {
        self.sensor
    }

    pub fn dragging(&self) -> Option<ChargeId> {
        self.drag
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn insert(&mut self, charge: PointCharge) -> Result<(), SceneError> {
        if self.get(charge.id).is_some() {
            return Err(SceneError::DuplicateId(charge.id));
        }
        self.next_id = self.next_id.max(charge.id.0.saturating_add(1));
        self.charges.push(charge);
        self.bump_revision();
        debug!(id = %charge.id, q = charge.magnitude, "charge added");
        Ok(())
    }

    /// Add a charge near the center with a fresh id.
    pub fn spawn(&mut self, magnitude: f64, offset: DVec2) -> ChargeId {
        let mut id = ChargeId(self.next_id);
        while self.get(id).is_some() {
            id = ChargeId(id.0.wrapping_add(1));
        }
        self.next_id = id.0.wrapping_add(1);
        let charge = PointCharge {
            id,
            position: SPAWN_CENTER + offset,
            magnitude,
        };
        self.charges.push(charge);
        self.bump_revision();
        debug!(%id, q = magnitude, "charge spawned");
        id
    }

    pub fn remove(&mut self, id: ChargeId) -> Option<PointCharge> {
        let idx = self.charges.iter().position(|c| c.id == id)?;
        if self.drag == Some(id) {
            self.drag = None;
        }
        self.bump_revision();
        debug!(%id, "charge removed");
        Some(self.charges.remove(idx))
    }

    pub fn move_charge(&mut self, id: ChargeId, position: DVec2) -> Result<(), SceneError> {
        let c = self
            .charges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(SceneError::UnknownId(id))?;
        c.position = position;
        self.bump_revision();
        Ok(())
    }

    pub fn begin_drag(&mut self, id: ChargeId) -> Result<(), SceneError> {
        if self.get(id).is_none() {
            return Err(SceneError::UnknownId(id));
        }
        self.drag = Some(id);
        Ok(())
    }

    /// Pointer moved to `position`: drags the held charge, otherwise moves
    /// the sensor.
    pub fn pointer_moved(&mut self, position: DVec2) {
        match self.drag {
            Some(id) => {
                if self.move_charge(id, position).is_err() {
                    self.drag = None;
                }
            }
            None => self.sensor = position,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn sample(&self, p: DVec2) -> FieldSample {
        sample_field(p, &self.charges, &self.field)
    }

    pub fn probe_sensor(&self) -> ProbeReading {
        probe(self.sensor, &self.charges, &self.field)
    }

    /// Trace with `cfg`, sampling with the scene's own field constants.
    pub fn trace(&self, cfg: &TraceConfig) -> Vec<FieldLine> {
        trace_field_lines(&self.charges, &cfg.with_field(self.field))
    }

    #[inline]
    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut s = Scene::dipole();
        let err = s.insert(PointCharge::new(1, 10.0, 10.0, 1.0)).unwrap_err();
        assert_eq!(err, SceneError::DuplicateId(ChargeId(1)));
        assert_eq!(s.charges().len(), 2);
        assert_eq!(s.revision(), 0);
    }

    #[test]
    fn spawn_skips_taken_ids() {
        let mut s = Scene::new();
        s.insert(PointCharge::new(4, 0.0, 0.0, 1.0)).unwrap();
        let a = s.spawn(1.0, DVec2::new(2.0, 3.0));
        let b = s.spawn(-1.0, DVec2::ZERO);
        assert_eq!(a, ChargeId(5));
        assert_eq!(b, ChargeId(6));
        assert_eq!(s.get(a).unwrap().position, DVec2::new(52.0, 53.0));
        assert_eq!(s.revision(), 3);
    }

    #[test]
    fn drag_moves_charge_then_sensor() {
        let mut s = Scene::dipole();
        s.begin_drag(ChargeId(2)).unwrap();
        s.pointer_moved(DVec2::new(70.0, 20.0));
        assert_eq!(s.get(ChargeId(2)).unwrap().position, DVec2::new(70.0, 20.0));
        assert_eq!(s.sensor(), DVec2::new(50.0, 50.0));
        let rev = s.revision();

        s.end_drag();
        s.pointer_moved(DVec2::new(10.0, 10.0));
        assert_eq!(s.sensor(), DVec2::new(10.0, 10.0));
        assert_eq!(s.revision(), rev);
    }

    #[test]
    fn removing_dragged_charge_ends_drag() {
        let mut s = Scene::dipole();
        s.begin_drag(ChargeId(1)).unwrap();
        assert!(s.remove(ChargeId(1)).is_some());
        assert_eq!(s.dragging(), None);
        assert!(s.remove(ChargeId(1)).is_none());
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut s = Scene::new();
        assert_eq!(
            s.move_charge(ChargeId(9), DVec2::ZERO),
            Err(SceneError::UnknownId(ChargeId(9)))
        );
        assert!(s.begin_drag(ChargeId(9)).is_err());
    }

    #[test]
    fn sensor_reads_dipole_midpoint() {
        let s = Scene::dipole();
        let r = s.probe_sensor();
        assert_eq!(r.sample.potential, 0.0);
        assert_eq!(r.sample.field.y, 0.0);
        assert!(r.sample.field.x > 0.0);
        assert_eq!(r.angle_degrees, 0.0);
    }

    #[test]
    fn trace_uses_scene_field_constants() {
        let mut s = Scene::dipole();
        s.field = FieldConfig::default().with_coupling(1.0);
        let lines = s.trace(&TraceConfig::default());
        assert_eq!(lines.len(), 20);
    }
}
