use charge_field::{Direction, PointCharge, TraceConfig, sample_field, trace_field_lines};
use glam::DVec2;
use wasm_bindgen::prelude::*;

/// JS-facing handle over the field engine.
///
/// Charges are pushed in by the UI on every scene change; `trace` fills flat
/// buffers the renderer reads through the `*_ptr` getters.
#[wasm_bindgen]
pub struct FieldEngine {
    charges: Vec<PointCharge>,
    config: TraceConfig,
    // Interleaved line points: [x, y, x, y, ...]
    points: Vec<f32>,
    // Point index where each line starts, plus one trailing end index.
    offsets: Vec<u32>,
    origins: Vec<u32>,
    // +1 outward, -1 inward
    directions: Vec<i8>,
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FieldEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FieldEngine {
        FieldEngine {
            charges: Vec::new(),
            config: TraceConfig::default(),
            points: Vec::new(),
            offsets: vec![0],
            origins: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn clear_charges(&mut self) {
        self.charges.clear();
    }

    pub fn add_charge(&mut self, id: u32, x: f64, y: f64, q: f64) {
        self.charges.push(PointCharge::new(u64::from(id), x, y, q));
    }

    pub fn charge_count(&self) -> usize {
        self.charges.len()
    }

    pub fn set_max_steps(&mut self, steps: i32) {
        self.config = self.config.with_max_steps_signed(i64::from(steps));
    }

    pub fn set_step_size(&mut self, step: f64) {
        self.config = self.config.with_step_size(step);
    }

    pub fn set_lines_per_unit_charge(&mut self, n: f64) {
        self.config = self.config.with_lines_per_unit_charge(n);
    }

    /// Replace the whole trace config from JSON. Returns false and keeps the
    /// old config if the JSON does not parse.
    pub fn load_config(&mut self, json: &str) -> bool {
        match TraceConfig::from_json(json) {
            Ok(cfg) => {
                self.config = cfg;
                true
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring trace config");
                false
            }
        }
    }

    /// `[Ex, Ey, V, magnitude]` at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> Vec<f64> {
        let s = sample_field(DVec2::new(x, y), &self.charges, &self.config.field);
        vec![s.field.x, s.field.y, s.potential, s.magnitude]
    }

    /// Retrace every line into the flat buffers. Returns the line count.
    pub fn trace(&mut self) -> usize {
        let lines = trace_field_lines(&self.charges, &self.config);

        self.points.clear();
        self.offsets.clear();
        self.origins.clear();
        self.directions.clear();
        self.offsets.push(0);

        for line in &lines {
            for p in &line.points {
                self.points.push(p.x as f32);
                self.points.push(p.y as f32);
            }
            self.offsets.push((self.points.len() / 2) as u32);
            self.origins.push(line.origin.0 as u32);
            self.directions.push(match line.direction {
                Direction::Outward => 1,
                Direction::Inward => -1,
            });
        }
        lines.len()
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr()
    }
    pub fn points_len(&self) -> usize {
        self.points.len()
    }

    pub fn line_offsets_ptr(&self) -> *const u32 {
        self.offsets.as_ptr()
    }
    pub fn line_offsets_len(&self) -> usize {
        self.offsets.len()
    }

    pub fn line_origins(&self) -> Vec<u32> {
        self.origins.clone()
    }
    pub fn line_directions(&self) -> Vec<i8> {
        self.directions.clone()
    }
}
