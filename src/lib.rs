//! Electric field, potential and field-line tracing for 2-D point charges.
//!
//! Coordinates are percent-of-viewport units: the visible plane is
//! `[0, 100] x [0, 100]`. Every engine function is pure; callers own the
//! charge set (see [`Scene`]) and recompute whenever it changes.
//!
//! ```
//! use charge_field::{PointCharge, TraceConfig, sample_field_default, trace_field_lines};
//! use glam::DVec2;
//!
//! let charges = [
//!     PointCharge::new(1, 35.0, 50.0, 5.0),
//!     PointCharge::new(2, 65.0, 50.0, -5.0),
//! ];
//! let s = sample_field_default(DVec2::new(50.0, 50.0), &charges);
//! assert_eq!(s.potential, 0.0);
//!
//! let lines = trace_field_lines(&charges, &TraceConfig::default());
//! assert_eq!(lines.len(), 20);
//! ```

pub mod config;
pub mod em2d;
pub mod error;
pub mod probe;
pub mod seed;
pub mod state;
pub mod stream2d;

pub use glam::DVec2;

pub use config::{Bounds, FieldConfig, TraceConfig};
pub use em2d::{ChargeId, FieldSample, PointCharge, sample_field, sample_field_default};
pub use error::{ConfigError, SceneError};
pub use probe::{ProbeReading, probe};
pub use state::Scene;
pub use stream2d::{Direction, FieldLine, Termination, trace_field_lines, trace_from};
