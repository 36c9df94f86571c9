/// MX3D Core Library - 3×3 linear maps applied to a small shaded model
///
/// This library holds everything between a static model and a painted
/// frame: the matrix constructors, the named-operation state machine, the
/// fixed view and perspective projection, flat shading, and the painter's
/// depth sort. It never blocks or performs I/O except when loading a model.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod operation;
pub mod parse;
pub mod preset;
pub mod projection;
pub mod session;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use error::{ModelError, ParseError};
pub use frame::{recompute, AxisSegment, DerivedFrame, DrawFace};
pub use geometry::{BuiltinModel, Face, Model, Rgb};
pub use operation::{Operation, OperationKind, RotateParams, ScaleParams, TransformState};
pub use preset::{Preset, PRESETS};
pub use projection::{Camera, ScreenPoint};
pub use session::Session;
pub use transform::{Axis, ShearPlane, Transform};
