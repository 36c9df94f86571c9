/// Named operations and the state machine that owns the displayed matrix
use nalgebra::Matrix3;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::preset::Preset;
use crate::transform::{Axis, ShearPlane, Transform};

/// Which named operation, if any, currently drives the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationKind {
    /// No operation: the matrix holds direct edits (or was just reset)
    #[default]
    Idle,
    Rotate,
    Scale,
    Shear,
    Flatten,
}

impl OperationKind {
    pub const NAMED: [OperationKind; 4] = [
        OperationKind::Rotate,
        OperationKind::Scale,
        OperationKind::Shear,
        OperationKind::Flatten,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Idle => "None",
            OperationKind::Rotate => "Rotate",
            OperationKind::Scale => "Scale",
            OperationKind::Shear => "Shear",
            OperationKind::Flatten => "Flatten",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OperationKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "idle" => Ok(OperationKind::Idle),
            "rotate" => Ok(OperationKind::Rotate),
            "scale" => Ok(OperationKind::Scale),
            "shear" => Ok(OperationKind::Shear),
            "flatten" => Ok(OperationKind::Flatten),
            _ => Err(ParseError::UnknownOperation(s.to_string())),
        }
    }
}

/// Euler angles in degrees, applied X then Y then Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateParams {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotateParams {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::X => self.x = degrees,
            Axis::Y => self.y = degrees,
            Axis::Z => self.z = degrees,
        }
    }
}

impl Default for RotateParams {
    fn default() -> Self {
        Self::zero()
    }
}

/// Per-axis scale factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ScaleParams {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn unit() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, factor: f32) {
        match axis {
            Axis::X => self.x = factor,
            Axis::Y => self.y = factor,
            Axis::Z => self.z = factor,
        }
    }
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self::unit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShearParams {
    pub plane: ShearPlane,
    pub amount: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlattenParams {
    pub axis: Axis,
}

/// A named operation together with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Idle,
    Rotate(RotateParams),
    Scale(ScaleParams),
    Shear(ShearParams),
    Flatten(FlattenParams),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Idle => OperationKind::Idle,
            Operation::Rotate(_) => OperationKind::Rotate,
            Operation::Scale(_) => OperationKind::Scale,
            Operation::Shear(_) => OperationKind::Shear,
            Operation::Flatten(_) => OperationKind::Flatten,
        }
    }

    /// The matrix this operation prescribes.
    ///
    /// `Idle` prescribes nothing: its matrix is whatever was last edited in.
    pub fn matrix(&self) -> Option<Matrix3<f32>> {
        match *self {
            Operation::Idle => None,
            Operation::Rotate(p) => Some(Transform::rotation_matrix(p.x, p.y, p.z)),
            Operation::Scale(p) => Some(Transform::scale_matrix(p.x, p.y, p.z)),
            Operation::Shear(p) => Some(Transform::shear_matrix(p.plane, p.amount)),
            Operation::Flatten(p) => Some(Transform::flatten_matrix(p.axis)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Idle => write!(f, "None"),
            Operation::Rotate(p) => write!(f, "Rotate x={:.0}° y={:.0}° z={:.0}°", p.x, p.y, p.z),
            Operation::Scale(p) => write!(f, "Scale x={:.2} y={:.2} z={:.2}", p.x, p.y, p.z),
            Operation::Shear(p) => write!(f, "Shear {} by {:.2}", p.plane, p.amount),
            Operation::Flatten(p) => write!(f, "Flatten {}", p.axis),
        }
    }
}

/// Stored parameters for every named operation, active or not
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperationParams {
    pub rotate: RotateParams,
    pub scale: ScaleParams,
    pub shear: ShearParams,
    pub flatten: FlattenParams,
}

impl OperationParams {
    /// Pair `kind` with its stored parameters
    pub fn operation(&self, kind: OperationKind) -> Operation {
        match kind {
            OperationKind::Idle => Operation::Idle,
            OperationKind::Rotate => Operation::Rotate(self.rotate),
            OperationKind::Scale => Operation::Scale(self.scale),
            OperationKind::Shear => Operation::Shear(self.shear),
            OperationKind::Flatten => Operation::Flatten(self.flatten),
        }
    }

    fn reset_kind(&mut self, kind: OperationKind) {
        match kind {
            OperationKind::Idle => {}
            OperationKind::Rotate => self.rotate = RotateParams::default(),
            OperationKind::Scale => self.scale = ScaleParams::default(),
            OperationKind::Shear => self.shear = ShearParams::default(),
            OperationKind::Flatten => self.flatten = FlattenParams::default(),
        }
    }
}

/// The single mutable entity of a session.
///
/// The matrix is either the literal result of the last direct edit (while
/// `Idle`) or exactly `active_operation().matrix()`. Parameter values are
/// never range-checked or wrapped; callers bound them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    matrix: Matrix3<f32>,
    active: OperationKind,
    params: OperationParams,
}

impl TransformState {
    pub fn new() -> Self {
        Self {
            matrix: Matrix3::identity(),
            active: OperationKind::Idle,
            params: OperationParams::default(),
        }
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }

    /// Read one cell; out-of-range indices read as 0
    pub fn cell(&self, row: usize, col: usize) -> f32 {
        self.matrix.get((row, col)).copied().unwrap_or(0.0)
    }

    pub fn active(&self) -> OperationKind {
        self.active
    }

    pub fn params(&self) -> &OperationParams {
        &self.params
    }

    pub fn active_operation(&self) -> Operation {
        self.params.operation(self.active)
    }

    /// Select a named operation, or toggle it off if it is already active.
    ///
    /// Toggling off leaves the matrix as it is. Selecting a new operation
    /// resets that operation's parameters to their defaults and rebuilds
    /// the matrix from them.
    pub fn select(&mut self, kind: OperationKind) {
        if kind == self.active || kind == OperationKind::Idle {
            tracing::debug!(operation = %self.active, "operation toggled off");
            self.active = OperationKind::Idle;
            return;
        }

        self.params.reset_kind(kind);
        self.active = kind;
        self.rebuild();
        tracing::debug!(operation = %kind, "operation selected");
    }

    /// Overwrite one cell and drop back to `Idle`.
    ///
    /// Stored operation parameters are left alone; they are not fitted to
    /// the edited matrix.
    pub fn set_cell(&mut self, row: usize, col: usize, value: f32) {
        let Some(cell) = self.matrix.get_mut((row, col)) else {
            tracing::warn!(row, col, "ignoring edit of a cell outside the 3x3 matrix");
            return;
        };
        *cell = value;
        self.active = OperationKind::Idle;
        tracing::debug!(row, col, value, "matrix cell edited");
    }

    /// Replace all nine cells at once; behaves like a direct edit
    pub fn set_matrix(&mut self, matrix: Matrix3<f32>) {
        self.matrix = matrix;
        self.active = OperationKind::Idle;
        tracing::debug!("matrix replaced");
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        tracing::debug!(preset = preset.label, "applying preset");
        self.set_matrix(preset.matrix());
    }

    pub fn set_rotation(&mut self, rotate: RotateParams) {
        self.params.rotate = rotate;
        self.parameter_changed(OperationKind::Rotate);
    }

    pub fn set_rotation_angle(&mut self, axis: Axis, degrees: f32) {
        self.params.rotate.set(axis, degrees);
        self.parameter_changed(OperationKind::Rotate);
    }

    pub fn set_scale(&mut self, scale: ScaleParams) {
        self.params.scale = scale;
        self.parameter_changed(OperationKind::Scale);
    }

    pub fn set_scale_factor(&mut self, axis: Axis, factor: f32) {
        self.params.scale.set(axis, factor);
        self.parameter_changed(OperationKind::Scale);
    }

    pub fn set_shear_plane(&mut self, plane: ShearPlane) {
        self.params.shear.plane = plane;
        self.parameter_changed(OperationKind::Shear);
    }

    pub fn set_shear_amount(&mut self, amount: f32) {
        self.params.shear.amount = amount;
        self.parameter_changed(OperationKind::Shear);
    }

    pub fn set_flatten_axis(&mut self, axis: Axis) {
        self.params.flatten.axis = axis;
        self.parameter_changed(OperationKind::Flatten);
    }

    /// Identity matrix, `Idle`, every parameter back to its default
    pub fn reset(&mut self) {
        *self = Self::new();
        tracing::debug!("transform state reset");
    }

    // Parameters of an inactive operation are stored but do not touch the
    // matrix; an active operation always rebuilds the whole matrix.
    fn parameter_changed(&mut self, kind: OperationKind) {
        if self.active == kind {
            self.rebuild();
            tracing::debug!(operation = %self.active_operation(), "operation parameters changed");
        } else {
            tracing::debug!(operation = %kind, active = %self.active, "stored parameters of inactive operation");
        }
    }

    fn rebuild(&mut self) {
        if let Some(matrix) = self.active_operation().matrix() {
            self.matrix = matrix;
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new()
    }
}
