/// 3×3 linear maps and the named constructors offered alongside direct editing
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;
use std::fmt;

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Row/column index of this axis in a 3×3 matrix
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    pub fn label(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which coordinate gets pushed along by which other coordinate.
///
/// `XY` means x' = x + amount·y, i.e. the X axis sheared by Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShearPlane {
    #[default]
    XY,
    XZ,
    YX,
    YZ,
    ZX,
    ZY,
}

impl ShearPlane {
    pub const ALL: [ShearPlane; 6] = [
        ShearPlane::XY,
        ShearPlane::XZ,
        ShearPlane::YX,
        ShearPlane::YZ,
        ShearPlane::ZX,
        ShearPlane::ZY,
    ];

    /// The (row, column) of the single off-diagonal cell this plane writes
    pub fn cell(self) -> (usize, usize) {
        match self {
            ShearPlane::XY => (0, 1),
            ShearPlane::XZ => (0, 2),
            ShearPlane::YX => (1, 0),
            ShearPlane::YZ => (1, 2),
            ShearPlane::ZX => (2, 0),
            ShearPlane::ZY => (2, 1),
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            ShearPlane::XY => "XY",
            ShearPlane::XZ => "XZ",
            ShearPlane::YX => "YX",
            ShearPlane::YZ => "YZ",
            ShearPlane::ZX => "ZX",
            ShearPlane::ZY => "ZY",
        }
    }
}

impl fmt::Display for ShearPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rotate a vector about the X axis (radians)
pub fn rotate_x(v: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

/// Rotate a vector about the Y axis (radians)
pub fn rotate_y(v: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

/// Rotate a vector about the Z axis (radians)
pub fn rotate_z(v: &Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Transform builder for 3×3 linear maps.
///
/// Every constructor is pure and total. Singular results (flatten, a zero
/// scale factor) are ordinary values, not errors.
pub struct Transform;

impl Transform {
    /// Matrix–vector product `m · v`
    pub fn apply(v: &Vector3<f32>, m: &Matrix3<f32>) -> Vector3<f32> {
        m * v
    }

    /// Rotation from three Euler angles in degrees.
    ///
    /// Each basis vector is rotated about X, then Y, then Z, and the three
    /// results become the matrix columns.
    pub fn rotation_matrix(rx: f32, ry: f32, rz: f32) -> Matrix3<f32> {
        let (ax, ay, az) = (rx.to_radians(), ry.to_radians(), rz.to_radians());
        let column = |basis: Vector3<f32>| rotate_z(&rotate_y(&rotate_x(&basis, ax), ay), az);
        Matrix3::from_columns(&[
            column(Vector3::x()),
            column(Vector3::y()),
            column(Vector3::z()),
        ])
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix3<f32> {
        Matrix3::from_diagonal(&Vector3::new(sx, sy, sz))
    }

    /// Identity with the one off-diagonal cell selected by `plane` set to `amount`
    pub fn shear_matrix(plane: ShearPlane, amount: f32) -> Matrix3<f32> {
        let mut m = Matrix3::identity();
        m[plane.cell()] = amount;
        m
    }

    /// Identity with the diagonal entry for `axis` zeroed. Deliberately singular.
    pub fn flatten_matrix(axis: Axis) -> Matrix3<f32> {
        let mut m = Matrix3::identity();
        let i = axis.index();
        m[(i, i)] = 0.0;
        m
    }
}
