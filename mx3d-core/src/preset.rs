/// Named whole-matrix shortcuts, written as the images of the three basis vectors
use nalgebra::{Matrix3, Vector3};
use std::f32::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub label: &'static str,
    /// Where X, Y and Z land; these become the matrix columns
    pub basis: [[f32; 3]; 3],
}

impl Preset {
    pub fn matrix(&self) -> Matrix3<f32> {
        let [e1, e2, e3] = self.basis;
        Matrix3::from_columns(&[Vector3::from(e1), Vector3::from(e2), Vector3::from(e3)])
    }
}

const C45: f32 = FRAC_1_SQRT_2;

pub const PRESETS: [Preset; 7] = [
    Preset {
        label: "Identity",
        basis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    },
    Preset {
        label: "Rot X 45°",
        basis: [[1.0, 0.0, 0.0], [0.0, C45, C45], [0.0, -C45, C45]],
    },
    Preset {
        label: "Rot Y 45°",
        basis: [[C45, 0.0, -C45], [0.0, 1.0, 0.0], [C45, 0.0, C45]],
    },
    Preset {
        label: "Rot Z 45°",
        basis: [[C45, C45, 0.0], [-C45, C45, 0.0], [0.0, 0.0, 1.0]],
    },
    Preset {
        label: "Scale 1.5×",
        basis: [[1.5, 0.0, 0.0], [0.0, 1.5, 0.0], [0.0, 0.0, 1.5]],
    },
    Preset {
        label: "Flatten Y",
        basis: [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    },
    Preset {
        label: "Shear XY",
        basis: [[1.0, 0.0, 0.0], [0.5, 1.0, 0.0], [0.0, 0.0, 1.0]],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, ShearPlane, Transform};
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_match_named_constructors() {
        assert_eq!(PRESETS[0].matrix(), Matrix3::identity());
        assert_relative_eq!(PRESETS[1].matrix(), Transform::rotation_matrix(45.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(PRESETS[2].matrix(), Transform::rotation_matrix(0.0, 45.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(PRESETS[3].matrix(), Transform::rotation_matrix(0.0, 0.0, 45.0), epsilon = 1e-6);
        assert_eq!(PRESETS[4].matrix(), Transform::scale_matrix(1.5, 1.5, 1.5));
        assert_eq!(PRESETS[5].matrix(), Transform::flatten_matrix(Axis::Y));
        assert_eq!(PRESETS[6].matrix(), Transform::shear_matrix(ShearPlane::XY, 0.5));
    }
}
