/// Flat per-face shading from one constant directional light
use nalgebra::Vector3;

use crate::geometry::Rgb;

/// Direction of the single light (not normalized)
pub const LIGHT_DIR: [f32; 3] = [0.3, 0.8, -0.5];
/// Brightness floor every face receives
pub const AMBIENT: f32 = 0.35;
/// Weight of the |cos| term on top of the floor
pub const DIFFUSE: f32 = 0.65;
/// Brightness used when a face has no usable normal
pub const DEGENERATE_BRIGHTNESS: f32 = 0.5;
/// Normals shorter than this are treated as degenerate
pub const DEGENERATE_EPSILON: f32 = 1e-4;

/// Unnormalized face normal `(v1 - v0) × (v2 - v0)`; its direction follows winding
pub fn face_normal(v0: &Vector3<f32>, v1: &Vector3<f32>, v2: &Vector3<f32>) -> Vector3<f32> {
    (v1 - v0).cross(&(v2 - v0))
}

/// `AMBIENT + DIFFUSE · |n̂ · l̂|`, or [`DEGENERATE_BRIGHTNESS`] for a collapsed face.
///
/// Two-sided: a normal and its negation get the same brightness.
pub fn brightness(normal: &Vector3<f32>) -> f32 {
    let len = normal.norm();
    if len < DEGENERATE_EPSILON {
        return DEGENERATE_BRIGHTNESS;
    }
    let light = Vector3::from(LIGHT_DIR);
    let cos = normal.dot(&light) / (len * light.norm());
    AMBIENT + DIFFUSE * cos.abs().min(1.0)
}

/// Scale each channel by `brightness`, rounding and clamping to 0..=255
pub fn shade(color: Rgb, brightness: f32) -> Rgb {
    let channel = |c: u8| (c as f32 * brightness).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(color.r), channel(color.g), channel(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_normal_follows_winding() {
        let (a, b, c) = (Vector3::zeros(), Vector3::x(), Vector3::y());
        assert_eq!(face_normal(&a, &b, &c), Vector3::z());
        assert_eq!(face_normal(&a, &c, &b), -Vector3::z());
    }

    #[test]
    fn test_brightness_along_light_is_full() {
        let light = Vector3::from(LIGHT_DIR);
        assert_relative_eq!(brightness(&light), 1.0, epsilon = 1e-6);
        assert_relative_eq!(brightness(&(-light * 3.0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_brightness_perpendicular_is_ambient() {
        let light = Vector3::from(LIGHT_DIR);
        let perpendicular = light.cross(&Vector3::x());
        assert_relative_eq!(brightness(&perpendicular), AMBIENT, epsilon = 1e-6);
    }

    #[test]
    fn test_brightness_bounds() {
        let normals = [
            Vector3::x(),
            Vector3::new(-2.0, 0.1, 7.0),
            Vector3::new(1e-3, -4e-3, 2e-3),
            Vector3::new(100.0, 100.0, -100.0),
        ];
        for n in normals {
            let b = brightness(&n);
            assert!((AMBIENT..=1.0).contains(&b), "brightness {} out of range", b);
        }
    }

    #[test]
    fn test_degenerate_normal_falls_back() {
        assert_eq!(brightness(&Vector3::zeros()), DEGENERATE_BRIGHTNESS);
        assert_eq!(brightness(&Vector3::new(1e-5, 0.0, 0.0)), DEGENERATE_BRIGHTNESS);

        // collinear triangle
        let n = face_normal(&Vector3::zeros(), &Vector3::x(), &(Vector3::x() * 2.0));
        assert_eq!(brightness(&n), DEGENERATE_BRIGHTNESS);
    }

    #[test]
    fn test_shade() {
        let base = Rgb::new(200, 100, 51);
        assert_eq!(shade(base, 1.0), base);
        assert_eq!(shade(base, 0.5), Rgb::new(100, 50, 26));
        assert_eq!(shade(Rgb::new(255, 255, 255), 1.5), Rgb::new(255, 255, 255));
        assert_eq!(shade(base, -1.0), Rgb::new(0, 0, 0));
    }
}
