/// Fixed viewing rotation and perspective projection to screen space
use nalgebra::{Matrix3, Point2, Vector3};
use serde::Serialize;

use crate::transform::{rotate_x, rotate_y, Transform};

/// Tilt about X of the fixed three-quarter view (radians)
pub const VIEW_RX: f32 = 0.45;
/// Turn about Y of the fixed three-quarter view (radians)
pub const VIEW_RY: f32 = 0.65;
/// Perspective viewing distance
pub const DISTANCE: f32 = 6.0;
/// Pixels per model unit on the reference viewport
pub const SCALE: f32 = 80.0;
/// Side length of the square reference viewport
pub const VIEWPORT: f32 = 420.0;

/// A projected point; `depth` is the view-space z it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    pub fn xy(&self) -> Point2<f32> {
        Point2::new(self.x, self.y)
    }
}

/// Apply the fixed view rotation: about X, then about Y
pub fn view_rotate(v: &Vector3<f32>) -> Vector3<f32> {
    rotate_y(&rotate_x(v, VIEW_RX), VIEW_RY)
}

/// Projection parameters for one host surface.
///
/// The view rotation is not part of this; it is the same for every host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Point2<f32>,
    pub distance: f32,
    pub scale: f32,
    /// Horizontal stretch, for hosts whose pixels are not square
    pub aspect: f32,
}

impl Camera {
    /// Center on a `width`×`height` surface, scaling to its smaller side
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            center: Point2::new(w / 2.0, h / 2.0),
            distance: DISTANCE,
            scale: SCALE * w.min(h) / VIEWPORT,
            aspect: 1.0,
        }
    }

    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Perspective-project a view-space point.
    ///
    /// No clipping and no guard on `distance + z`: a point at the eye plane
    /// projects to infinity rather than failing.
    pub fn project(&self, v: &Vector3<f32>) -> ScreenPoint {
        let s = self.distance / (self.distance + v.z) * self.scale;
        ScreenPoint {
            x: self.center.x + v.x * s * self.aspect,
            y: self.center.y - v.y * s,
            depth: v.z,
        }
    }

    /// Model point → user matrix → view rotation → screen
    pub fn project_model_point(&self, v: &Vector3<f32>, matrix: &Matrix3<f32>) -> ScreenPoint {
        self.project(&view_rotate(&Transform::apply(v, matrix)))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(VIEWPORT as u32, VIEWPORT as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.center, Point2::new(210.0, 210.0));
        assert_eq!(camera.scale, SCALE);
        assert_eq!(camera.distance, DISTANCE);

        let wide = Camera::new(800, 210);
        assert_eq!(wide.center, Point2::new(400.0, 105.0));
        assert_relative_eq!(wide.scale, 40.0);
    }

    #[test]
    fn test_project_origin_hits_center() {
        let p = Camera::default().project(&Vector3::zeros());
        assert_eq!((p.x, p.y, p.depth), (210.0, 210.0, 0.0));
    }

    #[test]
    fn test_project_formula() {
        let camera = Camera::default();
        let p = camera.project(&Vector3::new(1.0, 1.0, 2.0));
        let k = 6.0 / 8.0 * 80.0;
        assert_relative_eq!(p.x, 210.0 + k);
        assert_relative_eq!(p.y, 210.0 - k);
        assert_eq!(p.depth, 2.0);

        // farther points shrink toward the center
        let near = camera.project(&Vector3::new(1.0, 0.0, -1.0));
        let far = camera.project(&Vector3::new(1.0, 0.0, 1.0));
        assert!(near.x - 210.0 > far.x - 210.0);
    }

    #[test]
    fn test_aspect_stretches_x_only() {
        let camera = Camera::default().with_aspect(2.0);
        let p = camera.project(&Vector3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 210.0 + 160.0);
        assert_relative_eq!(p.y, 210.0 - 80.0);
    }

    #[test]
    fn test_view_rotate_preserves_length() {
        let v = Vector3::new(0.4, -1.2, 0.9);
        assert_relative_eq!(view_rotate(&v).norm(), v.norm(), epsilon = 1e-6);
        assert_eq!(view_rotate(&Vector3::zeros()), Vector3::zeros());
    }

    #[test]
    fn test_eye_plane_does_not_panic() {
        let p = Camera::default().project(&Vector3::new(1.0, 1.0, -DISTANCE));
        assert!(p.x.is_infinite());
    }
}
