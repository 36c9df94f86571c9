/// One full recomputation: transform, view-rotate, shade, project, depth-sort
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::geometry::{Model, Rgb};
use crate::operation::TransformState;
use crate::projection::{view_rotate, Camera, ScreenPoint};
use crate::shading::{brightness, face_normal, shade, DEGENERATE_BRIGHTNESS};
use crate::transform::{Axis, Transform};

/// A face ready to paint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawFace {
    /// Index into `Model::faces`
    pub face: usize,
    pub polygon: Vec<ScreenPoint>,
    /// Mean view-space z over the face's vertices
    pub depth: f32,
    pub brightness: f32,
    pub color: Rgb,
}

/// Where one basis vector lands, as a reference arrow from the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSegment {
    pub axis: Axis,
    pub color: Rgb,
    /// Transformed, view-rotated endpoint before projection
    #[serde(skip)]
    pub view_end: Vector3<f32>,
    pub origin: ScreenPoint,
    pub end: ScreenPoint,
}

impl AxisSegment {
    pub fn axis_color(axis: Axis) -> Rgb {
        match axis {
            Axis::X => Rgb::from_hex(0xef4444),
            Axis::Y => Rgb::from_hex(0x22c55e),
            Axis::Z => Rgb::from_hex(0x3b82f6),
        }
    }
}

/// Everything derived from one `(Model, TransformState)` pair.
///
/// Rebuilt from scratch on every change and never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedFrame {
    #[serde(skip)]
    pub view_vertices: Vec<Vector3<f32>>,
    #[serde(skip)]
    pub projected: Vec<ScreenPoint>,
    /// Back to front: paint in this order
    pub faces: Vec<DrawFace>,
    pub axes: [AxisSegment; 3],
    /// Untransformed model edges, for a before/after reference
    pub ghost_edges: Vec<[ScreenPoint; 2]>,
}

/// Rebuild the draw list for `model` under the state's current matrix.
///
/// Vertex indices are trusted. Identical inputs give bit-identical output.
pub fn recompute(model: &Model, state: &TransformState, camera: &Camera) -> DerivedFrame {
    let matrix = state.matrix();

    let view_vertices: Vec<Vector3<f32>> = model
        .vertices
        .iter()
        .map(|v| view_rotate(&Transform::apply(v, matrix)))
        .collect();
    let projected: Vec<ScreenPoint> = view_vertices.iter().map(|v| camera.project(v)).collect();

    let mut faces: Vec<DrawFace> = model
        .faces
        .iter()
        .enumerate()
        .map(|(i, face)| {
            let polygon: Vec<ScreenPoint> = face.indices.iter().map(|&v| projected[v]).collect();
            let depth = mean_depth(&polygon);
            let brightness = match face.indices[..] {
                [a, b, c, ..] => brightness(&face_normal(
                    &view_vertices[a],
                    &view_vertices[b],
                    &view_vertices[c],
                )),
                _ => DEGENERATE_BRIGHTNESS,
            };
            DrawFace {
                face: i,
                polygon,
                depth,
                brightness,
                color: shade(face.color, brightness),
            }
        })
        .collect();
    depth_sort(&mut faces);

    let frame = DerivedFrame {
        axes: axis_overlay(matrix, camera),
        ghost_edges: ghost_edges(model, camera),
        view_vertices,
        projected,
        faces,
    };
    tracing::trace!(faces = frame.faces.len(), "frame recomputed");
    frame
}

/// Painter's order: ascending mean depth, so nearer faces paint last.
///
/// Stable, so faces at equal depth keep model order.
pub fn depth_sort(faces: &mut [DrawFace]) {
    faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

fn mean_depth(points: &[ScreenPoint]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.depth).sum::<f32>() / points.len() as f32
}

fn axis_overlay(matrix: &Matrix3<f32>, camera: &Camera) -> [AxisSegment; 3] {
    let origin = camera.project_model_point(&Vector3::zeros(), matrix);
    Axis::ALL.map(|axis| {
        let view_end = view_rotate(&Transform::apply(&axis.unit(), matrix));
        AxisSegment {
            axis,
            color: AxisSegment::axis_color(axis),
            view_end,
            origin,
            end: camera.project(&view_end),
        }
    })
}

fn ghost_edges(model: &Model, camera: &Camera) -> Vec<[ScreenPoint; 2]> {
    let rest: Vec<ScreenPoint> = model
        .vertices
        .iter()
        .map(|v| camera.project(&view_rotate(v)))
        .collect();
    model
        .edges()
        .into_iter()
        .map(|(a, b)| [rest[a], rest[b]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use crate::operation::OperationKind;
    use crate::shading::AMBIENT;
    use approx::assert_relative_eq;

    fn two_triangles(near_first: bool) -> Model {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(0.0, 1.0, -1.0),
        ];
        let near = Face::new([0, 1, 2], Rgb::from_hex(0xff0000));
        let far = Face::new([3, 4, 5], Rgb::from_hex(0x0000ff));
        let faces = if near_first { vec![near, far] } else { vec![far, near] };
        Model::new("pair", vertices, faces)
    }

    #[test]
    fn test_faces_sorted_back_to_front() {
        for builtin in crate::geometry::BuiltinModel::ALL {
            let mut state = TransformState::new();
            state.select(OperationKind::Rotate);
            state.set_rotation(crate::operation::RotateParams::new(20.0, -70.0, 35.0));
            let frame = recompute(&builtin.build(), &state, &Camera::default());
            assert!(frame.faces.windows(2).all(|w| w[0].depth <= w[1].depth));
        }
    }

    #[test]
    fn test_depth_order_independent_of_model_order() {
        let state = TransformState::new();
        for near_first in [true, false] {
            let model = two_triangles(near_first);
            let frame = recompute(&model, &state, &Camera::default());
            assert!(frame.faces[0].depth < frame.faces[1].depth);
            // the triangle on -z keeps the smaller view depth
            assert_eq!(model.faces[frame.faces[0].face].color, Rgb::from_hex(0x0000ff));
        }
    }

    #[test]
    fn test_depth_sort_is_stable() {
        let face = |face, depth| DrawFace {
            face,
            polygon: Vec::new(),
            depth,
            brightness: 1.0,
            color: Rgb::default(),
        };
        let mut faces = vec![face(0, 1.0), face(1, -2.0), face(2, 1.0), face(3, 0.5)];
        depth_sort(&mut faces);
        let order: Vec<_> = faces.iter().map(|f| f.face).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_draw_face_carries_polygon_and_shade() {
        let model = Model::cube();
        let frame = recompute(&model, &TransformState::new(), &Camera::default());
        assert_eq!(frame.faces.len(), 6);
        for draw in &frame.faces {
            let face = &model.faces[draw.face];
            assert_eq!(draw.polygon.len(), face.indices.len());
            assert!(draw.brightness >= AMBIENT && draw.brightness <= 1.0);
            assert_eq!(draw.color, shade(face.color, draw.brightness));
            for (p, &i) in draw.polygon.iter().zip(&face.indices) {
                assert_eq!(*p, frame.projected[i]);
            }
        }
    }

    #[test]
    fn test_flattened_model_uses_fallback_brightness() {
        // Flattening X collapses each triangle onto a line
        let model = two_triangles(true);
        let mut state = TransformState::new();
        state.select(OperationKind::Flatten);
        state.set_flatten_axis(Axis::X);
        let frame = recompute(&model, &state, &Camera::default());
        for draw in &frame.faces {
            assert_eq!(draw.brightness, DEGENERATE_BRIGHTNESS);
        }
    }

    #[test]
    fn test_axis_overlay_follows_matrix() {
        let mut state = TransformState::new();
        state.set_cell(0, 0, 2.0);
        let camera = Camera::default();
        let frame = recompute(&Model::cube(), &state, &camera);

        assert_eq!(frame.axes.map(|a| a.axis), Axis::ALL);
        let origin = camera.project(&Vector3::zeros());
        for segment in &frame.axes {
            assert_eq!(segment.origin, origin);
            assert_eq!(segment.color, AxisSegment::axis_color(segment.axis));
        }
        assert_relative_eq!(frame.axes[0].view_end.norm(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(frame.axes[1].view_end.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ghost_edges_ignore_matrix() {
        let model = Model::pyramid();
        let camera = Camera::default();
        let plain = recompute(&model, &TransformState::new(), &camera);

        let mut state = TransformState::new();
        state.select(OperationKind::Scale);
        state.set_scale_factor(Axis::Y, 0.2);
        let squashed = recompute(&model, &state, &camera);

        assert_eq!(plain.ghost_edges.len(), model.edges().len());
        assert_eq!(plain.ghost_edges, squashed.ghost_edges);
        assert_ne!(plain.projected, squashed.projected);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let model = Model::house();
        let mut state = TransformState::new();
        state.select(OperationKind::Shear);
        state.set_shear_amount(0.9);
        let camera = Camera::default();
        assert_eq!(recompute(&model, &state, &camera), recompute(&model, &state, &camera));
    }

    #[test]
    fn test_frame_serializes_draw_list() {
        let frame = recompute(&Model::diamond(), &TransformState::new(), &Camera::default());
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["faces"].as_array().unwrap().len(), 8);
        assert_eq!(json["axes"][0]["axis"], "X");
        assert_eq!(json["axes"][2]["color"], "#3b82f6");
        assert!(json["faces"][0]["color"].as_str().unwrap().starts_with('#'));
        assert!(json.get("view_vertices").is_none());
    }
}
