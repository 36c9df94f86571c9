/// Session controller: owns the model and transform state, recomputes after every change
use nalgebra::Matrix3;

use crate::frame::{recompute, DerivedFrame};
use crate::geometry::Model;
use crate::operation::{OperationKind, RotateParams, ScaleParams, TransformState};
use crate::preset::Preset;
use crate::projection::Camera;
use crate::transform::{Axis, ShearPlane};

/// One interactive viewing session.
///
/// Every mutator updates the state and then rebuilds the frame in full, so
/// `frame()` always reflects the current `(model, state)`.
#[derive(Debug, Clone)]
pub struct Session {
    model: Model,
    state: TransformState,
    camera: Camera,
    frame: DerivedFrame,
}

impl Session {
    pub fn new(model: Model, camera: Camera) -> Self {
        let state = TransformState::new();
        let frame = recompute(&model, &state, &camera);
        Self {
            model,
            state,
            camera,
            frame,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frame(&self) -> &DerivedFrame {
        &self.frame
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        self.state.matrix()
    }

    pub fn cell(&self, row: usize, col: usize) -> f32 {
        self.state.cell(row, col)
    }

    pub fn select_operation(&mut self, kind: OperationKind) {
        self.update(|state| state.select(kind));
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: f32) {
        self.update(|state| state.set_cell(row, col, value));
    }

    pub fn set_matrix(&mut self, matrix: Matrix3<f32>) {
        self.update(|state| state.set_matrix(matrix));
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        self.update(|state| state.apply_preset(preset));
    }

    pub fn set_rotation(&mut self, rotate: RotateParams) {
        self.update(|state| state.set_rotation(rotate));
    }

    pub fn set_rotation_angle(&mut self, axis: Axis, degrees: f32) {
        self.update(|state| state.set_rotation_angle(axis, degrees));
    }

    pub fn set_scale(&mut self, scale: ScaleParams) {
        self.update(|state| state.set_scale(scale));
    }

    pub fn set_scale_factor(&mut self, axis: Axis, factor: f32) {
        self.update(|state| state.set_scale_factor(axis, factor));
    }

    pub fn set_shear_plane(&mut self, plane: ShearPlane) {
        self.update(|state| state.set_shear_plane(plane));
    }

    pub fn set_shear_amount(&mut self, amount: f32) {
        self.update(|state| state.set_shear_amount(amount));
    }

    pub fn set_flatten_axis(&mut self, axis: Axis) {
        self.update(|state| state.set_flatten_axis(axis));
    }

    pub fn reset(&mut self) {
        self.update(TransformState::reset);
    }

    /// Swap in a different model; the transform state carries over
    pub fn set_model(&mut self, model: Model) {
        tracing::debug!(label = %model.label, "model changed");
        self.model = model;
        self.refresh();
    }

    /// Change projection parameters, e.g. after a host resize
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.refresh();
    }

    fn update(&mut self, mutate: impl FnOnce(&mut TransformState)) {
        mutate(&mut self.state);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.frame = recompute(&self.model, &self.state, &self.camera);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Model::default(), Camera::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PRESETS;
    use crate::transform::Transform;

    #[test]
    fn test_frame_tracks_every_mutation() {
        let mut session = Session::default();
        let initial = session.frame().clone();

        session.select_operation(OperationKind::Scale);
        session.set_scale_factor(Axis::X, 2.0);
        assert_ne!(*session.frame(), initial);
        assert_eq!(
            *session.frame(),
            recompute(session.model(), session.state(), session.camera())
        );

        session.reset();
        assert_eq!(*session.frame(), initial);
    }

    #[test]
    fn test_preset_is_a_direct_edit() {
        let mut session = Session::default();
        session.select_operation(OperationKind::Rotate);
        session.set_rotation_angle(Axis::Z, 60.0);
        session.apply_preset(&PRESETS[5]);

        assert_eq!(session.state().active(), OperationKind::Idle);
        assert_eq!(*session.matrix(), Transform::flatten_matrix(Axis::Y));
        assert_eq!(session.state().params().rotate.z, 60.0);
    }

    #[test]
    fn test_set_model_keeps_state() {
        let mut session = Session::default();
        session.set_cell(1, 0, 0.5);
        session.set_model(Model::diamond());

        assert_eq!(session.model().label, "Diamond");
        assert_eq!(session.cell(1, 0), 0.5);
        assert_eq!(session.frame().faces.len(), 8);
    }

    #[test]
    fn test_set_camera_reprojects() {
        let mut session = Session::default();
        let before = session.frame().projected.clone();
        session.set_camera(Camera::new(840, 840));
        assert_eq!(session.frame().projected.len(), before.len());
        assert_ne!(session.frame().projected, before);
    }
}
