/// MX3D Web - canvas viewer compiled to WASM
///
/// Wraps a core `Session` for JavaScript callers and paints the derived
/// frame onto a 2D canvas. All state changes go through the session, so the
/// next `render` always reflects the latest edit.
use mx3d_core::{
    parse::parse_matrix, Axis, BuiltinModel, Camera, DerivedFrame, Model, OperationKind, Rgb,
    Session, ShearPlane, PRESETS,
};
use nalgebra::Matrix3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#0f172a";
const GHOST_STROKE: &str = "rgba(148, 163, 184, 0.35)";
const EDGE_STROKE: &str = "rgba(15, 23, 42, 0.6)";

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebViewer {
    session: Session,
    canvas_size: (u32, u32),
}

#[wasm_bindgen]
impl WebViewer {
    /// Start on a built-in model by name (`cube`, `pyramid`, ...)
    #[wasm_bindgen(constructor)]
    pub fn new(model: &str) -> Result<WebViewer, JsValue> {
        let builtin: BuiltinModel = model.parse().map_err(js_error)?;
        Ok(Self::from_model(builtin.build()))
    }

    pub fn cell(&self, row: usize, col: usize) -> f32 {
        self.session.cell(row, col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: f32) {
        self.session.set_cell(row, col, value);
    }

    /// Row-major 3×3 values
    pub fn matrix(&self) -> Vec<f32> {
        self.session.matrix().transpose().as_slice().to_vec()
    }

    /// Replace the matrix from nine row-major values
    pub fn set_matrix(&mut self, values: &[f32]) -> Result<(), JsValue> {
        if values.len() != 9 {
            return Err(js_error(format!("expected 9 values, got {}", values.len())));
        }
        self.session.set_matrix(Matrix3::from_row_slice(values));
        Ok(())
    }

    /// Replace the matrix from text such as `1 0 0; 0 1 0; 0 0 1`
    pub fn set_matrix_text(&mut self, text: &str) -> Result<(), JsValue> {
        let matrix = parse_matrix(text).map_err(js_error)?;
        self.session.set_matrix(matrix);
        Ok(())
    }

    /// Toggle a named operation; `none` returns to direct editing
    pub fn select_operation(&mut self, name: &str) -> Result<(), JsValue> {
        let kind: OperationKind = name.parse().map_err(js_error)?;
        self.session.select_operation(kind);
        Ok(())
    }

    pub fn active_operation(&self) -> String {
        self.session.state().active_operation().to_string()
    }

    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.session.set_rotation_angle(Axis::X, x);
        self.session.set_rotation_angle(Axis::Y, y);
        self.session.set_rotation_angle(Axis::Z, z);
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.session.set_scale_factor(Axis::X, x);
        self.session.set_scale_factor(Axis::Y, y);
        self.session.set_scale_factor(Axis::Z, z);
    }

    /// Plane index follows `XY, XZ, YX, YZ, ZX, ZY`
    pub fn set_shear(&mut self, plane: usize, amount: f32) -> Result<(), JsValue> {
        let plane = *ShearPlane::ALL
            .get(plane)
            .ok_or_else(|| js_error(format!("no shear plane {plane}")))?;
        self.session.set_shear_plane(plane);
        self.session.set_shear_amount(amount);
        Ok(())
    }

    pub fn set_flatten_axis(&mut self, axis: usize) -> Result<(), JsValue> {
        let axis = *Axis::ALL
            .get(axis)
            .ok_or_else(|| js_error(format!("no axis {axis}")))?;
        self.session.set_flatten_axis(axis);
        Ok(())
    }

    pub fn preset_labels(&self) -> Vec<JsValue> {
        PRESETS.iter().map(|p| JsValue::from_str(p.label)).collect()
    }

    pub fn apply_preset(&mut self, index: usize) -> Result<(), JsValue> {
        let preset = PRESETS
            .get(index)
            .ok_or_else(|| js_error(format!("no preset {index}")))?;
        self.session.apply_preset(preset);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn set_model(&mut self, name: &str) -> Result<(), JsValue> {
        let builtin: BuiltinModel = name.parse().map_err(js_error)?;
        self.session.set_model(builtin.build());
        Ok(())
    }

    /// Load a model in the compact `{label, v, f}` JSON form
    pub fn load_model_json(&mut self, json: &str) -> Result<(), JsValue> {
        let model = Model::from_compact_json(json).map_err(js_error)?;
        self.session.set_model(model);
        Ok(())
    }

    /// The current draw list as JSON, for callers that paint it themselves
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.frame()).map_err(js_error)
    }

    /// Paint the current frame onto the canvas with the given element id
    pub fn render(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("no element #{canvas_id}")))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("2d context unavailable"))?
            .dyn_into()?;

        let size = (canvas.width(), canvas.height());
        if size != self.canvas_size {
            self.canvas_size = size;
            self.session.set_camera(Camera::new(size.0, size.1));
        }

        paint(&ctx, self.session.frame(), size)
    }
}

impl WebViewer {
    pub fn from_model(model: Model) -> Self {
        let camera = Camera::default();
        Self {
            session: Session::new(model, camera),
            canvas_size: (0, 0),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

fn paint(ctx: &CanvasRenderingContext2d, frame: &DerivedFrame, (w, h): (u32, u32)) -> Result<(), JsValue> {
    ctx.set_fill_style(&JsValue::from_str(BACKGROUND));
    ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

    ctx.set_line_width(1.0);
    ctx.set_stroke_style(&JsValue::from_str(GHOST_STROKE));
    for [a, b] in &frame.ghost_edges {
        ctx.begin_path();
        ctx.move_to(a.x as f64, a.y as f64);
        ctx.line_to(b.x as f64, b.y as f64);
        ctx.stroke();
    }

    ctx.set_stroke_style(&JsValue::from_str(EDGE_STROKE));
    for face in &frame.faces {
        let Some((first, rest)) = face.polygon.split_first() else {
            continue;
        };
        ctx.begin_path();
        ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            ctx.line_to(p.x as f64, p.y as f64);
        }
        ctx.close_path();
        ctx.set_fill_style(&JsValue::from_str(&css_color(face.color)));
        ctx.fill();
        ctx.stroke();
    }

    ctx.set_line_width(2.0);
    for segment in &frame.axes {
        let color = JsValue::from_str(&css_color(segment.color));
        ctx.set_stroke_style(&color);
        ctx.set_fill_style(&color);
        ctx.begin_path();
        ctx.move_to(segment.origin.x as f64, segment.origin.y as f64);
        ctx.line_to(segment.end.x as f64, segment.end.y as f64);
        ctx.stroke();
        ctx.fill_text(
            &segment.axis.to_string(),
            segment.end.x as f64 + 4.0,
            segment.end.y as f64,
        )?;
    }
    Ok(())
}

fn css_color(color: Rgb) -> String {
    color.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(Rgb::from_hex(0x22c55e)), "#22c55e");
    }

    #[test]
    fn test_viewer_edits_flow_to_frame() {
        let mut viewer = WebViewer::from_model(Model::cube());
        viewer.set_cell(0, 1, 0.5);
        assert_eq!(viewer.cell(0, 1), 0.5);
        assert_eq!(viewer.matrix(), vec![1.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(viewer.session().frame().faces.len(), 6);
    }

    #[test]
    fn test_viewer_operations() {
        let mut viewer = WebViewer::new("pyramid").unwrap();
        viewer.select_operation("scale").unwrap();
        viewer.set_scale(2.0, 1.0, 1.0);
        assert_eq!(viewer.cell(0, 0), 2.0);
        assert_eq!(viewer.active_operation(), "Scale x=2.00 y=1.00 z=1.00");

        viewer.reset();
        assert_eq!(viewer.active_operation(), "None");
        assert_eq!(viewer.cell(0, 0), 1.0);
    }

    #[test]
    fn test_frame_json_lists_faces() {
        let viewer = WebViewer::from_model(Model::diamond());
        let json = viewer.frame_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["faces"].as_array().map(Vec::len), Some(8));
    }
}
