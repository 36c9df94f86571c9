/// ASCII painter for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use mx3d_core::{DerivedFrame, Rgb, ScreenPoint};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const GHOST_GLYPH: char = '·';
const GHOST_COLOR: Rgb = Rgb::new(0x6b, 0x72, 0x80);

/// Paints a draw list into a character grid.
///
/// There is no depth buffer: polygons are filled in the order given and
/// later ones simply overwrite earlier ones.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Option<Rgb>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![None; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(None);
    }

    /// Character at a cell, for inspection
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn color(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.color_buffer[y * self.width + x]
        } else {
            None
        }
    }

    /// Ghost wireframe first, then faces back to front, then the axis arrows
    pub fn render_frame(&mut self, frame: &DerivedFrame) {
        for [a, b] in &frame.ghost_edges {
            self.draw_line(a, b, GHOST_GLYPH, GHOST_COLOR);
        }

        for face in &frame.faces {
            let glyph = shade_glyph(face.brightness);
            self.fill_polygon(&face.polygon, glyph, face.color);
        }

        for axis in &frame.axes {
            self.draw_line(&axis.origin, &axis.end, '*', axis.color);
            self.put(axis.end.x.round() as i32 + 1, axis.end.y.round() as i32, axis.axis.label(), axis.color);
        }
    }

    /// Fill a convex polygon by fanning it into triangles from its first vertex
    fn fill_polygon(&mut self, polygon: &[ScreenPoint], glyph: char, color: Rgb) {
        if polygon.len() < 3 {
            return;
        }
        for i in 1..polygon.len() - 1 {
            self.rasterize_triangle(
                (polygon[0].x, polygon[0].y),
                (polygon[i].x, polygon[i].y),
                (polygon[i + 1].x, polygon[i + 1].y),
                glyph,
                color,
            );
        }
    }

    fn rasterize_triangle(
        &mut self,
        v0: (f32, f32),
        v1: (f32, f32),
        v2: (f32, f32),
        glyph: char,
        color: Rgb,
    ) {
        if ![v0, v1, v2].iter().all(|(x, y)| x.is_finite() && y.is_finite()) {
            return;
        }

        // Bounding box, clipped to the grid
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    // either winding counts as inside
                    let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                        || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                    if inside {
                        self.put(x, y, glyph, color);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, a: &ScreenPoint, b: &ScreenPoint, glyph: char, color: Rgb) {
        if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return;
        }
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let steps = dx.abs().max(dy.abs()).ceil().min(4096.0) as usize;
        for i in 0..=steps {
            let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
            self.put(
                (a.x + dx * t).round() as i32,
                (a.y + dy * t).round() as i32,
                glyph,
                color,
            );
        }
    }

    fn put(&mut self, x: i32, y: i32, glyph: char, color: Rgb) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = glyph;
        self.color_buffer[idx] = Some(color);
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    match color {
                        Some(Rgb { r, g, b }) => writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?,
                        None => writer.queue(ResetColor)?,
                    };
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a brightness in [0, 1] onto the luminosity ramp, never blank
fn shade_glyph(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(1, last)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx3d_core::{recompute, Camera, Model, TransformState};

    fn point(x: f32, y: f32) -> ScreenPoint {
        ScreenPoint { x, y, depth: 0.0 }
    }

    #[test]
    fn test_later_polygons_overwrite_earlier() {
        let mut renderer = AsciiRenderer::new(10, 10);
        let square = |x0: f32, x1: f32| vec![point(x0, 0.0), point(x1, 0.0), point(x1, 10.0), point(x0, 10.0)];
        let (red, blue) = (Rgb::new(255, 0, 0), Rgb::new(0, 0, 255));

        renderer.fill_polygon(&square(0.0, 8.0), '#', red);
        renderer.fill_polygon(&square(4.0, 10.0), '+', blue);

        assert_eq!(renderer.glyph(1, 5), Some('#'));
        assert_eq!(renderer.color(1, 5), Some(red));
        assert_eq!(renderer.glyph(6, 5), Some('+'));
        assert_eq!(renderer.color(6, 5), Some(blue));
    }

    #[test]
    fn test_fill_accepts_both_windings() {
        let mut renderer = AsciiRenderer::new(8, 8);
        let clockwise = [point(0.0, 0.0), point(8.0, 0.0), point(0.0, 8.0)];
        renderer.fill_polygon(&clockwise, '@', Rgb::default());
        assert_eq!(renderer.glyph(1, 1), Some('@'));

        renderer.clear();
        let counter = [point(0.0, 0.0), point(0.0, 8.0), point(8.0, 0.0)];
        renderer.fill_polygon(&counter, '@', Rgb::default());
        assert_eq!(renderer.glyph(1, 1), Some('@'));
        assert_eq!(renderer.glyph(7, 7), Some(' '));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut renderer = AsciiRenderer::new(4, 4);
        let bad = [point(f32::INFINITY, 0.0), point(1.0, 1.0), point(0.0, 3.0)];
        renderer.fill_polygon(&bad, '#', Rgb::default());
        renderer.draw_line(&point(0.0, 0.0), &point(f32::NAN, 2.0), '-', Rgb::default());
        assert!((0..4).all(|y| (0..4).all(|x| renderer.glyph(x, y) == Some(' '))));
    }

    #[test]
    fn test_shade_glyph_range() {
        assert_eq!(shade_glyph(0.0), '.');
        assert_eq!(shade_glyph(1.0), '@');
        assert_eq!(shade_glyph(0.5), '+');
    }

    #[test]
    fn test_render_frame_paints_model() {
        let camera = Camera::new(60, 30).with_aspect(2.0);
        let frame = recompute(&Model::cube(), &TransformState::new(), &camera);
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.render_frame(&frame);

        let painted = (0..30)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.glyph(x, y) != Some(' '))
            .count();
        assert!(painted > 100);

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
