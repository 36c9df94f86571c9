/// Geometry store: the immutable vertex/face model the viewer transforms
use nalgebra::Vector3;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ModelError, ParseError, Result};
use crate::parse::parse_color;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A polygon face: three or more vertex indices and a base color.
///
/// Faces are assumed planar and convex. Shading uses the first three
/// vertices, depth averaging uses all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub indices: Vec<usize>,
    pub color: Rgb,
}

impl Face {
    pub fn new(indices: impl Into<Vec<usize>>, color: Rgb) -> Self {
        Self {
            indices: indices.into(),
            color,
        }
    }
}

/// A labelled mesh. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub label: String,
    pub vertices: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
}

#[derive(Deserialize)]
struct CompactModel {
    #[serde(default)]
    label: String,
    v: Vec<[f32; 3]>,
    f: Vec<CompactFace>,
}

#[derive(Deserialize)]
struct CompactFace {
    v: Vec<usize>,
    c: String,
}

impl Model {
    pub fn new(label: impl Into<String>, vertices: Vec<Vector3<f32>>, faces: Vec<Face>) -> Self {
        Self {
            label: label.into(),
            vertices,
            faces,
        }
    }

    /// Every undirected edge once, in the order faces first mention it
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &self.faces {
            let n = face.indices.len();
            for i in 0..n {
                let a = face.indices[i];
                let b = face.indices[(i + 1) % n];
                if seen.insert((a.min(b), a.max(b))) {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    /// Load the compact `{ label, v, f }` JSON produced by the offline converter.
    ///
    /// This is the one place indices are checked; the render pipeline trusts
    /// whatever model it is handed.
    pub fn from_compact_json(json: &str) -> Result<Self> {
        let compact: CompactModel = serde_json::from_str(json)?;
        let count = compact.v.len();

        let mut faces = Vec::with_capacity(compact.f.len());
        for (face, raw) in compact.f.into_iter().enumerate() {
            if raw.v.len() < 3 {
                tracing::warn!(face, vertices = raw.v.len(), "skipping face with fewer than three vertices");
                continue;
            }
            if let Some(&index) = raw.v.iter().find(|&&i| i >= count) {
                return Err(ModelError::VertexIndexOutOfRange { face, index, count });
            }
            let color = parse_color(&raw.c).map_err(|source| ModelError::InvalidColor { face, source })?;
            faces.push(Face::new(raw.v, color));
        }

        if faces.is_empty() {
            return Err(ModelError::Empty);
        }

        let vertices = compact
            .v
            .into_iter()
            .map(|[x, y, z]| Vector3::new(x, y, z))
            .collect();
        let model = Self::new(compact.label, vertices, faces);
        tracing::info!(
            label = %model.label,
            vertices = model.vertices.len(),
            faces = model.faces.len(),
            "loaded compact model"
        );
        Ok(model)
    }

    /// Read and parse a compact JSON model file
    pub fn from_compact_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_compact_json(&text)
    }

    /// Axis-aligned cube spanning [-1, 1] on every axis
    pub fn cube() -> Self {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-1.0, 1.0, 1.0),
        ];
        let faces = vec![
            Face::new([0, 3, 2, 1], Rgb::from_hex(0x3b82f6)),
            Face::new([4, 5, 6, 7], Rgb::from_hex(0x2563eb)),
            Face::new([0, 4, 7, 3], Rgb::from_hex(0x60a5fa)),
            Face::new([1, 2, 6, 5], Rgb::from_hex(0x1d4ed8)),
            Face::new([3, 7, 6, 2], Rgb::from_hex(0x93c5fd)),
            Face::new([0, 1, 5, 4], Rgb::from_hex(0x1e40af)),
        ];
        Self::new("Cube", vertices, faces)
    }

    /// Square-based pyramid with its apex on +Y
    pub fn pyramid() -> Self {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(0.0, 1.2, 0.0),
        ];
        let faces = vec![
            Face::new([0, 1, 2, 3], Rgb::from_hex(0x1e40af)),
            Face::new([0, 4, 1], Rgb::from_hex(0xf59e0b)),
            Face::new([1, 4, 2], Rgb::from_hex(0xd97706)),
            Face::new([2, 4, 3], Rgb::from_hex(0xf59e0b)),
            Face::new([3, 4, 0], Rgb::from_hex(0xd97706)),
        ];
        Self::new("Pyramid", vertices, faces)
    }

    /// Octahedron stretched along Y
    pub fn diamond() -> Self {
        let vertices = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.3, 0.0),
            Vector3::new(0.0, -1.3, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, -1.0),
        ];
        let (cyan, teal) = (Rgb::from_hex(0x06b6d4), Rgb::from_hex(0x0891b2));
        let (sky, ice) = (Rgb::from_hex(0x22d3ee), Rgb::from_hex(0x67e8f9));
        let faces = vec![
            Face::new([0, 2, 4], cyan),
            Face::new([0, 4, 3], teal),
            Face::new([0, 3, 5], cyan),
            Face::new([0, 5, 2], teal),
            Face::new([1, 4, 2], sky),
            Face::new([1, 3, 4], ice),
            Face::new([1, 5, 3], sky),
            Face::new([1, 2, 5], ice),
        ];
        Self::new("Diamond", vertices, faces)
    }

    /// Box with a gable roof; the pentagonal end walls are fan-triangulated
    pub fn house() -> Self {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, 0.0, -1.0),
            Vector3::new(-1.0, 0.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(-1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.8, -1.0),
            Vector3::new(0.0, 0.8, 1.0),
        ];
        let front = Rgb::from_hex(0xfbbf24);
        let back = Rgb::from_hex(0xf59e0b);
        let faces = vec![
            Face::new([0, 1, 2], front),
            Face::new([0, 2, 8], front),
            Face::new([0, 8, 3], front),
            Face::new([5, 4, 7], back),
            Face::new([5, 7, 9], back),
            Face::new([5, 9, 6], back),
            Face::new([4, 0, 3, 7], Rgb::from_hex(0xd97706)),
            Face::new([1, 5, 6, 2], Rgb::from_hex(0xb45309)),
            Face::new([4, 5, 1, 0], Rgb::from_hex(0x78350f)),
            Face::new([3, 8, 9, 7], Rgb::from_hex(0xef4444)),
            Face::new([8, 2, 6, 9], Rgb::from_hex(0xdc2626)),
        ];
        Self::new("House", vertices, faces)
    }

    /// Unit UV sphere. Cap rows emit one triangle per cell instead of two.
    pub fn sphere(lat_segs: usize, lon_segs: usize) -> Self {
        const BANDS: [Rgb; 4] = [
            Rgb::from_hex(0x3b82f6),
            Rgb::from_hex(0x60a5fa),
            Rgb::from_hex(0x2563eb),
            Rgb::from_hex(0x93c5fd),
        ];

        let mut vertices = Vec::with_capacity((lat_segs + 1) * (lon_segs + 1));
        for lat in 0..=lat_segs {
            let theta = lat as f32 / lat_segs as f32 * std::f32::consts::PI;
            let (sin_t, cos_t) = theta.sin_cos();
            for lon in 0..=lon_segs {
                let phi = lon as f32 / lon_segs as f32 * std::f32::consts::TAU;
                vertices.push(Vector3::new(sin_t * phi.cos(), cos_t, sin_t * phi.sin()));
            }
        }

        let mut faces = Vec::new();
        for lat in 0..lat_segs {
            for lon in 0..lon_segs {
                let a = lat * (lon_segs + 1) + lon;
                let b = a + lon_segs + 1;
                let color = BANDS[(lat + lon) % BANDS.len()];
                if lat > 0 {
                    faces.push(Face::new([a, b, b + 1], color));
                }
                if lat + 1 < lat_segs {
                    faces.push(Face::new([a, b + 1, a + 1], color));
                }
            }
        }

        Self::new("Sphere", vertices, faces)
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::cube()
    }
}

/// The models that ship with the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinModel {
    #[default]
    Cube,
    Pyramid,
    Diamond,
    House,
    Sphere,
}

impl BuiltinModel {
    pub const ALL: [BuiltinModel; 5] = [
        BuiltinModel::Cube,
        BuiltinModel::Pyramid,
        BuiltinModel::Diamond,
        BuiltinModel::House,
        BuiltinModel::Sphere,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuiltinModel::Cube => "Cube",
            BuiltinModel::Pyramid => "Pyramid",
            BuiltinModel::Diamond => "Diamond",
            BuiltinModel::House => "House",
            BuiltinModel::Sphere => "Sphere",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn build(self) -> Model {
        match self {
            BuiltinModel::Cube => Model::cube(),
            BuiltinModel::Pyramid => Model::pyramid(),
            BuiltinModel::Diamond => Model::diamond(),
            BuiltinModel::House => Model::house(),
            BuiltinModel::Sphere => Model::sphere(8, 12),
        }
    }
}

impl FromStr for BuiltinModel {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::UnknownModel(s.to_string()))
    }
}
