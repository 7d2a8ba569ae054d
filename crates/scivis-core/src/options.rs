//! Configuration options for loading and scene assembly.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// How isosurfaces are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Hand the isovalues to the engine, which intersects them while rendering.
    #[default]
    Implicit,
    /// Contour the volume into triangle meshes up front.
    Explicit,
}

/// Intensity and direction of a light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightParams {
    pub intensity: f32,
    pub direction: Vec3,
}

impl LightParams {
    /// Creates a light with the given intensity and direction.
    #[must_use]
    pub fn new(intensity: f32, direction: Vec3) -> Self {
        Self {
            intensity,
            direction,
        }
    }
}

/// Camera position, orbit center and up vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
}

/// Scene and rendering parameters handed to the volume renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Value range for the transfer function; computed from the data when `None`.
    pub value_range: Option<Vec2>,

    /// Isovalues to render as surfaces.
    pub isovalues: Vec<f32>,

    /// Isosurface strategy.
    pub extraction_mode: ExtractionMode,

    /// Renderer type requested from the engine (`"scivis"` or `"pathtracer"`).
    pub renderer: String,

    /// Camera; fitted to the volume bounds when `None`.
    pub camera: Option<CameraParams>,

    /// Background color.
    pub background_color: Vec3,

    /// Isosurface diffuse color.
    pub isosurface_color: Vec3,

    /// Ambient light intensity.
    pub ambient_intensity: f32,

    /// The two directional lights.
    pub directional_lights: [LightParams; 2],

    /// Volume density scaling.
    pub density_scale: f32,

    /// Volume sampling rate.
    pub sampling_rate: f32,

    /// Number of frames to accumulate before writing the image; interactive when `None`.
    pub frame_count: Option<u32>,

    /// Output image file name.
    pub output_image: String,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            value_range: None,
            isovalues: Vec::new(),
            extraction_mode: ExtractionMode::Implicit,
            renderer: "scivis".to_string(),
            camera: None,
            background_color: Vec3::ONE,
            isosurface_color: Vec3::splat(0.9),
            ambient_intensity: 0.3,
            directional_lights: [
                LightParams::new(1.0, Vec3::new(0.5, -1.0, 0.25)),
                LightParams::new(1.0, Vec3::new(-0.5, -0.5, 0.5)),
            ],
            density_scale: 1.0,
            sampling_rate: 1.0,
            frame_count: None,
            output_image: "mini_scivis.jpg".to_string(),
        }
    }
}
