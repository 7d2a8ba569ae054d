//! Scene parameters handed to the volume renderer.

use glam::Vec3;
use mini_scivis_core::{Bounds, CameraParams, Result, SceneOptions, ValueRange};
use mini_scivis_structures::{extract_isosurfaces, EngineVolume, IsoGeometry};

use crate::dataset::LoadedDataset;

/// Vertical field of view of the perspective camera, in degrees.
pub const CAMERA_FOVY: f32 = 40.0;

/// A light in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { intensity: f32 },
    Distant { intensity: f32, direction: Vec3 },
}

/// Everything the renderer needs to draw a loaded dataset.
#[derive(Debug, Clone)]
pub struct Scene {
    pub volume: EngineVolume,
    pub bounds: Bounds,
    /// Value range the transfer function maps onto.
    pub value_range: ValueRange,
    pub isosurfaces: Vec<IsoGeometry>,
    /// Requested isovalues that produced no surface.
    pub empty_isovalues: Vec<f32>,
    pub camera: CameraParams,
    /// Vertical field of view, degrees.
    pub fovy: f32,
    pub lights: Vec<Light>,
    pub renderer: String,
    pub background_color: Vec3,
    pub isosurface_color: Vec3,
    pub density_scale: f32,
    pub sampling_rate: f32,
}

/// Places the camera on the -Z side of the volume, 1.5 diagonals from its center.
///
/// Empty bounds (a mesh with no vertices) are treated as the unit cube.
pub fn default_camera(bounds: &Bounds) -> CameraParams {
    let bounds = if bounds.is_empty() {
        Bounds::new(Vec3::ZERO, Vec3::ONE)
    } else {
        *bounds
    };
    let center = bounds.center();
    CameraParams {
        eye: center - Vec3::new(0.0, 0.0, 1.5 * bounds.diagonal()),
        at: center,
        up: Vec3::Y,
    }
}

/// Assembles the scene for `dataset`.
///
/// A finite `options.value_range` is stored on the brick; otherwise the range
/// is computed from the data. Isosurfaces are extracted when isovalues are
/// requested, with marching cubes in explicit mode.
pub fn prepare_scene(dataset: &mut LoadedDataset, options: &SceneOptions) -> Result<Scene> {
    let brick = &mut dataset.brick;
    let value_range = match options.value_range.map(ValueRange::from) {
        Some(range) if range.is_finite() => {
            brick.set_value_range(range);
            range
        }
        _ => brick.value_range_or_compute(),
    };

    let extraction = extract_isosurfaces(brick, &options.isovalues, options.extraction_mode)?;

    let mut lights = vec![Light::Ambient {
        intensity: options.ambient_intensity,
    }];
    lights.extend(options.directional_lights.iter().map(|l| Light::Distant {
        intensity: l.intensity,
        direction: l.direction,
    }));

    let bounds = brick.bounds();
    Ok(Scene {
        volume: brick.volume().clone(),
        bounds,
        value_range,
        isosurfaces: extraction.geometries,
        empty_isovalues: extraction.empty_isovalues,
        camera: options.camera.unwrap_or_else(|| default_camera(&bounds)),
        fovy: CAMERA_FOVY,
        lights,
        renderer: options.renderer.clone(),
        background_color: options.background_color,
        isosurface_color: options.isosurface_color,
        density_scale: options.density_scale,
        sampling_rate: options.sampling_rate,
    })
}
