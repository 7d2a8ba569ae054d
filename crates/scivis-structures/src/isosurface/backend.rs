//! Contouring backends for explicit isosurface extraction.

use glam::{UVec3, Vec3};
use mini_scivis_core::{marching_cubes, Contour, Result, VoxelData};

/// A structured scalar image handed to a contouring backend.
#[derive(Debug, Clone, Copy)]
pub struct ContourInput<'a> {
    pub dims: UVec3,
    pub spacing: Vec3,
    pub origin: Vec3,
    pub scalars: &'a VoxelData,
}

/// Extracts a single contour from a structured scalar image.
///
/// Implementations compute one contour value per call and no normals.
/// Returned points are in world space.
pub trait ContourBackend: Send + Sync {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Contours `input` at `isovalue`.
    fn contour(&self, input: &ContourInput<'_>, isovalue: f32) -> Result<Contour>;
}

/// The built-in marching cubes kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingCubesBackend;

impl ContourBackend for MarchingCubesBackend {
    fn name(&self) -> &str {
        "marching cubes"
    }

    fn contour(&self, input: &ContourInput<'_>, isovalue: f32) -> Result<Contour> {
        let isovalue = f64::from(isovalue);
        let mut contour = match input.scalars {
            VoxelData::Uint8(v) => marching_cubes(&v[..], isovalue, input.dims),
            VoxelData::Uint16(v) => marching_cubes(&v[..], isovalue, input.dims),
            VoxelData::Float32(v) => marching_cubes(&v[..], isovalue, input.dims),
            VoxelData::Float64(v) => marching_cubes(&v[..], isovalue, input.dims),
        }?;
        contour.transform(input.spacing, input.origin);
        Ok(contour)
    }
}
