//! Isosurface extraction.
//!
//! Two strategies share one interface, picked by [`ExtractionMode`]:
//! - implicit: the isovalues travel to the engine together with the volume
//!   and the engine intersects them while rendering
//! - explicit: a [`ContourBackend`] contours the grid once per isovalue and
//!   the result is repackaged into a triangle soup
//!
//! ```ignore
//! let extractor = IsosurfaceExtractor::marching_cubes();
//! let extraction = extractor.extract(&brick, &[0.25, 0.75])?;
//! for v in &extraction.empty_isovalues {
//!     println!("nothing at {v}");
//! }
//! ```

mod backend;

pub use backend::{ContourBackend, ContourInput, MarchingCubesBackend};

use glam::Vec3;
use mini_scivis_core::{Contour, ExtractionMode, Result, ScivisError};

use crate::volume_brick::{EngineVolume, VolumeBrick};

/// Isovalues the engine evaluates on the fly against a volume.
#[derive(Debug, Clone)]
pub struct ImplicitIsosurface {
    pub isovalues: Vec<f32>,
    /// Keeps the source volume alive for the engine.
    pub volume: EngineVolume,
}

/// A triangle soup for one isovalue.
///
/// Every triangle owns three vertices of its own; none are shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsoSurfaceMesh {
    pub isovalue: f32,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl IsoSurfaceMesh {
    /// Returns the number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if there are no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Repackages a contour, dropping triangles whose area is exactly zero.
    ///
    /// Fails with [`ScivisError::Format`] if a triangle indexes past the
    /// contour's points.
    #[allow(clippy::float_cmp)]
    pub fn from_contour(isovalue: f32, contour: &Contour) -> Result<Self> {
        let mut mesh = Self {
            isovalue,
            vertices: Vec::with_capacity(contour.triangles.len() * 3),
            indices: Vec::with_capacity(contour.triangles.len()),
        };
        for tri in &contour.triangles {
            let mut corners = [Vec3::ZERO; 3];
            for (corner, &i) in corners.iter_mut().zip(tri) {
                *corner = *contour.points.get(i as usize).ok_or_else(|| {
                    ScivisError::format(format!(
                        "contour triangle {tri:?} indexes past {} points",
                        contour.points.len()
                    ))
                })?;
            }
            if triangle_area(corners) == 0.0 {
                continue;
            }
            let base = u32::try_from(mesh.vertices.len())
                .map_err(|_| ScivisError::format("isosurface has too many vertices"))?;
            mesh.vertices.extend_from_slice(&corners);
            mesh.indices.push([base, base + 1, base + 2]);
        }
        Ok(mesh)
    }
}

/// Area of a triangle, in double precision.
fn triangle_area([a, b, c]: [Vec3; 3]) -> f64 {
    let (a, b, c) = (a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
    0.5 * (b - a).cross(c - a).length()
}

/// One piece of isosurface geometry handed to the scene.
#[derive(Debug, Clone)]
pub enum IsoGeometry {
    Implicit(ImplicitIsosurface),
    Mesh(IsoSurfaceMesh),
}

/// Result of an extraction request.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub geometries: Vec<IsoGeometry>,
    /// Isovalues that produced no triangles; reported, not an error.
    pub empty_isovalues: Vec<f32>,
}

impl Extraction {
    /// Iterates over the explicit meshes.
    pub fn meshes(&self) -> impl Iterator<Item = &IsoSurfaceMesh> {
        self.geometries.iter().filter_map(|g| match g {
            IsoGeometry::Mesh(mesh) => Some(mesh),
            IsoGeometry::Implicit(_) => None,
        })
    }
}

/// Turns isovalues into isosurface geometry.
pub struct IsosurfaceExtractor {
    mode: ExtractionMode,
    backend: Option<Box<dyn ContourBackend>>,
}

impl IsosurfaceExtractor {
    /// Creates an extractor with no contouring backend.
    ///
    /// Explicit extraction needs one; see [`IsosurfaceExtractor::with_backend`].
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            backend: None,
        }
    }

    /// Explicit extraction with the built-in marching cubes kernel.
    pub fn marching_cubes() -> Self {
        Self::new(ExtractionMode::Explicit).with_backend(Box::new(MarchingCubesBackend))
    }

    /// Sets the contouring backend used in explicit mode.
    pub fn with_backend(mut self, backend: Box<dyn ContourBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The extraction strategy.
    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Extracts isosurfaces of `brick` at `isovalues`.
    ///
    /// In explicit mode the result may hold fewer meshes than isovalues;
    /// the missing ones are listed in [`Extraction::empty_isovalues`].
    pub fn extract(&self, brick: &VolumeBrick, isovalues: &[f32]) -> Result<Extraction> {
        if isovalues.is_empty() {
            return Ok(Extraction::default());
        }
        match self.mode {
            ExtractionMode::Implicit => Ok(Self::extract_implicit(brick, isovalues)),
            ExtractionMode::Explicit => self.extract_explicit(brick, isovalues),
        }
    }

    fn extract_implicit(brick: &VolumeBrick, isovalues: &[f32]) -> Extraction {
        log::info!("implicit isosurfaces at {isovalues:?}");
        Extraction {
            geometries: vec![IsoGeometry::Implicit(ImplicitIsosurface {
                isovalues: isovalues.to_vec(),
                volume: brick.volume().clone(),
            })],
            empty_isovalues: Vec::new(),
        }
    }

    fn extract_explicit(&self, brick: &VolumeBrick, isovalues: &[f32]) -> Result<Extraction> {
        let scalars = brick.voxel_data().ok_or_else(|| {
            ScivisError::format(format!(
                "explicit isosurfaces need a structured volume, got {}",
                brick.volume().type_name()
            ))
        })?;
        let backend = self.backend.as_deref().ok_or_else(|| {
            ScivisError::Unavailable("explicit isosurface extraction has no contouring backend".into())
        })?;

        let input = ContourInput {
            dims: brick.dims(),
            spacing: brick.spacing(),
            origin: brick.bounds().lower,
            scalars,
        };

        let mut extraction = Extraction::default();
        for &isovalue in isovalues {
            let contour = backend.contour(&input, isovalue)?;
            let mesh = IsoSurfaceMesh::from_contour(isovalue, &contour)?;
            if mesh.is_empty() {
                log::warn!("Isosurface at {isovalue} is empty");
                extraction.empty_isovalues.push(isovalue);
            } else {
                log::info!(
                    "isosurface at {isovalue}: {} triangles via {}",
                    mesh.num_triangles(),
                    backend.name()
                );
                extraction.geometries.push(IsoGeometry::Mesh(mesh));
            }
        }
        Ok(extraction)
    }
}

/// Extracts isosurfaces with the built-in backend for `mode`.
pub fn extract_isosurfaces(
    brick: &VolumeBrick,
    isovalues: &[f32],
    mode: ExtractionMode,
) -> Result<Extraction> {
    let extractor = match mode {
        ExtractionMode::Implicit => IsosurfaceExtractor::new(mode),
        ExtractionMode::Explicit => IsosurfaceExtractor::marching_cubes(),
    };
    extractor.extract(brick, isovalues)
}

impl Default for IsosurfaceExtractor {
    fn default() -> Self {
        Self::new(ExtractionMode::default())
    }
}

impl std::fmt::Debug for IsosurfaceExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsosurfaceExtractor")
            .field("mode", &self.mode)
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}
