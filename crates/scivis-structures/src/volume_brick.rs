//! The loaded scalar field and the engine-facing volume it is rendered through.

use std::sync::Arc;

use glam::{UVec3, Vec3};
use mini_scivis_core::{Bounds, Result, ScivisError, ValueRange, VoxelData, VoxelType};

/// Cell type tag for unstructured volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// Tetrahedron (4 vertices)
    Tetrahedron,
}

/// Where the scalar values of a volume live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarBinding {
    /// One value per grid sample.
    PerSample,
    /// One value per mesh vertex.
    PerVertex,
}

/// Parameters of a regular grid volume as the engine consumes them.
///
/// `data` is a clone of the brick's buffer: it keeps the voxels alive while
/// the engine holds on to them but never owns them exclusively.
#[derive(Debug, Clone)]
pub struct StructuredVolume {
    dimensions: UVec3,
    grid_spacing: Vec3,
    data: VoxelData,
}

impl StructuredVolume {
    /// Samples per axis.
    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    /// Distance between adjacent samples.
    pub fn grid_spacing(&self) -> Vec3 {
        self.grid_spacing
    }

    /// Element type of the samples.
    pub fn voxel_type(&self) -> VoxelType {
        self.data.voxel_type()
    }

    /// The shared sample buffer.
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    /// Samples as raw bytes, X fastest.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

/// A tetrahedral volume with per-vertex scalars, in the engine's layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnstructuredVolume {
    /// Vertex positions.
    pub vertex_positions: Vec<Vec3>,
    /// Scalar value per vertex, index-aligned with `vertex_positions`.
    pub vertex_scalars: Vec<f32>,
    /// Vertex indices, 4 per tetrahedron.
    pub index: Vec<u32>,
    /// Offset of each cell's first index in `index`.
    pub cell_index: Vec<u64>,
    /// Type of each cell.
    pub cell_type: Vec<CellType>,
}

impl UnstructuredVolume {
    /// Returns the number of cells.
    pub fn num_cells(&self) -> usize {
        self.cell_index.len()
    }

    /// Returns the vertex indices of cell `i`.
    pub fn cell(&self, i: usize) -> Option<[u32; 4]> {
        let start = usize::try_from(*self.cell_index.get(i)?).ok()?;
        let slice = self.index.get(start..start + 4)?;
        Some([slice[0], slice[1], slice[2], slice[3]])
    }
}

/// Engine-side handle of a loaded volume.
///
/// Built from the brick when the brick is created, so its parameters always
/// match the brick's dims, spacing, voxel type and data. Cloning is cheap.
#[derive(Debug, Clone)]
pub enum EngineVolume {
    StructuredRegular(StructuredVolume),
    Unstructured(Arc<UnstructuredVolume>),
}

impl EngineVolume {
    /// The engine's name for this volume kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            EngineVolume::StructuredRegular(_) => "structuredRegular",
            EngineVolume::Unstructured(_) => "unstructured",
        }
    }

    /// Which scalar binding the volume uses.
    pub fn scalar_binding(&self) -> ScalarBinding {
        match self {
            EngineVolume::StructuredRegular(_) => ScalarBinding::PerSample,
            EngineVolume::Unstructured(_) => ScalarBinding::PerVertex,
        }
    }
}

/// A loaded scalar field.
///
/// Geometry and voxels are fixed at construction; only the value range can
/// change afterwards. Load a new brick to change anything else.
#[derive(Debug, Clone)]
pub struct VolumeBrick {
    volume: EngineVolume,
    bounds: Bounds,
    dims: UVec3,
    spacing: Vec3,
    voxel_data: Option<VoxelData>,
    value_range: Option<ValueRange>,
}

impl VolumeBrick {
    /// Creates a regular grid brick anchored at the origin.
    ///
    /// Returns [`ScivisError::SizeMismatch`] if `data` does not hold exactly
    /// `dims.x * dims.y * dims.z` voxels.
    pub fn structured(dims: UVec3, spacing: Vec3, data: VoxelData) -> Result<Self> {
        let expected = num_samples(dims)?;
        if data.len() != expected {
            return Err(ScivisError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let volume = EngineVolume::StructuredRegular(StructuredVolume {
            dimensions: dims,
            grid_spacing: spacing,
            data: data.clone(),
        });
        Ok(Self {
            volume,
            bounds: Bounds::from_dims_spacing(dims, spacing),
            dims,
            spacing,
            voxel_data: Some(data),
            value_range: None,
        })
    }

    /// Creates a brick from a tetrahedral volume.
    ///
    /// `dims` is zero (the topology is implicit in the cells) and spacing is
    /// unit spacing.
    pub fn unstructured(volume: UnstructuredVolume, bounds: Bounds, value_range: ValueRange) -> Self {
        Self {
            volume: EngineVolume::Unstructured(Arc::new(volume)),
            bounds,
            dims: UVec3::ZERO,
            spacing: Vec3::ONE,
            voxel_data: None,
            value_range: Some(value_range),
        }
    }

    /// The engine-side volume.
    pub fn volume(&self) -> &EngineVolume {
        &self.volume
    }

    /// World-space extent.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Samples per axis; zero for unstructured bricks.
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Distance between adjacent samples.
    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    /// The voxel buffer of a structured brick.
    pub fn voxel_data(&self) -> Option<&VoxelData> {
        self.voxel_data.as_ref()
    }

    /// The voxel type of a structured brick.
    pub fn voxel_type(&self) -> Option<VoxelType> {
        self.voxel_data.as_ref().map(VoxelData::voxel_type)
    }

    /// Returns true for regular grid bricks.
    pub fn is_structured(&self) -> bool {
        matches!(self.volume, EngineVolume::StructuredRegular(_))
    }

    /// The stored value range, if known.
    pub fn value_range(&self) -> Option<ValueRange> {
        self.value_range
    }

    /// Overrides the value range.
    pub fn set_value_range(&mut self, range: ValueRange) -> &mut Self {
        self.value_range = Some(range);
        self
    }

    /// Returns the stored value range, computing and storing it first if needed.
    pub fn value_range_or_compute(&mut self) -> ValueRange {
        if let Some(range) = self.value_range {
            return range;
        }
        let range = match (&self.voxel_data, &self.volume) {
            (Some(data), _) => data.value_range(),
            (None, EngineVolume::Unstructured(mesh)) => {
                let mut range = ValueRange::EMPTY;
                for &v in &mesh.vertex_scalars {
                    range.include(f64::from(v));
                }
                range
            }
            (None, EngineVolume::StructuredRegular(grid)) => grid.data().value_range(),
        };
        log::info!("computed value range [{}, {}]", range.min, range.max);
        self.value_range = Some(range);
        range
    }
}

/// Returns `dims.x * dims.y * dims.z` as a `usize`.
pub(crate) fn num_samples(dims: UVec3) -> Result<usize> {
    u64::from(dims.x)
        .checked_mul(u64::from(dims.y))
        .and_then(|n| n.checked_mul(u64::from(dims.z)))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ScivisError::format(format!("volume of {dims} samples is too large")))
}
