//! Out-of-core indexed (IDX) datasets.
//!
//! The dataset store itself lives outside this crate. Callers that can reach
//! one implement [`IdxBackend`] and pass it to [`load_indexed_volume`]; with
//! no backend the loader reports [`ScivisError::Unavailable`].

use std::ops::RangeInclusive;

use glam::{UVec3, Vec3};
use mini_scivis_core::{DiscoveredMetadata, Result, ScivisError, VoxelData, VoxelType};

use crate::volume_brick::{num_samples, VolumeBrick};

/// Integer box in the dataset's logical index space, `p2` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicBox {
    pub p1: [i64; 3],
    pub p2: [i64; 3],
}

/// Element type reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdxDtype {
    Uint8,
    Uint16,
    Float32,
    Float64,
    /// Anything else the backend can store; not loadable here.
    Other(String),
}

impl IdxDtype {
    /// Maps the dtype onto a voxel type.
    pub fn voxel_type(&self) -> Result<VoxelType> {
        match self {
            IdxDtype::Uint8 => Ok(VoxelType::Uint8),
            IdxDtype::Uint16 => Ok(VoxelType::Uint16),
            IdxDtype::Float32 => Ok(VoxelType::Float32),
            IdxDtype::Float64 => Ok(VoxelType::Float64),
            IdxDtype::Other(name) => Err(ScivisError::format(format!(
                "unsupported IDX dtype '{name}'"
            ))),
        }
    }
}

/// The samples returned by a box query, native byte order, X fastest.
#[derive(Debug, Clone)]
pub struct IdxQueryResult {
    pub dims: UVec3,
    pub dtype: IdxDtype,
    pub bytes: Vec<u8>,
}

/// An opened indexed dataset.
pub trait IdxDataset {
    /// The dataset's full logical extent.
    fn logic_box(&self) -> LogicBox;

    /// The finest resolution level.
    fn max_resolution(&self) -> u32;

    /// Reads `logic_box` at the given resolution levels.
    ///
    /// Backends report rejected or failed queries as [`ScivisError::Query`].
    fn execute_box_query(
        &self,
        logic_box: &LogicBox,
        resolution: RangeInclusive<u32>,
    ) -> Result<IdxQueryResult>;
}

/// Opens indexed datasets by URI.
pub trait IdxBackend {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Opens the dataset at `uri`.
    fn open(&self, uri: &str) -> Result<Box<dyn IdxDataset>>;
}

/// Loads the full-resolution box of the dataset at `uri`.
///
/// Returns the brick together with the dims, spacing and voxel type that
/// were discovered; callers merge them into their config with
/// [`mini_scivis_core::VolumeConfig::merge_discovered`]. Spacing is always
/// unit spacing.
pub fn load_indexed_volume(
    uri: &str,
    backend: Option<&dyn IdxBackend>,
) -> Result<(VolumeBrick, DiscoveredMetadata)> {
    let Some(backend) = backend else {
        return Err(ScivisError::Unavailable(format!(
            "'{uri}' is an IDX dataset but no IDX backend is available"
        )));
    };

    let dataset = backend.open(uri)?;
    let logic_box = dataset.logic_box();
    let max_resolution = dataset.max_resolution();
    log::debug!(
        "querying {uri} via {}: box {:?}..{:?}, resolution 0..={max_resolution}",
        backend.name(),
        logic_box.p1,
        logic_box.p2
    );

    let result = dataset.execute_box_query(&logic_box, 0..=max_resolution)?;
    let voxel_type = result.dtype.voxel_type()?;
    let expected = num_samples(result.dims)?
        .checked_mul(voxel_type.size_bytes())
        .ok_or_else(|| ScivisError::format(format!("IDX box of {} samples is too large", result.dims)))?;
    if result.bytes.len() != expected {
        return Err(ScivisError::SizeMismatch {
            expected,
            actual: result.bytes.len(),
        });
    }

    let data = VoxelData::from_bytes(voxel_type, &result.bytes)?;
    let meta = DiscoveredMetadata {
        dims: result.dims,
        spacing: Vec3::ONE,
        voxel_type,
    };
    log::info!("loaded IDX '{uri}': {} {voxel_type} voxels", meta.dims);

    let brick = VolumeBrick::structured(meta.dims, meta.spacing, data)?;
    Ok((brick, meta))
}
