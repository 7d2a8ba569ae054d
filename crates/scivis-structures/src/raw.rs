//! Dense regular-grid volumes stored as headerless binary files.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use mini_scivis_core::{Endianness, Result, ScivisError, VolumeConfig, VoxelData};

use crate::volume_brick::{num_samples, VolumeBrick};

/// Loads the raw volume described by `config`.
///
/// The voxel type is checked before the file is touched, so an unknown
/// `type` string is always a [`ScivisError::Format`]. The file must hold at
/// least `dims.x * dims.y * dims.z * width` bytes, X fastest; a shorter file
/// is an [`ScivisError::Io`] naming the path.
pub fn load_structured_volume(config: &VolumeConfig) -> Result<VolumeBrick> {
    let voxel_type = config.voxel_type()?;
    let dims = config.dims()?;
    let spacing = config.spacing();
    let path = Path::new(config.volume_path()?);

    let count = num_samples(dims)?;
    let required = count
        .checked_mul(voxel_type.size_bytes())
        .ok_or_else(|| ScivisError::format(format!("volume of {dims} {voxel_type} voxels is too large")))?;

    let mut file = File::open(path).map_err(|e| ScivisError::io(path, e))?;
    let file_len = file.metadata().map(|m| m.len()).ok();
    let short_read = |found: String| {
        ScivisError::io(
            path,
            std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("need {required} bytes for {dims} {voxel_type} voxels, file has {found}"),
            ),
        )
    };

    // Reject short files before allocating the voxel buffer
    if let Some(len) = file_len {
        if len < required as u64 {
            return Err(short_read(len.to_string()));
        }
    }

    let mut data = VoxelData::read_from(voxel_type, count, &mut file).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            short_read(file_len.map_or_else(|| "fewer".to_string(), |n| n.to_string()))
        } else {
            ScivisError::io(path, e)
        }
    })?;

    if let Some(len) = file_len {
        if len > required as u64 {
            log::warn!(
                "'{}' has {} bytes past the {required} needed, ignoring them",
                path.display(),
                len - required as u64
            );
        }
    }

    let endianness = config.endianness();
    if endianness != Endianness::native() && voxel_type.size_bytes() > 1 {
        log::debug!("swapping {endianness:?}-endian voxels to native order");
        data = data.swap_bytes();
    }

    log::info!(
        "loaded '{}': {dims} {voxel_type} voxels, {required} bytes",
        path.display()
    );
    VolumeBrick::structured(dims, spacing, data)
}
