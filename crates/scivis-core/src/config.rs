//! Dataset configuration as read from the volume JSON file.
//!
//! The JSON follows the Open SciVis Datasets metadata layout:
//!
//! ```json
//! {
//!     "name": "Skull",
//!     "url": "http://.../skull_256x256x256_uint8.raw",
//!     "type": "uint8",
//!     "size": [256, 256, 256],
//!     "spacing": [1, 1, 1],
//!     "endianness": "little"
//! }
//! ```
//!
//! Keys this crate does not interpret are preserved in [`VolumeConfig::extra`]
//! and written back out unchanged.

use std::path::Path;

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScivisError};
use crate::fs::{file_basename, file_basepath, file_content};
use crate::voxel::VoxelType;

/// Byte order of a raw volume file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the host.
    #[must_use]
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// Typed view of a volume config JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Path of the raw voxel file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    /// Where the raw file was downloaded from; its basename names the local file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Voxel type string, checked by [`VolumeConfig::voxel_type`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub voxel_type: Option<String>,

    /// Samples per axis (`"size"` in the dataset metadata).
    #[serde(rename = "dims", alias = "size", default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<[u32; 3]>,

    /// Physical distance between adjacent samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<[f32; 3]>,

    /// Byte order of the raw file; native when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endianness: Option<Endianness>,

    /// Every other key of the JSON object.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Volume parameters learned from a dataset that did not come with a config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveredMetadata {
    pub dims: UVec3,
    pub spacing: Vec3,
    pub voxel_type: VoxelType,
}

impl VolumeConfig {
    /// Parses a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file and resolves the raw volume path.
    ///
    /// When the config has a `url`, `volume` becomes the url's basename next
    /// to the JSON file (or in `.` if the path has no directory part).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json_str(&file_content(path)?)?;

        let path_str = path.to_string_lossy();
        let mut base_path = file_basepath(&path_str);
        if base_path == path_str {
            base_path = ".";
        }
        if let Some(url) = &config.url {
            config.volume = Some(format!("{base_path}/{}", file_basename(url)));
        }
        Ok(config)
    }

    /// Returns the raw volume path.
    pub fn volume_path(&self) -> Result<&str> {
        self.volume
            .as_deref()
            .ok_or_else(|| ScivisError::format("config has no 'volume' or 'url'"))
    }

    /// Parses the voxel type.
    pub fn voxel_type(&self) -> Result<VoxelType> {
        self.voxel_type
            .as_deref()
            .ok_or_else(|| ScivisError::format("config has no 'type'"))?
            .parse()
    }

    /// Returns the grid dimensions.
    pub fn dims(&self) -> Result<UVec3> {
        self.dims
            .map(UVec3::from_array)
            .ok_or_else(|| ScivisError::format("config has no 'dims' or 'size'"))
    }

    /// Returns the grid spacing, unit spacing when absent.
    #[must_use]
    pub fn spacing(&self) -> Vec3 {
        self.spacing.map_or(Vec3::ONE, Vec3::from_array)
    }

    /// Returns the declared byte order, native when absent.
    #[must_use]
    pub fn endianness(&self) -> Endianness {
        self.endianness.unwrap_or_else(Endianness::native)
    }

    /// Writes discovered volume parameters into this config.
    pub fn merge_discovered(&mut self, meta: &DiscoveredMetadata) {
        self.dims = Some(meta.dims.to_array());
        self.spacing = Some(meta.spacing.to_array());
        self.voxel_type = Some(meta.voxel_type.to_string());
    }

    /// Serializes the config as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKULL: &str = r#"{
        "name": "Skull",
        "url": "http://example.org/cdn/skull/skull_256x256x256_uint8.raw",
        "type": "uint8",
        "size": [256, 256, 256],
        "spacing": [1, 1, 1],
        "endianness": "little"
    }"#;

    #[test]
    fn test_parse_dataset_metadata() {
        let config = VolumeConfig::from_json_str(SKULL).unwrap();
        assert_eq!(config.voxel_type().unwrap(), VoxelType::Uint8);
        assert_eq!(config.dims().unwrap(), UVec3::splat(256));
        assert_eq!(config.spacing(), Vec3::ONE);
        assert_eq!(config.endianness(), Endianness::Little);
        assert_eq!(config.extra["name"], "Skull");
    }

    #[test]
    fn test_dims_key_accepted() {
        let config =
            VolumeConfig::from_json_str(r#"{"type": "float32", "dims": [2, 3, 4]}"#).unwrap();
        assert_eq!(config.dims().unwrap(), UVec3::new(2, 3, 4));
        assert_eq!(config.spacing(), Vec3::ONE);
        assert_eq!(config.endianness(), Endianness::native());
    }

    #[test]
    fn test_missing_fields() {
        let config = VolumeConfig::from_json_str("{}").unwrap();
        assert!(matches!(config.voxel_type(), Err(ScivisError::Format(_))));
        assert!(matches!(config.dims(), Err(ScivisError::Format(_))));
        assert!(matches!(config.volume_path(), Err(ScivisError::Format(_))));
    }

    #[test]
    fn test_bad_type_string() {
        let config = VolumeConfig::from_json_str(r#"{"type": "int32"}"#).unwrap();
        assert!(matches!(config.voxel_type(), Err(ScivisError::Format(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            VolumeConfig::from_json_str("{\"type\": "),
            Err(ScivisError::Json(_))
        ));
    }

    #[test]
    fn test_merge_discovered_writes_dims_and_type() {
        let mut config = VolumeConfig::default();
        config.merge_discovered(&DiscoveredMetadata {
            dims: UVec3::new(4, 5, 6),
            spacing: Vec3::ONE,
            voxel_type: VoxelType::Uint16,
        });
        let json: serde_json::Value = serde_json::from_str(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["dims"], serde_json::json!([4, 5, 6]));
        assert_eq!(json["type"], "uint16");
        assert_eq!(json["spacing"], serde_json::json!([1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_from_file_resolves_volume_next_to_config() {
        let dir = std::env::temp_dir().join(format!("mini_scivis_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("skull.json");
        std::fs::write(&path, SKULL).unwrap();

        let config = VolumeConfig::from_file(&path).unwrap();
        let expected = format!("{}/skull_256x256x256_uint8.raw", dir.to_string_lossy());
        assert_eq!(config.volume_path().unwrap(), expected);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
