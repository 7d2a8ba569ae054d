//! Picking a loader from the dataset path.

use mini_scivis_core::fs::file_extension;
use mini_scivis_core::{Result, VolumeConfig};
use mini_scivis_structures::{
    load_indexed_volume, load_structured_volume, load_tetrahedral_mesh, IdxBackend, VolumeBrick,
};

/// How a dataset path is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// A `.json` config describing a raw binary grid.
    Structured,
    /// A `.off` tetrahedral mesh.
    Tetrahedral,
    /// Anything else, handed to the IDX backend.
    Indexed,
}

impl DatasetKind {
    /// Classifies `path` by its extension.
    pub fn from_path(path: &str) -> Self {
        match file_extension(path) {
            "json" => DatasetKind::Structured,
            "off" => DatasetKind::Tetrahedral,
            _ => DatasetKind::Indexed,
        }
    }
}

/// A loaded brick and the config describing it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub kind: DatasetKind,
    /// For indexed datasets this holds the discovered dims, spacing and type.
    pub config: VolumeConfig,
    pub brick: VolumeBrick,
}

/// Loads the dataset at `path`.
///
/// Indexed datasets need `idx_backend`; without one the load fails with
/// [`mini_scivis_core::ScivisError::Unavailable`].
pub fn load_dataset(path: &str, idx_backend: Option<&dyn IdxBackend>) -> Result<LoadedDataset> {
    let kind = DatasetKind::from_path(path);
    let (config, brick) = match kind {
        DatasetKind::Structured => {
            let config = VolumeConfig::from_file(path)?;
            let brick = load_structured_volume(&config)?;
            (config, brick)
        }
        DatasetKind::Tetrahedral => {
            let config = VolumeConfig {
                volume: Some(path.to_string()),
                ..VolumeConfig::default()
            };
            (config, load_tetrahedral_mesh(path)?)
        }
        DatasetKind::Indexed => {
            let (brick, meta) = load_indexed_volume(path, idx_backend)?;
            let mut config = VolumeConfig {
                url: Some(path.to_string()),
                ..VolumeConfig::default()
            };
            config.merge_discovered(&meta);
            (config, brick)
        }
    };

    match config.to_json_pretty() {
        Ok(json) => log::info!("dataset config:\n{json}"),
        Err(e) => log::warn!("could not serialize dataset config for logging: {e}"),
    }
    Ok(LoadedDataset {
        kind,
        config,
        brick,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mini_scivis_core::ScivisError;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(DatasetKind::from_path("data/skull.json"), DatasetKind::Structured);
        assert_eq!(DatasetKind::from_path("mesh.off"), DatasetKind::Tetrahedral);
        assert_eq!(DatasetKind::from_path("http://host/mod_visus?dataset=foo"), DatasetKind::Indexed);
        assert_eq!(DatasetKind::from_path("dataset.idx"), DatasetKind::Indexed);
    }

    #[test]
    fn test_indexed_without_backend() {
        assert!(matches!(
            load_dataset("dataset.idx", None),
            Err(ScivisError::Unavailable(_))
        ));
    }
}
