//! mini-scivis: load volumetric datasets and prepare them for a volume renderer.
//!
//! A dataset is a raw binary grid described by a JSON config, a tetrahedral
//! mesh in a `.off` text file, or an indexed (IDX) dataset reached through a
//! caller-supplied backend. Loading produces a [`VolumeBrick`]; preparing a
//! scene computes its value range, extracts isosurfaces and fills in camera
//! and lights. Rendering the [`Scene`] is up to the engine consuming it.
//!
//! # Quick Start
//!
//! ```no_run
//! use mini_scivis::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut dataset = load_dataset("skull.json", None)?;
//!     let options = SceneOptions {
//!         isovalues: vec![80.0],
//!         extraction_mode: ExtractionMode::Explicit,
//!         ..SceneOptions::default()
//!     };
//!     let scene = prepare_scene(&mut dataset, &options)?;
//!     println!("value range {:?}", scene.value_range);
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod dataset;
mod scene;

use std::path::Path;

pub use dataset::{load_dataset, DatasetKind, LoadedDataset};
pub use scene::{default_camera, prepare_scene, Light, Scene, CAMERA_FOVY};

// Re-export core types
pub use mini_scivis_core::{
    compute_value_range, fs, marching_cubes, Bounds, CameraParams, Contour, DiscoveredMetadata,
    Endianness, ExtractionMode, LightParams, Result, SceneOptions, ScivisError, ValueRange,
    VolumeConfig, Voxel, VoxelData, VoxelType, UVec3, Vec2, Vec3,
};

// Re-export structures
pub use mini_scivis_structures::{
    extract_isosurfaces, load_indexed_volume, load_structured_volume, load_tetrahedral_mesh,
    parse_tetrahedral_mesh, repair_tet_winding, signed_volume, CellType, ContourBackend,
    ContourInput, EngineVolume, Extraction, IdxBackend, IdxDataset, IdxDtype, IdxQueryResult,
    ImplicitIsosurface, IsoGeometry, IsoSurfaceMesh, IsosurfaceExtractor, LogicBox,
    MarchingCubesBackend, ScalarBinding, StructuredVolume, TetMesh, UnstructuredVolume,
    VolumeBrick,
};

/// Initializes `env_logger`; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Reads scene options from a JSON file; missing keys keep their defaults.
pub fn load_scene_options(path: impl AsRef<Path>) -> Result<SceneOptions> {
    let text = fs::file_content(path)?;
    Ok(serde_json::from_str(&text)?)
}
