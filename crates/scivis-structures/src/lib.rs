//! Volume loading and isosurface extraction for mini-scivis.
//!
//! This crate provides:
//! - [`VolumeBrick`], the loaded scalar field, and its engine-side [`EngineVolume`]
//! - Raw binary grid loading ([`load_structured_volume`])
//! - Indexed dataset loading through a pluggable backend ([`load_indexed_volume`])
//! - Tetrahedral mesh loading with winding repair ([`load_tetrahedral_mesh`])
//! - Implicit and explicit isosurfaces ([`IsosurfaceExtractor`])

// Indices and grid coordinates are cast between integer widths and floats
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod idx;
pub mod isosurface;
pub mod raw;
pub mod tet_mesh;
pub mod volume_brick;

pub use idx::{load_indexed_volume, IdxBackend, IdxDataset, IdxDtype, IdxQueryResult, LogicBox};
pub use isosurface::{
    extract_isosurfaces, ContourBackend, ContourInput, Extraction, ImplicitIsosurface,
    IsoGeometry, IsoSurfaceMesh, IsosurfaceExtractor, MarchingCubesBackend,
};
pub use raw::load_structured_volume;
pub use tet_mesh::{
    load_tetrahedral_mesh, parse_tetrahedral_mesh, repair_tet_winding, signed_volume, TetMesh,
};
pub use volume_brick::{
    CellType, EngineVolume, ScalarBinding, StructuredVolume, UnstructuredVolume, VolumeBrick,
};
