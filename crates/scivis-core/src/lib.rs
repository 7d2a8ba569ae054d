//! Core types for mini-scivis.
//!
//! This crate provides the building blocks shared by the loaders and the
//! isosurface extractor:
//! - [`VoxelType`] and [`VoxelData`], the single typed voxel buffer
//! - [`ValueRange`] and the parallel min/max reducer
//! - [`Bounds`] for world-space extents
//! - [`VolumeConfig`], the dataset JSON, and [`SceneOptions`]
//! - [`marching_cubes`], the built-in contouring kernel

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod fs;
pub mod marching_cubes;
pub mod options;
pub mod value_range;
pub mod voxel;

pub use bounds::Bounds;
pub use config::{DiscoveredMetadata, Endianness, VolumeConfig};
pub use error::{Result, ScivisError};
pub use marching_cubes::{marching_cubes, Contour};
pub use options::{CameraParams, ExtractionMode, LightParams, SceneOptions};
pub use value_range::{compute_value_range, compute_value_range_chunked, ValueRange};
pub use voxel::{Voxel, VoxelData, VoxelType};

// Re-export glam types for convenience
pub use glam::{UVec3, Vec2, Vec3};
