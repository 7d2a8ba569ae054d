//! Voxel types and the shared typed voxel buffer.
//!
//! [`VoxelData`] is the one place where the four supported voxel types are
//! dispatched. Loaders fill it, the value-range reducer scans it and the
//! isosurface extractor reads it; none of them branch on type strings.

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, ScivisError};
use crate::value_range::{compute_value_range, ValueRange};

/// Element type of a structured volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelType {
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
}

impl VoxelType {
    /// All supported voxel types.
    pub const ALL: [VoxelType; 4] = [
        VoxelType::Uint8,
        VoxelType::Uint16,
        VoxelType::Float32,
        VoxelType::Float64,
    ];

    /// Width of one element in bytes.
    #[must_use]
    pub fn size_bytes(self) -> usize {
        match self {
            VoxelType::Uint8 => 1,
            VoxelType::Uint16 => 2,
            VoxelType::Float32 => 4,
            VoxelType::Float64 => 8,
        }
    }

    /// The config string for this type (`"uint8"`, `"uint16"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VoxelType::Uint8 => "uint8",
            VoxelType::Uint16 => "uint16",
            VoxelType::Float32 => "float32",
            VoxelType::Float64 => "float64",
        }
    }
}

impl fmt::Display for VoxelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoxelType {
    type Err = ScivisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uint8" => Ok(VoxelType::Uint8),
            "uint16" => Ok(VoxelType::Uint16),
            "float32" => Ok(VoxelType::Float32),
            "float64" => Ok(VoxelType::Float64),
            other => Err(ScivisError::format(format!(
                "unrecognized voxel type '{other}'"
            ))),
        }
    }
}

/// A numeric element type that can back a [`VoxelData`] buffer.
pub trait Voxel: Pod + PartialOrd + Send + Sync {
    /// The matching [`VoxelType`] tag.
    const TYPE: VoxelType;

    /// Widens the value to `f64` (exact for every supported type).
    fn to_f64(self) -> f64;

    /// Reverses the byte order of the value.
    #[must_use]
    fn swap_bytes(self) -> Self;

    /// Wraps owned values in the tagged buffer.
    fn wrap(values: Arc<[Self]>) -> VoxelData;

    /// Borrows the typed slice if `data` holds this element type.
    fn view(data: &VoxelData) -> Option<&[Self]>;
}

macro_rules! impl_int_voxel {
    ($ty:ty, $variant:ident) => {
        impl Voxel for $ty {
            const TYPE: VoxelType = VoxelType::$variant;

            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            fn swap_bytes(self) -> Self {
                <$ty>::swap_bytes(self)
            }

            fn wrap(values: Arc<[Self]>) -> VoxelData {
                VoxelData::$variant(values)
            }

            fn view(data: &VoxelData) -> Option<&[Self]> {
                match data {
                    VoxelData::$variant(v) => Some(&v[..]),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_float_voxel {
    ($ty:ty, $variant:ident) => {
        impl Voxel for $ty {
            const TYPE: VoxelType = VoxelType::$variant;

            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            fn swap_bytes(self) -> Self {
                <$ty>::from_bits(self.to_bits().swap_bytes())
            }

            fn wrap(values: Arc<[Self]>) -> VoxelData {
                VoxelData::$variant(values)
            }

            fn view(data: &VoxelData) -> Option<&[Self]> {
                match data {
                    VoxelData::$variant(v) => Some(&v[..]),
                    _ => None,
                }
            }
        }
    };
}

impl_int_voxel!(u8, Uint8);
impl_int_voxel!(u16, Uint16);
impl_float_voxel!(f32, Float32);
impl_float_voxel!(f64, Float64);

/// Reference-counted, immutable voxel storage tagged with its element type.
///
/// Cloning is cheap: clones share the same allocation, which is how an
/// engine-side volume keeps the voxels alive without becoming a second owner
/// that could free them.
#[derive(Clone)]
pub enum VoxelData {
    Uint8(Arc<[u8]>),
    Uint16(Arc<[u16]>),
    Float32(Arc<[f32]>),
    Float64(Arc<[f64]>),
}

/// Runs `$body` with `$v` bound to the typed slice of `$data`.
macro_rules! with_typed {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            VoxelData::Uint8($v) => $body,
            VoxelData::Uint16($v) => $body,
            VoxelData::Float32($v) => $body,
            VoxelData::Float64($v) => $body,
        }
    };
}

impl VoxelData {
    /// Reads `count` voxels of `voxel_type` with a single bulk read.
    ///
    /// Bytes land directly in typed storage in native byte order. Fails with
    /// `UnexpectedEof` if the reader runs out before `count` voxels.
    pub fn read_from<R: Read>(
        voxel_type: VoxelType,
        count: usize,
        reader: &mut R,
    ) -> std::io::Result<Self> {
        fn read_typed<T: Voxel, R: Read>(
            count: usize,
            reader: &mut R,
        ) -> std::io::Result<VoxelData> {
            let mut values = vec![<T as Zeroable>::zeroed(); count];
            reader.read_exact(bytemuck::cast_slice_mut::<T, u8>(&mut values[..]))?;
            Ok(T::wrap(values.into()))
        }

        match voxel_type {
            VoxelType::Uint8 => read_typed::<u8, R>(count, reader),
            VoxelType::Uint16 => read_typed::<u16, R>(count, reader),
            VoxelType::Float32 => read_typed::<f32, R>(count, reader),
            VoxelType::Float64 => read_typed::<f64, R>(count, reader),
        }
    }

    /// Copies a native-endian byte buffer into typed storage.
    ///
    /// Returns [`ScivisError::SizeMismatch`] if the byte count is not a
    /// multiple of the element width.
    pub fn from_bytes(voxel_type: VoxelType, bytes: &[u8]) -> Result<Self> {
        fn copy_typed<T: Voxel>(bytes: &[u8]) -> VoxelData {
            let mut values = vec![<T as Zeroable>::zeroed(); bytes.len() / std::mem::size_of::<T>()];
            bytemuck::cast_slice_mut::<T, u8>(&mut values[..]).copy_from_slice(bytes);
            T::wrap(values.into())
        }

        let width = voxel_type.size_bytes();
        if bytes.len() % width != 0 {
            return Err(ScivisError::SizeMismatch {
                expected: bytes.len() - bytes.len() % width + width,
                actual: bytes.len(),
            });
        }
        Ok(match voxel_type {
            VoxelType::Uint8 => copy_typed::<u8>(bytes),
            VoxelType::Uint16 => copy_typed::<u16>(bytes),
            VoxelType::Float32 => copy_typed::<f32>(bytes),
            VoxelType::Float64 => copy_typed::<f64>(bytes),
        })
    }

    /// Returns the element type tag.
    #[must_use]
    pub fn voxel_type(&self) -> VoxelType {
        match self {
            VoxelData::Uint8(_) => VoxelType::Uint8,
            VoxelData::Uint16(_) => VoxelType::Uint16,
            VoxelData::Float32(_) => VoxelType::Float32,
            VoxelData::Float64(_) => VoxelType::Float64,
        }
    }

    /// Returns the number of voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        with_typed!(self, v => v.len())
    }

    /// Returns true if there are no voxels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the size of the buffer in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.len() * self.voxel_type().size_bytes()
    }

    /// Views the voxels as raw native-endian bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        with_typed!(self, v => bytemuck::cast_slice(&v[..]))
    }

    /// Borrows the voxels as `&[T]` if `T` matches the stored type.
    #[must_use]
    pub fn as_slice<T: Voxel>(&self) -> Option<&[T]> {
        T::view(self)
    }

    /// Returns voxel `index` widened to `f64`.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        with_typed!(self, v => v.get(index).map(|x| x.to_f64()))
    }

    /// Computes the min/max over all voxels with a parallel reduction.
    #[must_use]
    pub fn value_range(&self) -> ValueRange {
        with_typed!(self, v => compute_value_range(&v[..]))
    }

    /// Returns a new buffer with the byte order of every voxel reversed.
    #[must_use]
    pub fn swap_bytes(&self) -> Self {
        fn swap_typed<T: Voxel>(values: &[T]) -> VoxelData {
            T::wrap(values.iter().map(|&x| x.swap_bytes()).collect())
        }
        with_typed!(self, v => swap_typed(&v[..]))
    }

    /// Returns true if both buffers share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &VoxelData) -> bool {
        match (self, other) {
            (VoxelData::Uint8(a), VoxelData::Uint8(b)) => Arc::ptr_eq(a, b),
            (VoxelData::Uint16(a), VoxelData::Uint16(b)) => Arc::ptr_eq(a, b),
            (VoxelData::Float32(a), VoxelData::Float32(b)) => Arc::ptr_eq(a, b),
            (VoxelData::Float64(a), VoxelData::Float64(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Voxel> From<Vec<T>> for VoxelData {
    fn from(values: Vec<T>) -> Self {
        T::wrap(values.into())
    }
}

impl fmt::Debug for VoxelData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelData")
            .field("voxel_type", &self.voxel_type())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_type_parse() {
        for ty in VoxelType::ALL {
            assert_eq!(ty.as_str().parse::<VoxelType>().unwrap(), ty);
        }
        assert_eq!(VoxelType::Uint16.size_bytes(), 2);
        assert_eq!(VoxelType::Float64.size_bytes(), 8);
    }

    #[test]
    fn test_unknown_voxel_type_is_format_error() {
        for bad in ["int8", "float16", "UINT8", ""] {
            let err = bad.parse::<VoxelType>().unwrap_err();
            assert!(matches!(err, ScivisError::Format(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_read_from_exact() {
        let values: Vec<u16> = vec![1, 2, 300, 40_000];
        let bytes: &[u8] = bytemuck::cast_slice(&values);
        let data = VoxelData::read_from(VoxelType::Uint16, 4, &mut &bytes[..]).unwrap();
        assert_eq!(data.voxel_type(), VoxelType::Uint16);
        assert_eq!(data.len(), 4);
        assert_eq!(data.byte_len(), 8);
        assert_eq!(data.as_slice::<u16>().unwrap(), &values[..]);
        assert!(data.as_slice::<u8>().is_none());
    }

    #[test]
    fn test_read_from_short() {
        let bytes = [0_u8; 7];
        let err = VoxelData::read_from(VoxelType::Float32, 2, &mut &bytes[..]).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_from_bytes_rejects_partial_element() {
        let err = VoxelData::from_bytes(VoxelType::Float64, &[0; 12]).unwrap_err();
        assert!(matches!(err, ScivisError::SizeMismatch { .. }));
    }

    #[test]
    fn test_as_bytes_matches_native_layout() {
        let data = VoxelData::from(vec![1.5_f32, -2.0]);
        let mut expected = Vec::new();
        expected.extend_from_slice(&1.5_f32.to_ne_bytes());
        expected.extend_from_slice(&(-2.0_f32).to_ne_bytes());
        assert_eq!(data.as_bytes(), &expected[..]);
        assert_eq!(data.value(1), Some(-2.0));
        assert_eq!(data.value(2), None);
    }

    #[test]
    fn test_swap_bytes() {
        let data = VoxelData::from(vec![0x0102_u16]);
        assert_eq!(data.swap_bytes().as_slice::<u16>().unwrap(), &[0x0201]);

        let data = VoxelData::from(vec![3.25_f64]);
        let twice = data.swap_bytes().swap_bytes();
        assert_eq!(twice.as_slice::<f64>().unwrap(), &[3.25]);
    }

    #[test]
    fn test_clone_shares_allocation() {
        let data = VoxelData::from(vec![1_u8, 2, 3]);
        let view = data.clone();
        assert!(data.ptr_eq(&view));
        assert!(!data.ptr_eq(&VoxelData::from(vec![1_u8, 2, 3])));
    }
}
