//! Three dimensional voxel grids

// crate modules
use crate::error::{Error, Result};
use crate::narrowing::Narrowing;

// voxtools modules
use voxtools_pickle::{ArrayData, NdArray, Order};
use voxtools_utils::{f, ShapeExt};

// external crates
use itertools::{Itertools, MinMaxResult};
use ndarray::{Array3, ShapeBuilder};

/// A non-empty 3D array of voxel values
///
/// Wraps an [NdArray] that is known to have exactly three axes, none of them
/// zero length. Values keep their original element type until one of the
/// casting methods is called.
///
/// Axes keep the meaning they had in the serialised array, so element
/// `[i, j, k]` of any cast is voxel `(i, j, k)`.
///
/// ```rust
/// # use voxtools_volume::VoxelVolume;
/// # use voxtools_pickle::{ArrayData, NdArray, Order};
/// let array = NdArray::new(vec![2, 2, 2], Order::C, ArrayData::I32(vec![5; 8])).unwrap();
/// let volume = VoxelVolume::new(array).unwrap();
///
/// assert_eq!(volume.shape(), [2, 2, 2]);
/// assert!(volume.to_f32().unwrap().iter().all(|&v| v == 5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelVolume {
    array: NdArray,
}

impl VoxelVolume {
    /// Validate that an array describes a volume
    pub fn new(array: NdArray) -> Result<Self> {
        if array.ndim() != 3 {
            return Err(Error::NotThreeDimensional(array.shape.dims()));
        }

        if !array.shape.is_populated() {
            return Err(Error::EmptyVolume(array.shape.dims()));
        }

        Ok(Self { array })
    }

    /// Number of voxels along each axis
    pub fn shape(&self) -> [usize; 3] {
        [self.array.shape[0], self.array.shape[1], self.array.shape[2]]
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Always false, volumes have at least one voxel
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The numpy name of the stored element type
    pub fn type_name(&self) -> &'static str {
        self.array.type_name()
    }

    /// The underlying array
    pub fn as_array(&self) -> &NdArray {
        &self.array
    }

    /// Cast every voxel to `f32`
    ///
    /// Integers are converted to the nearest representable float, `f64`
    /// values are rounded to nearest, and booleans become 0 or 1.
    pub fn to_f32(&self) -> Result<Array3<f32>> {
        let values: Vec<f32> = match &self.array.data {
            ArrayData::Bool(v) => v.iter().map(|&x| u8::from(x) as f32).collect(),
            ArrayData::U8(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::I8(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::U16(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::I16(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::U32(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::I32(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::U64(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::I64(v) => v.iter().map(|&x| x as f32).collect(),
            ArrayData::F32(v) => v.clone(),
            ArrayData::F64(v) => v.iter().map(|&x| x as f32).collect(),
        };
        self.shaped(values)
    }

    /// Cast every voxel to `u8` with an explicit policy for out of range values
    pub fn to_u8(&self, narrowing: Narrowing) -> Result<Array3<u8>> {
        let n = narrowing;
        let values: Vec<u8> = match &self.array.data {
            ArrayData::Bool(v) => v.iter().map(|&x| u8::from(x)).collect(),
            ArrayData::U8(v) => v.clone(),
            ArrayData::I8(v) => v.iter().map(|&x| n.narrow_i64(x.into())).collect(),
            ArrayData::U16(v) => v.iter().map(|&x| n.narrow_u64(x.into())).collect(),
            ArrayData::I16(v) => v.iter().map(|&x| n.narrow_i64(x.into())).collect(),
            ArrayData::U32(v) => v.iter().map(|&x| n.narrow_u64(x.into())).collect(),
            ArrayData::I32(v) => v.iter().map(|&x| n.narrow_i64(x.into())).collect(),
            ArrayData::U64(v) => v.iter().map(|&x| n.narrow_u64(x)).collect(),
            ArrayData::I64(v) => v.iter().map(|&x| n.narrow_i64(x)).collect(),
            ArrayData::F32(v) => v.iter().map(|&x| n.narrow_f64(x.into())).collect(),
            ArrayData::F64(v) => v.iter().map(|&x| n.narrow_f64(x)).collect(),
        };
        self.shaped(values)
    }

    /// Lay out a flat buffer in the memory order of the source array
    fn shaped<T>(&self, values: Vec<T>) -> Result<Array3<T>> {
        let [x, y, z] = self.shape();
        let array = match self.array.order {
            Order::C => Array3::from_shape_vec((x, y, z), values)?,
            Order::Fortran => Array3::from_shape_vec((x, y, z).f(), values)?,
        };
        Ok(array)
    }
}

impl TryFrom<NdArray> for VoxelVolume {
    type Error = Error;

    fn try_from(array: NdArray) -> Result<Self> {
        Self::new(array)
    }
}

impl std::fmt::Display for VoxelVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let range = match self.to_f32().map(|a| a.iter().copied().minmax()) {
            Ok(MinMaxResult::MinMax(min, max)) => f!("{min:.5e} to {max:.5e}"),
            Ok(MinMaxResult::OneElement(v)) => f!("{v:.5e}"),
            _ => "none".to_string(),
        };

        let mut s = "VoxelVolume {\n".to_string();
        s += &f!("    shape: {} ({} voxels)\n", self.array.shape.dims(), self.len());
        s += &f!("    dtype: {}\n", self.type_name());
        s += &f!("    order: {}\n", self.array.order);
        s += &f!("    range: {range}\n}}");
        write!(f, "{}", s)
    }
}
