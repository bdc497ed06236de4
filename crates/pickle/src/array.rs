// crate modules
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::{f, ShapeExt};

/// Memory layout of the flat element buffer
///
/// numpy arrays are C-ordered (last axis varies fastest) unless created
/// otherwise. Fortran ordered buffers have the first axis varying fastest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Row-major, last index varies fastest
    #[default]
    C,
    /// Column-major, first index varies fastest
    Fortran,
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Order::C => write!(f, "C"),
            Order::Fortran => write!(f, "Fortran"),
        }
    }
}

/// Typed element storage for a deserialised array
///
/// Every numeric numpy element type with a direct Rust equivalent has a
/// variant. Byte order is already resolved, values are native.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    /// numpy `bool`
    Bool(Vec<bool>),
    /// numpy `uint8`
    U8(Vec<u8>),
    /// numpy `int8`
    I8(Vec<i8>),
    /// numpy `uint16`
    U16(Vec<u16>),
    /// numpy `int16`
    I16(Vec<i16>),
    /// numpy `uint32`
    U32(Vec<u32>),
    /// numpy `int32`
    I32(Vec<i32>),
    /// numpy `uint64`
    U64(Vec<u64>),
    /// numpy `int64`
    I64(Vec<i64>),
    /// numpy `float32`
    F32(Vec<f32>),
    /// numpy `float64`
    F64(Vec<f64>),
}

impl ArrayData {
    /// Number of elements stored
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::U8(v) => v.len(),
            ArrayData::I8(v) => v.len(),
            ArrayData::U16(v) => v.len(),
            ArrayData::I16(v) => v.len(),
            ArrayData::U32(v) => v.len(),
            ArrayData::I32(v) => v.len(),
            ArrayData::U64(v) => v.len(),
            ArrayData::I64(v) => v.len(),
            ArrayData::F32(v) => v.len(),
            ArrayData::F64(v) => v.len(),
        }
    }

    /// True if there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numpy name of the element type, e.g. `float64`
    pub fn type_name(&self) -> &'static str {
        match self {
            ArrayData::Bool(_) => "bool",
            ArrayData::U8(_) => "uint8",
            ArrayData::I8(_) => "int8",
            ArrayData::U16(_) => "uint16",
            ArrayData::I16(_) => "int16",
            ArrayData::U32(_) => "uint32",
            ArrayData::I32(_) => "int32",
            ArrayData::U64(_) => "uint64",
            ArrayData::I64(_) => "int64",
            ArrayData::F32(_) => "float32",
            ArrayData::F64(_) => "float64",
        }
    }
}

/// A dense N-dimensional array recovered from a pickle or `.npy` file
///
/// The element count always matches the product of the shape, which is
/// checked on construction. The buffer is stored exactly as it was serialised,
/// with [Order] recording how it maps onto the shape.
///
/// ```rust
/// # use voxtools_pickle::{ArrayData, NdArray, Order};
/// let array = NdArray::new(vec![2, 1, 2], Order::C, ArrayData::U8(vec![1, 2, 3, 4])).unwrap();
/// assert_eq!(array.ndim(), 3);
/// assert_eq!(array.len(), 4);
///
/// // the element count has to agree with the shape
/// assert!(NdArray::new(vec![2, 2], Order::C, ArrayData::U8(vec![1, 2, 3])).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    /// Extent of every axis
    pub shape: Vec<usize>,
    /// Layout of the element buffer
    pub order: Order,
    /// Element buffer
    pub data: ArrayData,
}

impl NdArray {
    /// Build an array, checking the element count against the shape
    pub fn new(shape: Vec<usize>, order: Order, data: ArrayData) -> Result<Self> {
        let expected = shape
            .element_count()
            .ok_or_else(|| Error::InvalidShape(f!("{} overflows", shape.dims())))?;

        if data.len() != expected {
            return Err(Error::InvalidShape(f!(
                "{} needs {expected} elements, found {}",
                shape.dims(),
                data.len()
            )));
        }

        Ok(Self { shape, order, data })
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if any axis has zero extent
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The numpy name of the element type
    pub fn type_name(&self) -> &'static str {
        self.data.type_name()
    }
}

impl std::fmt::Display for NdArray {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "NdArray {\n".to_string();
        s += &f!("    shape: {} ({} elements)\n", self.shape.dims(), self.len());
        s += &f!("    dtype: {}\n", self.type_name());
        s += &f!("    order: {}\n}}", self.order);
        write!(f, "{}", s)
    }
}
