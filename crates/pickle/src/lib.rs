//! Loading of pickled numpy arrays and `.npy` files
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod array;
mod dtype;
mod error;
mod literal;
mod npy;
mod numpy;
mod reader;

pub mod unpickle;

// Inline anything important for a nice public API
#[doc(inline)]
pub use reader::{from_bytes, read_array};

#[doc(inline)]
pub use array::{ArrayData, NdArray, Order};

#[doc(inline)]
pub use dtype::{ByteOrder, DType, Kind};

#[doc(inline)]
pub use unpickle::{unpickle, Buffer, Value};

#[doc(inline)]
pub use numpy::array_from_value;

#[doc(inline)]
pub use error::{Error, Result};
