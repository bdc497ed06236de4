//! Load serialised numpy arrays from disk or memory

// standard library
use std::path::Path;

// crate modules
use crate::array::NdArray;
use crate::error::Result;
use crate::npy::{array_from_npy, NPY_MAGIC};
use crate::numpy::array_from_value;
use crate::unpickle::unpickle;

// voxtools modules
use voxtools_utils::ShapeExt;

// external crates
use log::{debug, info};

/// Read a numpy array from a pickle or `.npy` file
///
/// The container is picked from the content rather than the file extension.
/// `.npy` files always start with `\x93NUMPY`; anything else is evaluated as
/// a pickle stream.
///
/// The whole file is read into memory first, and the element buffer is copied
/// once into the returned [NdArray].
///
/// ```rust, no_run
/// # use voxtools_pickle::read_array;
/// let array = read_array("data/scatter_angle.pkl").unwrap();
/// println!("{array}");
/// ```
pub fn read_array<P: AsRef<Path>>(path: P) -> Result<NdArray> {
    let path = path.as_ref();
    info!("Reading {}", path.display());

    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes", bytes.len());

    from_bytes(&bytes)
}

/// Read a numpy array from an in-memory pickle stream or `.npy` file
pub fn from_bytes(bytes: &[u8]) -> Result<NdArray> {
    let array = if bytes.starts_with(NPY_MAGIC) {
        debug!("Found npy magic string");
        array_from_npy(bytes)?
    } else {
        debug!("Evaluating pickle stream");
        array_from_value(unpickle(bytes)?)?
    };

    debug!("Loaded {} {} array", array.shape.dims(), array.type_name());
    Ok(array)
}
