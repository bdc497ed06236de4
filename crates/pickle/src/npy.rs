//! Arrays saved with `numpy.save`
//!
//! The header dictionary is parsed by `npyz`. The element buffer that follows
//! it is decoded here so that every supported [DType] goes through the same
//! path as pickled arrays.

// crate modules
use crate::array::{NdArray, Order};
use crate::dtype::DType;
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::{f, ShapeExt};

// external crates
use log::debug;

// nom parser combinators
use nom::bytes::complete::{tag, take};
use nom::number::complete::{le_u16, le_u32, le_u8};
use nom::sequence::tuple;
use nom::IResult;

/// Magic string at the start of every `.npy` file
pub const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Read an array from the full contents of a `.npy` file
pub fn array_from_npy(bytes: &[u8]) -> Result<NdArray> {
    let npy = npyz::NpyFile::new(bytes)?;

    let dtype = match npy.dtype() {
        npyz::DType::Plain(type_str) => DType::parse(&type_str.to_string())?,
        other => return Err(Error::UnsupportedDtype(f!("{other:?}"))),
    };

    let order = match npy.order() {
        npyz::Order::C => Order::C,
        npyz::Order::Fortran => Order::Fortran,
    };

    let shape = npy
        .shape()
        .iter()
        .map(|&n| usize::try_from(n).map_err(|_| Error::InvalidShape(f!("extent {n} too large"))))
        .collect::<Result<Vec<usize>>>()?;

    let count = shape
        .element_count()
        .ok_or_else(|| Error::InvalidShape(f!("{} overflows", shape.dims())))?;

    let (data, version) =
        preamble(bytes).map_err(|_| Error::NotAnArray("malformed npy preamble".to_string()))?;
    debug!(
        "Decoding npy v{version} {} {dtype} array in {order} order",
        shape.dims()
    );

    NdArray::new(shape, order, dtype.decode(data, count)?)
}

/// Skip the magic, version, and header, returning the data and major version
///
/// Version 1 files use a two byte header length, later versions four.
fn preamble(i: &[u8]) -> IResult<&[u8], u8> {
    let (i, (_, major, _)) = tuple((tag(NPY_MAGIC), le_u8, le_u8))(i)?;
    let (i, header_len) = match major {
        1 => {
            let (i, n) = le_u16(i)?;
            (i, n as usize)
        }
        _ => {
            let (i, n) = le_u32(i)?;
            (i, n as usize)
        }
    };
    let (data, _header) = take(header_len)(i)?;
    Ok((data, major))
}
