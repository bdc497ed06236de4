//! Recover numpy arrays from evaluated pickle streams
//!
//! numpy pickles an `ndarray` in one of two ways:
//!
//! - protocols 0 to 4 call `multiarray._reconstruct(ndarray, (0,), b'b')` and
//!   then `BUILD` the result with `(version, shape, dtype, is_fortran, data)`
//! - protocol 5 calls `numeric._frombuffer(buffer, dtype, shape, order)`
//!
//! numpy 2 moved both modules from `numpy.core` to `numpy._core`, so either
//! path is accepted.

// crate modules
use crate::array::{NdArray, Order};
use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::unpickle::Value;

// voxtools modules
use voxtools_utils::{f, ShapeExt};

// external crates
use log::debug;

const MULTIARRAY: [&str; 2] = ["numpy.core.multiarray", "numpy._core.multiarray"];
const NUMERIC: [&str; 2] = ["numpy.core.numeric", "numpy._core.numeric"];

/// Interpret an unpickled value as a numpy array
pub fn array_from_value(value: Value) -> Result<NdArray> {
    match value {
        Value::Object {
            callable, state, ..
        } if callable.is_global(&MULTIARRAY, "_reconstruct") => {
            debug!("Found ndarray from _reconstruct");
            from_reconstruct(state.map(|s| *s))
        }
        Value::Object { callable, args, .. } if callable.is_global(&NUMERIC, "_frombuffer") => {
            debug!("Found ndarray from _frombuffer");
            from_frombuffer(*args)
        }
        other => Err(Error::NotAnArray(other.describe())),
    }
}

/// Arrays rebuilt from the state tuple of `ndarray.__setstate__`
fn from_reconstruct(state: Option<Value>) -> Result<NdArray> {
    let items = match state {
        Some(Value::Tuple(items)) => items,
        Some(other) => return Err(Error::NotAnArray(f!("ndarray state is a {}", other.describe()))),
        None => return Err(Error::NotAnArray("ndarray without state".to_string())),
    };

    // the version number is left off by some very old writers
    let (shape, dtype, fortran, data) = match items.as_slice() {
        [_version, shape, dtype, fortran, data] => (shape, dtype, fortran, data),
        [shape, dtype, fortran, data] => (shape, dtype, fortran, data),
        _ => {
            return Err(Error::NotAnArray(f!(
                "ndarray state with {} items",
                items.len()
            )))
        }
    };

    let order = match fortran.as_int() {
        Some(1) => Order::Fortran,
        _ => Order::C,
    };

    build_array(parse_shape(shape)?, parse_dtype(dtype)?, order, data)
}

/// Arrays rebuilt by `_frombuffer(buffer, dtype, shape, order)`
fn from_frombuffer(args: Value) -> Result<NdArray> {
    let items = match args {
        Value::Tuple(items) => items,
        other => return Err(Error::NotAnArray(f!("_frombuffer with {}", other.describe()))),
    };

    let [data, dtype, shape, order] = items.as_slice() else {
        return Err(Error::NotAnArray(f!(
            "_frombuffer with {} arguments",
            items.len()
        )));
    };

    let order = match order.as_text().as_deref() {
        Some("F") => Order::Fortran,
        _ => Order::C,
    };

    build_array(parse_shape(shape)?, parse_dtype(dtype)?, order, data)
}

fn build_array(shape: Vec<usize>, dtype: DType, order: Order, data: &Value) -> Result<NdArray> {
    let count = shape
        .element_count()
        .ok_or_else(|| Error::InvalidShape(f!("{} overflows", shape.dims())))?;

    debug!("Decoding {} {dtype} array in {order} order", shape.dims());
    let data = match data {
        Value::Bytes(bytes) => dtype.decode(bytes, count)?,
        other => return Err(Error::NotAnArray(f!("array data is a {}", other.describe()))),
    };

    NdArray::new(shape, order, data)
}

/// Shape tuples of non-negative integers
fn parse_shape(value: &Value) -> Result<Vec<usize>> {
    let items = match value {
        Value::Tuple(items) => items,
        other => return Err(Error::InvalidShape(f!("shape is a {}", other.describe()))),
    };

    items
        .iter()
        .map(|item| {
            item.as_int()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| Error::InvalidShape(f!("bad extent {item:?}")))
        })
        .collect()
}

/// Pickled `numpy.dtype(descr, align, copy)` objects
///
/// The type string comes without a byte order, which is the second item of
/// the `BUILD` state instead.
fn parse_dtype(value: &Value) -> Result<DType> {
    let (args, state) = match value {
        Value::Object {
            callable,
            args,
            state,
        } if callable.is_global(&["numpy"], "dtype") => (args, state),
        other => {
            return Err(Error::NotAnArray(f!(
                "expected a numpy dtype, found {}",
                other.describe()
            )))
        }
    };

    let descr = match args.as_ref() {
        Value::Tuple(items) => items.first().and_then(|v| v.as_text()),
        _ => None,
    }
    .ok_or_else(|| Error::UnsupportedDtype(args.describe()))?;

    let dtype = DType::parse(&descr)?;

    let byte_order = match state.as_deref() {
        Some(Value::Tuple(items)) => items
            .get(1)
            .and_then(|v| v.as_text())
            .and_then(|s| s.chars().next()),
        _ => None,
    };

    Ok(match byte_order {
        Some(c) => dtype.with_byte_order(c),
        None => dtype,
    })
}
