//! numpy element type descriptions
//!
//! numpy describes element types with short type strings such as `<f8` (a
//! little endian 8 byte float) or `|u1` (a single byte unsigned integer). The
//! same strings are found in `.npy` headers, and without the byte order prefix
//! in pickled `dtype` objects.

// crate modules
use crate::array::ArrayData;
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::f;

// nom parser combinators
use nom::character::complete::{anychar, digit1, one_of};
use nom::combinator::{all_consuming, map_res, opt};
use nom::sequence::tuple;
use nom::IResult;

/// Byte ordering of multi-byte elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `<`
    Little,
    /// `>`
    Big,
    /// `|`, single byte elements
    NotApplicable,
}

impl ByteOrder {
    /// Byte order of the running platform, numpy's `=`
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }

    /// Interpret a numpy byte order character
    ///
    /// Anything other than `<`, `>`, or `|` is taken to be native.
    pub fn from_char(c: char) -> Self {
        match c {
            '<' => ByteOrder::Little,
            '>' => ByteOrder::Big,
            '|' => ByteOrder::NotApplicable,
            _ => ByteOrder::native(),
        }
    }

    fn as_char(&self) -> char {
        match self {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::NotApplicable => '|',
        }
    }
}

/// Category of element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Booleans
    Bool,
    /// Signed integers
    Int,
    /// Unsigned integers
    UInt,
    /// IEEE 754 floats
    Float,
}

/// Convert fixed-width chunks of a buffer into a vector of primitives
macro_rules! decode_as {
    ($bytes:expr, $order:expr, $ty:ty) => {{
        const WIDTH: usize = std::mem::size_of::<$ty>();
        $bytes
            .chunks_exact(WIDTH)
            .map(|chunk| {
                let mut buffer = [0u8; WIDTH];
                buffer.copy_from_slice(chunk);
                match $order {
                    ByteOrder::Big => <$ty>::from_be_bytes(buffer),
                    _ => <$ty>::from_le_bytes(buffer),
                }
            })
            .collect::<Vec<$ty>>()
    }};
}

/// A supported numpy element type
///
/// Only types with a direct Rust primitive equivalent are representable.
/// Everything else (objects, strings, complex, half precision, dates) is
/// rejected during parsing.
///
/// ```rust
/// # use voxtools_pickle::{ByteOrder, DType, Kind};
/// let dtype = DType::parse("<f8").unwrap();
/// assert_eq!(dtype.kind, Kind::Float);
/// assert_eq!(dtype.size, 8);
/// assert_eq!(dtype.byte_order, ByteOrder::Little);
///
/// // numpy names are fine too
/// assert_eq!(DType::parse("uint8").unwrap(), DType::parse("|u1").unwrap());
///
/// // but not anything without a primitive equivalent
/// assert!(DType::parse("<c16").is_err());
/// assert!(DType::parse("|O").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DType {
    /// Category of element
    pub kind: Kind,
    /// Item size in bytes
    pub size: usize,
    /// Byte ordering of the serialised values
    pub byte_order: ByteOrder,
}

impl DType {
    /// Parse a numpy type string or type name
    pub fn parse(descr: &str) -> Result<Self> {
        let descr = descr.trim();

        let (order, code, size) = match named_type(descr) {
            Some((code, size)) => (None, code, Some(size)),
            None => {
                let (_, (order, code, size)) = all_consuming(type_string)(descr)
                    .map_err(|_| Error::UnsupportedDtype(descr.to_string()))?;
                (order, code, size)
            }
        };

        let kind = match code {
            'b' | '?' => Kind::Bool,
            'i' => Kind::Int,
            'u' => Kind::UInt,
            'f' => Kind::Float,
            _ => return Err(Error::UnsupportedDtype(descr.to_string())),
        };

        let size = match (kind, size) {
            (Kind::Bool, None | Some(1)) => 1,
            (Kind::Int | Kind::UInt, Some(n @ (1 | 2 | 4 | 8))) => n,
            (Kind::Float, Some(n @ (4 | 8))) => n,
            _ => return Err(Error::UnsupportedDtype(descr.to_string())),
        };

        let dtype = Self {
            kind,
            size,
            byte_order: ByteOrder::native(),
        };

        Ok(dtype.with_byte_order(order.unwrap_or('=')))
    }

    /// Replace the byte order, e.g. from the state of a pickled dtype
    ///
    /// Single byte types always end up [ByteOrder::NotApplicable].
    pub fn with_byte_order(mut self, order: char) -> Self {
        self.byte_order = match self.size {
            1 => ByteOrder::NotApplicable,
            _ => match ByteOrder::from_char(order) {
                ByteOrder::NotApplicable => ByteOrder::native(),
                other => other,
            },
        };
        self
    }

    /// Decode `count` elements from a raw buffer
    ///
    /// The buffer must hold exactly `count` items of this type.
    pub fn decode(&self, bytes: &[u8], count: usize) -> Result<ArrayData> {
        let expected = count
            .checked_mul(self.size)
            .ok_or_else(|| Error::InvalidShape(f!("{count} elements overflow")))?;

        if bytes.len() != expected {
            return Err(Error::UnexpectedByteLength {
                expected,
                found: bytes.len(),
            });
        }

        let order = self.byte_order;
        let data = match (self.kind, self.size) {
            (Kind::Bool, _) => ArrayData::Bool(bytes.iter().map(|&b| b != 0).collect()),
            (Kind::UInt, 1) => ArrayData::U8(bytes.to_vec()),
            (Kind::Int, 1) => ArrayData::I8(bytes.iter().map(|&b| b as i8).collect()),
            (Kind::UInt, 2) => ArrayData::U16(decode_as!(bytes, order, u16)),
            (Kind::Int, 2) => ArrayData::I16(decode_as!(bytes, order, i16)),
            (Kind::UInt, 4) => ArrayData::U32(decode_as!(bytes, order, u32)),
            (Kind::Int, 4) => ArrayData::I32(decode_as!(bytes, order, i32)),
            (Kind::UInt, 8) => ArrayData::U64(decode_as!(bytes, order, u64)),
            (Kind::Int, 8) => ArrayData::I64(decode_as!(bytes, order, i64)),
            (Kind::Float, 4) => ArrayData::F32(decode_as!(bytes, order, f32)),
            (Kind::Float, 8) => ArrayData::F64(decode_as!(bytes, order, f64)),
            _ => return Err(Error::UnsupportedDtype(self.to_string())),
        };

        Ok(data)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code = match self.kind {
            Kind::Bool => 'b',
            Kind::Int => 'i',
            Kind::UInt => 'u',
            Kind::Float => 'f',
        };
        write!(f, "{}{}{}", self.byte_order.as_char(), code, self.size)
    }
}

/// Type strings of the form `<f8`, `|u1`, `i4`, `?`
fn type_string(i: &str) -> IResult<&str, (Option<char>, char, Option<usize>)> {
    tuple((
        opt(one_of("<>|=")),
        anychar,
        opt(map_res(digit1, |s: &str| s.parse::<usize>())),
    ))(i)
}

/// numpy type names mapped to their type code and item size
fn named_type(name: &str) -> Option<(char, usize)> {
    let t = match name {
        "bool" => ('b', 1),
        "int8" => ('i', 1),
        "uint8" => ('u', 1),
        "int16" => ('i', 2),
        "uint16" => ('u', 2),
        "int32" => ('i', 4),
        "uint32" => ('u', 4),
        "int64" => ('i', 8),
        "uint64" => ('u', 8),
        "float32" => ('f', 4),
        "float64" => ('f', 8),
        _ => return None,
    };
    Some(t)
}
