//! Image layers backed by in-memory volumes

// crate modules
use crate::coordinates::CoordinateSpace;
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::{f, ShapeExt};

// external crates
use ndarray::Array3;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Value};

/// 8-bit voxel data served to the viewer from this process
///
/// The volume carries its own [CoordinateSpace], which must have one axis per
/// array dimension.
///
/// ```rust
/// # use voxtools_viewer::{CoordinateSpace, LocalVolume};
/// # use ndarray::Array3;
/// let space = CoordinateSpace::uniform(&["x", "y", "z"], "cm", 10.0).unwrap();
/// let volume = LocalVolume::new(Array3::zeros((2, 3, 4)), space).unwrap();
///
/// assert_eq!(volume.info()["shape"], serde_json::json!([2, 3, 4]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVolume {
    data: Array3<u8>,
    dimensions: CoordinateSpace,
}

impl LocalVolume {
    /// Attach a coordinate space to voxel data
    pub fn new(data: Array3<u8>, dimensions: CoordinateSpace) -> Result<Self> {
        if dimensions.rank() != data.ndim() {
            return Err(Error::RankMismatch {
                expected: dimensions.rank(),
                found: data.ndim(),
            });
        }
        Ok(Self { data, dimensions })
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn dimensions(&self) -> &CoordinateSpace {
        &self.dimensions
    }

    /// Volume description for whatever serves the voxel data
    pub fn info(&self) -> Value {
        json!({
            "dataType": "uint8",
            "dimensions": self.dimensions,
            "shape": self.data.shape(),
        })
    }
}

/// A named image layer of the viewer state
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub volume: LocalVolume,
}

impl Layer {
    pub fn new(name: &str, volume: LocalVolume) -> Self {
        Self {
            name: name.to_string(),
            volume,
        }
    }

    /// Where the viewer fetches the layer data from
    pub fn source(&self) -> String {
        f!("local://volume/{}", self.name)
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "image")?;
        map.serialize_entry("source", &self.source())?;
        map.serialize_entry("name", &self.name)?;
        map.end()
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} uint8, {})",
            self.name,
            self.volume.data.shape().dims(),
            self.volume.dimensions
        )
    }
}
