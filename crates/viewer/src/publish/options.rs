// crate modules
use crate::coordinates::CoordinateSpace;
use crate::error::Result;
use crate::publish::builder::PublishOptionsBuilder;

// voxtools modules
use voxtools_utils::f;
use voxtools_volume::Narrowing;

/// Configuration for publishing a volume
///
/// The defaults describe the scatter angle dataset: a layer named
/// `scatter_angle` on axes `x`, `y`, `z` with 10 cm voxels, saturating any
/// value outside of `0..=255`.
///
/// The fields remain public for direct use, but for convenience and style
/// preference a builder pattern is also implemented.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOptions {
    /// Name of the image layer
    pub layer_name: String,
    /// Axis names, one per volume dimension
    pub names: Vec<String>,
    /// Unit shared by every axis, may carry an SI prefix
    pub units: String,
    /// Voxel size along every axis, in `units`
    pub scale: f64,
    /// How voxel values become bytes
    pub narrowing: Narrowing,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            layer_name: "scatter_angle".to_string(),
            names: vec!["x".to_string(), "y".to_string(), "z".to_string()],
            units: "cm".to_string(),
            scale: 10.0,
            narrowing: Narrowing::Saturate,
        }
    }
}

// Public API
impl PublishOptions {
    pub fn new() -> PublishOptions {
        Default::default()
    }

    /// Get an instance of the [PublishOptionsBuilder]
    pub fn builder() -> PublishOptionsBuilder {
        PublishOptionsBuilder::default()
    }

    /// Coordinate space described by the names, units, and scale
    pub fn coordinate_space(&self) -> Result<CoordinateSpace> {
        CoordinateSpace::uniform(self.names.as_slice(), &self.units, self.scale)
    }
}

impl std::fmt::Display for PublishOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        s += "PublishOptions {\n";
        s += &f!("    layer: {}\n", self.layer_name);
        s += &f!("    axes: {}\n", self.names.join(", "));
        s += &f!("    voxel: {} {}\n", self.scale, self.units);
        s += &f!("    narrowing: {}\n", self.narrowing);
        s += "}";
        write!(f, "{}", s)
    }
}
