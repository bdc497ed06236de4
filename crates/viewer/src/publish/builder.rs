// crate modules
use crate::publish::options::PublishOptions;

// voxtools modules
use voxtools_volume::Narrowing;

/// Builder implementation for PublishOptions configuration
///
/// Any number of parameters can be set with chained calls, and anything not
/// set keeps the [PublishOptions] default.
///
/// To get the final [PublishOptions] from the builder, call
/// [build()](PublishOptionsBuilder::build).
///
/// ```rust
/// # use voxtools_viewer::PublishOptions;
/// # use voxtools_volume::Narrowing;
/// let options = PublishOptions::builder()
///     .layer_name("density")
///     .scale(2.5)
///     .units("mm")
///     .narrowing(Narrowing::Wrap)
///     .build();
///
/// assert_eq!(options.layer_name, "density");
/// assert_eq!(options.names, vec!["x", "y", "z"]);
/// ```
#[derive(Debug, Default)]
pub struct PublishOptionsBuilder {
    options: PublishOptions,
}

impl PublishOptionsBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [PublishOptions] type
    pub fn build(self) -> PublishOptions {
        self.options
    }

    /// Name of the image layer
    pub fn layer_name(mut self, name: &str) -> Self {
        self.options.layer_name = name.to_string();
        self
    }

    /// Axis names, one per volume dimension
    pub fn names(mut self, names: &[&str]) -> Self {
        self.options.names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Unit shared by every axis
    pub fn units(mut self, units: &str) -> Self {
        self.options.units = units.to_string();
        self
    }

    /// Voxel size along every axis
    pub fn scale(mut self, scale: f64) -> Self {
        self.options.scale = scale;
        self
    }

    /// How voxel values become bytes
    pub fn narrowing(mut self, narrowing: Narrowing) -> Self {
        self.options.narrowing = narrowing;
        self
    }
}
