//! Result and Error types for the viewer module

/// Type alias for `Result<T, viewer::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `voxtools-viewer`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error("failed to serialise viewer state")]
    JsonError(#[from] serde_json::Error),

    #[error("failed to load array")]
    PickleError(#[from] voxtools_pickle::Error),

    #[error("failed to prepare volume")]
    VolumeError(#[from] voxtools_volume::Error),

    #[error("unrecognised unit \"{0}\"")]
    UnknownUnit(String),

    #[error("scales must be positive and finite, found {0}")]
    InvalidScale(f64),

    #[error("coordinate space needs one unit and scale per name (found {names} names, {units} units, {scales} scales)")]
    MismatchedDimensions {
        names: usize,
        units: usize,
        scales: usize,
    },

    #[error("coordinate space of rank {expected} does not fit a volume of rank {found}")]
    RankMismatch { expected: usize, found: usize },

    #[error("a layer named \"{0}\" already exists")]
    DuplicateLayer(String),

    #[error("invalid bind address \"{0}\"")]
    InvalidBindAddress(String),
}
