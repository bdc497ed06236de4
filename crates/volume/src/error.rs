//! Result and Error types for the volume module

// standard library
use std::path::PathBuf;

/// Type alias for `Result<T, volume::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `voxtools-volume`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    #[error("failed to load array")]
    PickleError(#[from] voxtools_pickle::Error),

    #[error("nifti error")]
    NiftiError(#[from] nifti::NiftiError),

    #[error("array shape error")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("expected a 3D array, found shape {0}")]
    NotThreeDimensional(String),

    #[error("volume {0} has no voxels")]
    EmptyVolume(String),

    #[error("voxel size must be positive and finite, found {0}")]
    InvalidVoxelSize(f64),

    #[error("not an affine transform ({0})")]
    NonAffineTransform(String),

    #[error("no output file provided")]
    EmptyOutputPath,

    #[error("unsupported output file \"{0}\" (expected .nii or .nii.gz)")]
    UnsupportedExtension(String),

    #[error("output directory {0:?} does not exist")]
    MissingDirectory(PathBuf),
}
