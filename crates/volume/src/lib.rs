//! Conversion of voxel arrays into NIfTI volumes
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod affine;
mod error;
mod image;
mod io;
mod narrowing;
mod pipeline;
mod volume;

pub mod convert;

// Inline anything important for a nice public API
#[doc(inline)]
pub use pipeline::convert_pickle_to_nifti;

#[doc(inline)]
pub use convert::{convert_volume_to_nifti, VolumeToNifti, VolumeToNiftiBuilder};

#[doc(inline)]
pub use affine::{affine_from_voxel_size, Transform};

#[doc(inline)]
pub use volume::VoxelVolume;

#[doc(inline)]
pub use image::VolumetricImage;

#[doc(inline)]
pub use io::{read_nifti, write_nifti};

#[doc(inline)]
pub use narrowing::Narrowing;

#[doc(inline)]
pub use error::{Error, Result};
