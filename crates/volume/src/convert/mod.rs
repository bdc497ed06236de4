//! Conversion of voxel volumes to NIfTI images
//!
//! The main entry point is [VolumeToNifti], configured directly or through
//! [VolumeToNiftiBuilder], with [convert_volume_to_nifti()] as a shortcut for
//! the common case of converting and writing in one go.
//!
//! ```rust, no_run
//! # use voxtools_volume::{convert_volume_to_nifti, VoxelVolume, VolumeToNifti};
//! # use voxtools_pickle::read_array;
//! let volume = VoxelVolume::new(read_array("volume.pkl").unwrap()).unwrap();
//!
//! // 2mm voxels, written straight to disk
//! convert_volume_to_nifti(&volume, "volume.nii.gz", Some(2.0)).unwrap();
//!
//! // or keep the image in memory
//! let image = VolumeToNifti::builder().voxel_size(2.0).build().convert(&volume).unwrap();
//! ```

mod builder;
mod converter;

pub use builder::VolumeToNiftiBuilder;
pub use converter::{convert_volume_to_nifti, VolumeToNifti};
