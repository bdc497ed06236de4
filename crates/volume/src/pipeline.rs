//! Pickle file to NIfTI file in one call

// standard library
use std::path::Path;

// crate modules
use crate::affine::Transform;
use crate::convert::VolumeToNifti;
use crate::error::{Error, Result};
use crate::volume::VoxelVolume;

// voxtools modules
use voxtools_pickle::read_array;
use voxtools_utils::ShapeExt;

// external crates
use log::{debug, info};

/// Convert a pickled (or `.npy`) 3D array into a NIfTI file
///
/// The optional `voxel_size` is in millimetres and is applied uniformly to
/// every axis. Without it the affine is the identity.
///
/// Everything that can go wrong with the input is checked before the output
/// file is created, so a failed conversion never leaves a partial file behind.
///
/// ```rust, no_run
/// # use voxtools_volume::convert_pickle_to_nifti;
/// convert_pickle_to_nifti("scan.pkl", "scan.nii.gz", Some(2.0)).unwrap();
/// ```
pub fn convert_pickle_to_nifti<P, Q>(input: P, output: Q, voxel_size: Option<f64>) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    info!("Creating NIfTI image from {}", input.display());

    if let Some(s) = voxel_size {
        check_voxel_size(s)?;
    }

    let array = read_array(input)?;
    let volume = VoxelVolume::new(array)?;
    info!("Loaded {} {} volume", volume.shape().dims(), volume.type_name());
    debug!("{volume}");

    VolumeToNifti::builder()
        .transform(Transform::from(voxel_size))
        .build()
        .write(&volume, output)
}

/// Voxel sizes must describe a real, non-degenerate grid
fn check_voxel_size(voxel_size: f64) -> Result<()> {
    match voxel_size.is_finite() && voxel_size > 0.0 {
        true => Ok(()),
        false => Err(Error::InvalidVoxelSize(voxel_size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxel_sizes() {
        assert!(check_voxel_size(1e-3).is_ok());
        assert!(check_voxel_size(2.0).is_ok());
        assert!(check_voxel_size(0.0).is_err());
        assert!(check_voxel_size(-2.0).is_err());
        assert!(check_voxel_size(f64::NAN).is_err());
        assert!(check_voxel_size(f64::INFINITY).is_err());
    }
}
