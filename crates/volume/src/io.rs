//! Reading and writing NIfTI-1 files

// standard library
use std::path::Path;

// crate modules
use crate::affine::check_affine;
use crate::error::{Error, Result};
use crate::image::VolumetricImage;

// voxtools modules
use voxtools_utils::PathExt;

// external crates
use log::debug;
use ndarray::Ix3;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

/// Write a [VolumetricImage] to a single-file NIfTI-1 image
///
/// The path must end in `.nii`, or `.nii.gz` for a gzip compressed file.
/// Voxels are stored as `float32` with the affine as the sform.
///
/// ```rust, no_run
/// # use voxtools_volume::{write_nifti, VolumetricImage};
/// # use nalgebra::Matrix4;
/// # use ndarray::Array3;
/// let image = VolumetricImage::new(Array3::zeros((8, 8, 8)), Matrix4::identity());
/// write_nifti(&image, "zeros.nii.gz").unwrap();
/// ```
pub fn write_nifti<P: AsRef<Path>>(image: &VolumetricImage, path: P) -> Result<()> {
    let path = path.as_ref();
    check_output_path(path)?;
    check_affine(&image.affine)?;

    debug!("Writing {} ({})", path.display(), compression(path));
    let header = image.header();
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&image.data)?;

    Ok(())
}

/// Read a 3D NIfTI-1 image as `f32`, applying any intensity scaling
pub fn read_nifti<P: AsRef<Path>>(path: P) -> Result<VolumetricImage> {
    let path = path.as_ref();
    debug!("Reading {} ({})", path.display(), compression(path));

    let object = ReaderOptions::new().read_file(path)?;
    let header = object.header().clone();
    let data = object
        .into_volume()
        .into_ndarray::<f32>()?
        .into_dimensionality::<Ix3>()?;

    Ok(VolumetricImage::from_header(data, &header))
}

/// Fail early on paths the writer cannot use
fn check_output_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::EmptyOutputPath);
    }

    if !path.is_nifti() {
        return Err(Error::UnsupportedExtension(path.display().to_string()));
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(Error::MissingDirectory(parent.to_path_buf()))
        }
        _ => Ok(()),
    }
}

fn compression(path: &Path) -> &'static str {
    if path.is_gzip() {
        "gzip"
    } else {
        "uncompressed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths() {
        assert!(matches!(
            check_output_path(Path::new("")),
            Err(Error::EmptyOutputPath)
        ));
        assert!(matches!(
            check_output_path(Path::new("volume.nrrd")),
            Err(Error::UnsupportedExtension(_))
        ));
        assert!(matches!(
            check_output_path(Path::new("volume.gz")),
            Err(Error::UnsupportedExtension(_))
        ));
        assert!(matches!(
            check_output_path(Path::new("no/such/dir/volume.nii")),
            Err(Error::MissingDirectory(_))
        ));
        assert!(check_output_path(Path::new("volume.nii")).is_ok());
        assert!(check_output_path(Path::new("volume.NII.GZ")).is_ok());
    }
}
