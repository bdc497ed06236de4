// standard library
use std::path::Path;

// crate modules
use crate::affine::{check_affine, Transform};
use crate::convert::builder::VolumeToNiftiBuilder;
use crate::error::Result;
use crate::image::VolumetricImage;
use crate::io::write_nifti;
use crate::volume::VoxelVolume;

// voxtools modules
use voxtools_utils::ShapeExt;

// external crates
use log::{debug, info};

/// Convert voxel volumes to float NIfTI images
///
/// Every voxel is cast to `f32` whatever the source element type, and the
/// [Transform] becomes the image affine. With the default
/// [Transform::Identity] one voxel is one millimetre.
///
/// The fields remain public for direct use, but for convenience and style
/// preference a builder pattern is also implemented.
///
/// ```rust
/// # use voxtools_volume::{VolumeToNifti, VoxelVolume};
/// # use voxtools_pickle::{ArrayData, NdArray, Order};
/// let array = NdArray::new(vec![4, 4, 4], Order::C, ArrayData::I64(vec![5; 64])).unwrap();
/// let volume = VoxelVolume::new(array).unwrap();
///
/// let image = VolumeToNifti::builder()
///     .voxel_size(2.0)
///     .build()
///     .convert(&volume)
///     .unwrap();
///
/// assert!(image.data.iter().all(|&v| v == 5.0));
/// assert_eq!(image.affine.diagonal().as_slice(), &[2.0, 2.0, 2.0, 1.0]);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VolumeToNifti {
    /// Voxel index to physical space transform
    pub transform: Transform,
}

// Public API
impl VolumeToNifti {
    /// Start with the default configuration
    pub fn new() -> VolumeToNifti {
        Default::default()
    }

    /// Get an instance of the [VolumeToNiftiBuilder]
    pub fn builder() -> VolumeToNiftiBuilder {
        VolumeToNiftiBuilder::default()
    }

    /// Convert a [VoxelVolume] into an in-memory [VolumetricImage]
    pub fn convert(&self, volume: &VoxelVolume) -> Result<VolumetricImage> {
        let affine = self.transform.affine();
        check_affine(&affine)?;

        debug!("Casting {} {} voxels to float32", volume.len(), volume.type_name());
        let data = volume.to_f32()?;

        debug!("Using {} transform", self.transform);
        Ok(VolumetricImage::new(data, affine))
    }

    /// Convert a [VoxelVolume] and write it straight to a NIfTI file
    ///
    /// The file is compressed if `path` ends in `.gz`.
    pub fn write<P: AsRef<Path>>(&self, volume: &VoxelVolume, path: P) -> Result<()> {
        let path = path.as_ref();

        debug!("Converting {} volume", volume.shape().dims());
        let image = self.convert(volume)?;
        debug!("Image shape {}", image.shape().dims());

        write_nifti(&image, path)?;
        info!("NIfTI image saved successfully to {}", path.display());
        Ok(())
    }
}

/// Convert a volume to NIfTI and write it to `output`
///
/// Shortcut for [VolumeToNifti::write] with a one-off configuration. The
/// `transform` may be anything that converts into a [Transform], including an
/// optional voxel size.
///
/// ```rust, no_run
/// # use voxtools_volume::{convert_volume_to_nifti, Transform, VoxelVolume};
/// # use voxtools_pickle::read_array;
/// # let volume = VoxelVolume::new(read_array("volume.pkl").unwrap()).unwrap();
/// // identity affine
/// convert_volume_to_nifti(&volume, "unit.nii", Transform::Identity).unwrap();
///
/// // 1.25mm voxels
/// convert_volume_to_nifti(&volume, "scaled.nii.gz", Some(1.25)).unwrap();
/// ```
pub fn convert_volume_to_nifti<P, T>(volume: &VoxelVolume, output: P, transform: T) -> Result<()>
where
    P: AsRef<Path>,
    T: Into<Transform>,
{
    VolumeToNifti::builder()
        .transform(transform)
        .build()
        .write(volume, output)
}
