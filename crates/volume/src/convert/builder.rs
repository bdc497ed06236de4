// crate modules
use crate::affine::Transform;
use crate::convert::converter::VolumeToNifti;

// external crates
use nalgebra::Matrix4;

/// Builder implementation for VolumeToNifti configuration
///
/// The fields of [VolumeToNifti] are left public for direct use but the module
/// also implements a builder.
///
/// The builder allows for chained setter calls. Any number of parameters can
/// be set this way (including none), and the last call to set the transform
/// wins.
///
/// To get the final [VolumeToNifti] from the builder, call
/// [build()](VolumeToNiftiBuilder::build).
///
/// ```rust
/// # use voxtools_volume::{Transform, VolumeToNifti};
/// // Uniform 0.5mm voxels
/// let converter = VolumeToNifti::builder()
///     .voxel_size(0.5)
///     .build();
///
/// assert_eq!(converter.transform, Transform::UniformScale(0.5));
/// ```
#[derive(Debug, Default)]
pub struct VolumeToNiftiBuilder {
    /// Voxel index to physical space transform
    transform: Transform,
}

impl VolumeToNiftiBuilder {
    /// Create a new instance of the builder with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the [VolumeToNifti] type
    pub fn build(self) -> VolumeToNifti {
        VolumeToNifti {
            transform: self.transform,
        }
    }

    /// Set the transform from anything that converts into one
    ///
    /// This includes an `Option<f64>` voxel size, where `None` is the identity.
    pub fn transform(mut self, transform: impl Into<Transform>) -> Self {
        self.transform = transform.into();
        self
    }

    /// Uniform voxel size in mm
    pub fn voxel_size(mut self, voxel_size: f64) -> Self {
        self.transform = Transform::UniformScale(voxel_size);
        self
    }

    /// Full 4x4 affine, for rotated or translated grids
    pub fn affine(mut self, affine: Matrix4<f64>) -> Self {
        self.transform = Transform::Explicit(affine);
        self
    }
}
