//! Voxel index to physical space transforms

// crate modules
use crate::error::{Error, Result};

// voxtools modules
use voxtools_utils::f;

// external crates
use nalgebra::{Matrix4, Vector4};

/// Build the affine for a uniform voxel size
///
/// Without a voxel size this is the 4x4 identity, so one voxel is one
/// millimetre. Otherwise every spatial axis is scaled by the same `voxel_size`
/// with no rotation, shear, or translation.
///
/// ```rust
/// # use voxtools_volume::affine_from_voxel_size;
/// # use nalgebra::Matrix4;
/// let affine = affine_from_voxel_size(Some(2.0));
/// assert_eq!(affine.diagonal().as_slice(), &[2.0, 2.0, 2.0, 1.0]);
///
/// assert_eq!(affine_from_voxel_size(None), Matrix4::identity());
/// ```
///
/// No checks are made on the value. Zero or negative sizes give a degenerate
/// or mirrored affine, so validate user input before calling this.
pub fn affine_from_voxel_size(voxel_size: Option<f64>) -> Matrix4<f64> {
    match voxel_size {
        Some(s) => Matrix4::from_diagonal(&Vector4::new(s, s, s, 1.0)),
        None => Matrix4::identity(),
    }
}

/// Spatial transform to attach to a converted volume
///
/// Anything that can describe an affine converts into a [Transform]:
///
/// ```rust
/// # use voxtools_volume::Transform;
/// # use nalgebra::Matrix4;
/// assert_eq!(Transform::from(None::<f64>), Transform::Identity);
/// assert_eq!(Transform::from(Some(0.5)), Transform::UniformScale(0.5));
/// assert_eq!(Transform::from(0.5), Transform::UniformScale(0.5));
///
/// let affine = Matrix4::new_scaling(3.0);
/// assert_eq!(Transform::from(affine).affine(), affine);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Transform {
    /// One voxel per millimetre
    #[default]
    Identity,
    /// Same voxel size (mm) along every axis
    UniformScale(f64),
    /// Any full 4x4 affine
    Explicit(Matrix4<f64>),
}

impl Transform {
    /// Resolve to a 4x4 affine matrix
    pub fn affine(&self) -> Matrix4<f64> {
        match self {
            Transform::Identity => affine_from_voxel_size(None),
            Transform::UniformScale(s) => affine_from_voxel_size(Some(*s)),
            Transform::Explicit(m) => *m,
        }
    }

    /// Length of a voxel edge along each axis
    pub fn voxel_sizes(&self) -> [f64; 3] {
        voxel_sizes(&self.affine())
    }
}

impl From<Option<f64>> for Transform {
    fn from(voxel_size: Option<f64>) -> Self {
        match voxel_size {
            Some(s) => Transform::UniformScale(s),
            None => Transform::Identity,
        }
    }
}

impl From<f64> for Transform {
    fn from(voxel_size: f64) -> Self {
        Transform::UniformScale(voxel_size)
    }
}

impl From<Matrix4<f64>> for Transform {
    fn from(affine: Matrix4<f64>) -> Self {
        Transform::Explicit(affine)
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Transform::Identity => write!(f, "identity"),
            Transform::UniformScale(s) => write!(f, "uniform {s} mm voxels"),
            Transform::Explicit(_) => {
                let [x, y, z] = self.voxel_sizes();
                write!(f, "explicit affine ({x} x {y} x {z} mm voxels)")
            }
        }
    }
}

/// NIfTI only stores the top three rows, so anything else would be lost
pub(crate) fn check_affine(affine: &Matrix4<f64>) -> Result<()> {
    if !affine.iter().all(|v| v.is_finite()) {
        return Err(Error::NonAffineTransform("non-finite entries".to_string()));
    }

    let bottom = affine.row(3);
    if bottom.iter().ne([0.0, 0.0, 0.0, 1.0].iter()) {
        let row: Vec<String> = bottom.iter().map(|v| v.to_string()).collect();
        return Err(Error::NonAffineTransform(f!(
            "bottom row [{}], expected [0, 0, 0, 1]",
            row.join(", ")
        )));
    }

    Ok(())
}

/// Column norms of the spatial part of an affine
pub(crate) fn voxel_sizes(affine: &Matrix4<f64>) -> [f64; 3] {
    [0, 1, 2].map(|i| affine.fixed_view::<3, 1>(0, i).norm())
}
