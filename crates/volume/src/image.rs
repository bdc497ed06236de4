//! Volumetric images ready for NIfTI serialisation

// crate modules
use crate::affine::voxel_sizes;

// voxtools modules
use voxtools_utils::{f, ShapeExt};

// external crates
use nalgebra::Matrix4;
use ndarray::Array3;
use nifti::NiftiHeader;

/// `sform_code` for coordinates aligned to some anatomical reference
const XFORM_ALIGNED_ANAT: i16 = 2;

/// `qform_code` and `sform_code` for no transform
const XFORM_UNKNOWN: i16 = 0;

/// `xyzt_units` for millimetre spatial units and unspecified time
const UNITS_MM: u8 = 2;

/// Float voxel data with the affine that places it in space
///
/// The affine maps voxel indices `(i, j, k, 1)` to physical coordinates in
/// millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumetricImage {
    /// Voxel values indexed `[i, j, k]`
    pub data: Array3<f32>,
    /// Voxel index to physical space transform
    pub affine: Matrix4<f64>,
}

impl VolumetricImage {
    /// Package data with an affine
    pub fn new(data: Array3<f32>, affine: Matrix4<f64>) -> Self {
        Self { data, affine }
    }

    /// Number of voxels along each axis
    pub fn shape(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    /// Voxel edge lengths in mm, from the columns of the affine
    pub fn voxel_sizes(&self) -> [f64; 3] {
        voxel_sizes(&self.affine)
    }

    /// NIfTI-1 header describing the affine
    ///
    /// The affine is stored as the sform, with the qform left unset. `pixdim`
    /// holds the voxel sizes for readers that ignore both. Dimensions and the
    /// data type are filled in by the writer.
    pub(crate) fn header(&self) -> NiftiHeader {
        let a = self.affine.map(|v| v as f32);
        let [dx, dy, dz] = self.voxel_sizes().map(|v| v as f32);

        let mut header = NiftiHeader::default();
        header.sform_code = XFORM_ALIGNED_ANAT;
        header.qform_code = XFORM_UNKNOWN;
        header.srow_x = [a[(0, 0)], a[(0, 1)], a[(0, 2)], a[(0, 3)]];
        header.srow_y = [a[(1, 0)], a[(1, 1)], a[(1, 2)], a[(1, 3)]];
        header.srow_z = [a[(2, 0)], a[(2, 1)], a[(2, 2)], a[(2, 3)]];
        header.pixdim = [1.0, dx, dy, dz, 1.0, 1.0, 1.0, 1.0];
        header.xyzt_units = UNITS_MM;
        header.scl_slope = 1.0;
        header.scl_inter = 0.0;
        header
    }

    /// Recover the affine from a header, preferring the sform
    pub(crate) fn from_header(data: Array3<f32>, header: &NiftiHeader) -> Self {
        let affine = if header.sform_code > XFORM_UNKNOWN {
            let [x, y, z] = [header.srow_x, header.srow_y, header.srow_z].map(|r| r.map(f64::from));
            Matrix4::new(
                x[0], x[1], x[2], x[3], //
                y[0], y[1], y[2], y[3], //
                z[0], z[1], z[2], z[3], //
                0.0, 0.0, 0.0, 1.0,
            )
        } else {
            // pixdim of zero means unknown, so fall back to 1mm
            let [dx, dy, dz] = [1, 2, 3].map(|i| match header.pixdim[i] {
                d if d > 0.0 => f64::from(d),
                _ => 1.0,
            });
            Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(dx, dy, dz))
        };

        Self { data, affine }
    }
}

impl std::fmt::Display for VolumetricImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [dx, dy, dz] = self.voxel_sizes();
        let mut s = "VolumetricImage {\n".to_string();
        s += &f!("    shape: {}\n", self.shape().dims());
        s += &f!("    voxel: {dx} x {dy} x {dz} mm\n}}");
        write!(f, "{}", s)
    }
}
