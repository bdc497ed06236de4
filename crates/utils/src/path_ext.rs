// standard library
use std::path::Path;

/// Extends paths with checks on volume file extensions
pub trait PathExt {
    /// True if the final extension is `.gz`, ignoring case
    ///
    /// ```rust
    /// # use voxtools_utils::PathExt;
    /// assert!("output.nii.gz".is_gzip());
    /// assert!("OUTPUT.NII.GZ".is_gzip());
    /// assert!(!"output.nii".is_gzip());
    /// ```
    fn is_gzip(&self) -> bool;

    /// True for `.nii` and `.nii.gz` file names, ignoring case
    ///
    /// ```rust
    /// # use voxtools_utils::PathExt;
    /// assert!("output.nii".is_nifti());
    /// assert!("dir/output.nii.gz".is_nifti());
    /// assert!(!"output.gz".is_nifti());
    /// assert!(!"output.hdr".is_nifti());
    /// assert!(!"".is_nifti());
    /// ```
    fn is_nifti(&self) -> bool;
}

impl<T: AsRef<Path> + ?Sized> PathExt for T {
    fn is_gzip(&self) -> bool {
        has_extension(self.as_ref(), "gz")
    }

    fn is_nifti(&self) -> bool {
        let path = self.as_ref();
        if path.is_gzip() {
            path.file_stem()
                .map(|stem| has_extension(Path::new(stem), "nii"))
                .unwrap_or(false)
        } else {
            has_extension(path, "nii")
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
