// standard library
use std::path::Path;

// crate modules
use crate::error::Result;
use crate::layer::LocalVolume;
use crate::publish::options::PublishOptions;
use crate::state::ViewerState;

// voxtools modules
use voxtools_pickle::read_array;
use voxtools_utils::ShapeExt;
use voxtools_volume::VoxelVolume;

// external crates
use log::{debug, info};

/// Add a volume to the viewer state as a single 8-bit image layer
///
/// The voxels are narrowed to `u8` under `options.narrowing`. The global
/// coordinate space of the state is replaced by the one described in
/// `options`, and the new layer carries the same space.
///
/// Nothing in the state changes if this fails.
pub fn publish_scatter_angle(
    state: &mut ViewerState,
    volume: &VoxelVolume,
    options: &PublishOptions,
) -> Result<()> {
    debug!("{options}");
    let space = options.coordinate_space()?;

    debug!("Narrowing {} {} voxels to uint8", volume.len(), volume.type_name());
    let data = volume.to_u8(options.narrowing)?;
    let layer = LocalVolume::new(data, space.clone())?;

    state.append_layer(&options.layer_name, layer)?;
    state.dimensions = Some(space);

    info!(
        "Published {} volume as layer \"{}\"",
        volume.shape().dims(),
        options.layer_name
    );
    Ok(())
}

/// Load the 3D volume stored as `file` under `data_dir`
///
/// ```rust, no_run
/// # use voxtools_viewer::load_scatter_angle;
/// let volume = load_scatter_angle("data", "aec_hackathon_gscan_example_smaller_data.pkl").unwrap();
/// ```
pub fn load_scatter_angle<P: AsRef<Path>>(data_dir: P, file: &str) -> Result<VoxelVolume> {
    let path = data_dir.as_ref().join(file);
    let volume = VoxelVolume::new(read_array(path)?)?;
    debug!("{volume}");
    Ok(volume)
}
