//! Publication of scatter angle volumes to a viewer state
//!
//! A loaded [VoxelVolume](voxtools_volume::VoxelVolume) is narrowed to 8-bit
//! voxels and added to a [ViewerState](crate::ViewerState) as a single image
//! layer. The same per-axis units and scales are used for the global
//! coordinate space and the layer itself, so no affine is involved.
//!
//! ```rust, no_run
//! # use voxtools_viewer::{publish_scatter_angle, LocalViewer, PublishOptions};
//! # use voxtools_volume::VoxelVolume;
//! # use voxtools_pickle::read_array;
//! let volume = VoxelVolume::new(read_array("data/scatter.pkl").unwrap()).unwrap();
//! let options = PublishOptions::builder().scale(5.0).units("mm").build();
//!
//! let mut viewer = LocalViewer::new("127.0.0.1:9000").unwrap();
//! viewer
//!     .txn(|state| publish_scatter_angle(state, &volume, &options))
//!     .unwrap();
//! ```

mod builder;
mod options;
mod publisher;

#[doc(inline)]
pub use builder::PublishOptionsBuilder;

#[doc(inline)]
pub use options::PublishOptions;

#[doc(inline)]
pub use publisher::{load_scatter_angle, publish_scatter_angle};
