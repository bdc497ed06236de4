//! Publication of voxel volumes to a volumetric viewer
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod coordinates;
mod error;
mod layer;
mod state;
mod viewer;

pub mod publish;

// Inline anything important for a nice public API
#[doc(inline)]
pub use publish::{load_scatter_angle, publish_scatter_angle, PublishOptions, PublishOptionsBuilder};

#[doc(inline)]
pub use coordinates::{CoordinateSpace, Dimension};

#[doc(inline)]
pub use layer::{Layer, LocalVolume};

#[doc(inline)]
pub use state::ViewerState;

#[doc(inline)]
pub use viewer::LocalViewer;

#[doc(inline)]
pub use error::{Error, Result};
