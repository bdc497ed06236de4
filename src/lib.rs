//! `voxtools` is a small toolkit for getting serialised numpy voxel arrays
//! into medical imaging formats and volume viewers
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use voxtools_utils as utils;

#[cfg(feature = "pickle")]
#[cfg_attr(docsrs, doc(cfg(feature = "pickle")))]
#[doc(inline)]
pub use voxtools_pickle as pickle;

#[cfg(feature = "volume")]
#[cfg_attr(docsrs, doc(cfg(feature = "volume")))]
#[doc(inline)]
pub use voxtools_volume as volume;

#[cfg(feature = "viewer")]
#[cfg_attr(docsrs, doc(cfg(feature = "viewer")))]
#[doc(inline)]
pub use voxtools_viewer as viewer;
