//! Frame decoding and normalization.
//!
//! - [`offsets`] - name-based vertical alignment policy
//! - [`resize`] - letterboxed fit into a fixed canvas
//! - [`gif`] - GIF container to frame list

pub mod gif;
pub mod offsets;
pub mod resize;

pub use offsets::{OffsetClass, OffsetPolicy, base_name};
pub use resize::{FrameResizer, Size, fit};

/// A single decoded raster frame.
pub type Frame = image::RgbaImage;
