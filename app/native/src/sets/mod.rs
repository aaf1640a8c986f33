//! Named image sets: resolution, caching and discovery.

mod loader;
mod registry;
mod sequence;

pub use loader::{LoaderOptions, SetLoader};
pub use registry::{MenuEntry, SetCommand, SetRegistry, static_set_names};
pub use sequence::{FrameSequence, SetKey, SetKind};
