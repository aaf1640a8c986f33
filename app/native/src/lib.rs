//! ParrotBar - animated party parrots for the status bar.
//!
//! The library holds the animation engine and the CLI built on top of it:
//!
//! - [`assets`] resolves images, GIFs and data files by logical name
//! - [`imaging`] decodes GIFs and fits frames into a fixed canvas
//! - [`sets`] loads and caches named frame sequences
//! - [`animation`] cycles a sequence at a fixed cadence and publishes frames
//! - [`controller`] ties them together behind user-facing actions

pub mod animation;
pub mod assets;
pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod imaging;
pub mod platform;
pub mod sets;

pub use animation::{Animator, CadenceDriver, FrameSink};
pub use assets::{AssetKind, BundleDir, MemoryBundle, ResourceProvider};
pub use controller::{Controller, Engine, EngineOptions, SelectionOutcome};
pub use error::ParrotBarError;
pub use imaging::{Frame, Size};
pub use sets::{FrameSequence, SetKind, SetLoader};
