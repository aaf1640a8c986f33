//! Application-wide constants.

use std::time::Duration;

/// Short application name, used for config directories and as the prefix of named threads.
pub const APP_NAME: &str = "parrotbar";

/// Fixed interval between two animation frames.
pub const FRAME_CADENCE: Duration = Duration::from_millis(60);

/// Static sets are probed as `name1` ..= `name10`. Frames past this index are never loaded.
pub const MAX_STATIC_FRAMES: u32 = 10;

/// Set loaded at launch and used as the fallback when a selection yields no frames.
pub const DEFAULT_SET_NAME: &str = "parrot";

/// Name shown for the current set after falling back to [`DEFAULT_SET_NAME`].
pub const DEFAULT_SET_DISPLAY_NAME: &str = "PartyParrot";

/// Canvas size of frames produced for static sets.
pub const STATIC_FRAME_SIZE: u32 = 32;

/// Canvas size of frames shown in the status bar icon.
pub const ICON_SIZE: u32 = 27;

/// Data resource holding the vertical offset name lists.
pub const OFFSETS_RESOURCE: &str = "Offsets";

/// Interval between set changes while random mode is on.
pub const RANDOM_MODE_INTERVAL: Duration = Duration::from_secs(30);
