//! Frame playback.
//!
//! Two execution contexts cooperate here:
//!
//! - the cadence runtime ([`CadenceDriver`]) owns the timers and decides *when* a frame is due;
//! - the UI dispatcher ([`crate::platform::Dispatcher`]) mutates [`AnimationState`] and
//!   publishes frames to the [`FrameSink`].
//!
//! The timer never touches the sink directly.

mod driver;
mod player;
mod sink;
mod state;

pub use driver::CadenceDriver;
pub use player::Animator;
pub use sink::FrameSink;
pub use state::AnimationState;
