//! Terminal playback.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use colored::Colorize;
use parking_lot::RwLock;

use crate::animation::FrameSink;
use crate::assets::ResourceProvider;
use crate::controller::{Controller, Engine, EngineOptions};
use crate::error::ParrotBarError;
use crate::imaging::Frame;
use crate::platform::run_sync;
use crate::sets::{FrameSequence, SetKind};

/// Prints one line per published frame with its index in the shown sequence.
///
/// Frames are matched by address, so only frames of the sequence installed
/// with [`TerminalSink::show`] are printed.
#[derive(Default)]
pub struct TerminalSink {
    shown: RwLock<FrameSequence>,
    ticks: AtomicUsize,
}

impl TerminalSink {
    pub fn show(&self, sequence: FrameSequence) { *self.shown.write() = sequence; }

    #[must_use]
    pub fn ticks(&self) -> usize { self.ticks.load(Ordering::Relaxed) }

    fn index_of(&self, frame: &Frame) -> Option<(usize, usize)> {
        let shown = self.shown.read();
        let index = shown.iter().position(|candidate| std::ptr::eq(candidate, frame))?;
        Some((index, shown.len()))
    }

    /// Prints `frame` if it belongs to the shown sequence.
    pub fn publish(&self, frame: &Frame) {
        let Some((index, len)) = self.index_of(frame) else {
            return;
        };

        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(
            stdout,
            "{} frame {:>2}/{len}  {}x{}",
            format!("[{tick:>4}]").dimmed(),
            index,
            frame.width(),
            frame.height()
        );
    }
}

fn play_duration(seconds: f64) -> Result<Duration, ParrotBarError> {
    match Duration::try_from_secs_f64(seconds) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        Ok(_) => Err(ParrotBarError::InvalidArguments(format!(
            "--seconds must be a positive number, got {seconds}"
        ))),
        Err(err) => Err(ParrotBarError::InvalidArguments(format!(
            "--seconds must be a positive number, got {seconds}: {err}"
        ))),
    }
}

/// Plays `name` for `seconds`, printing each tick.
///
/// Without a name the launch set is shown, the way the status item starts up.
///
/// # Errors
///
/// Returns an error if the engine cannot start or the set has no frames.
pub fn execute(
    provider: Arc<dyn ResourceProvider>,
    options: EngineOptions,
    name: Option<&str>,
    kind: SetKind,
    seconds: f64,
) -> Result<(), ParrotBarError> {
    let duration = play_duration(seconds)?;

    let sink = Arc::new(TerminalSink::default());
    let printer = Arc::clone(&sink);
    let frame_sink: Arc<dyn FrameSink> = Arc::new(move |frame: &Frame| printer.publish(frame));
    let engine = Engine::new(provider, frame_sink, options)?;
    let controller = Controller::new(engine);

    let outcome = match name {
        Some(name) => {
            let outcome = controller.select_set_blocking(name, kind)?;
            if outcome.fell_back {
                return Err(ParrotBarError::SetNotFound(name.to_string()));
            }
            outcome
        }
        None => {
            let outcome = controller.launch()?;
            if outcome.frame_count == 0 {
                let default_set = controller.engine().options().default_set.clone();
                return Err(ParrotBarError::SetNotFound(default_set));
            }
            outcome
        }
    };

    let animator = controller.engine().animator();
    run_sync(controller.engine().dispatcher().as_ref(), || ());
    sink.show(animator.sequence());

    println!(
        "{} {} ({} frames, {})",
        "Playing".green(),
        outcome.name.bold(),
        outcome.frame_count,
        outcome.kind
    );

    if !controller.is_animating() {
        controller.toggle_animation();
    }
    thread::sleep(duration);
    if controller.is_animating() {
        controller.toggle_animation();
    }
    run_sync(controller.engine().dispatcher().as_ref(), || ());

    println!("{} after {} ticks", "Stopped".yellow(), sink.ticks());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::test_support::solid;

    #[test]
    fn test_sink_ignores_frames_outside_shown_sequence() {
        let sink = TerminalSink::default();
        sink.publish(&solid(2, 2, [0, 0, 0, 255]));
        assert_eq!(sink.ticks(), 0);
    }

    #[test]
    fn test_sink_counts_shown_frames() {
        let sink = TerminalSink::default();
        let sequence = FrameSequence::new(vec![solid(2, 2, [0, 0, 0, 255]), solid(2, 2, [1, 1, 1, 255])]);
        sink.show(sequence.clone());

        sink.publish(&sequence.frames()[1]);
        sink.publish(&sequence.frames()[0]);

        assert_eq!(sink.ticks(), 2);
        assert_eq!(sink.index_of(&sequence.frames()[1]), Some((1, 2)));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let provider: Arc<dyn ResourceProvider> = Arc::new(crate::assets::MemoryBundle::new());
        let err = execute(provider, EngineOptions::default(), Some("parrot"), SetKind::Static, 0.0).unwrap_err();
        assert!(matches!(err, ParrotBarError::InvalidArguments(_)));
    }

    #[test]
    fn test_duration_out_of_range_is_rejected() {
        for seconds in [1e20, f64::MAX, f64::INFINITY, f64::NAN, -1.0, 1e-12] {
            assert!(
                matches!(play_duration(seconds), Err(ParrotBarError::InvalidArguments(_))),
                "accepted {seconds}"
            );
        }
        assert_eq!(play_duration(1.5).unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_launch_without_default_set_is_an_error() {
        let provider: Arc<dyn ResourceProvider> = Arc::new(crate::assets::MemoryBundle::new());
        let err = execute(provider, EngineOptions::default(), None, SetKind::Static, 0.05).unwrap_err();
        assert!(matches!(err, ParrotBarError::SetNotFound(_)));
    }
}
