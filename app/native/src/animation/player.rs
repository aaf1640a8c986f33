//! The animation loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{AnimationState, FrameSink};
use crate::constants::FRAME_CADENCE;
use crate::platform::Dispatcher;
use crate::sets::FrameSequence;

struct Shared {
    state: Mutex<AnimationState>,
    sink: Arc<dyn FrameSink>,
    dispatcher: Arc<dyn Dispatcher>,
    live_loops: AtomicUsize,
    cadence: Duration,
}

impl Shared {
    /// Installs `sequence` and publishes its first frame. Runs on the UI context.
    fn show(&self, sequence: FrameSequence) {
        self.state.lock().install(sequence.clone());

        if let Some(frame) = sequence.first() {
            self.sink.publish(frame);
        }
    }

    /// One tick, run on the UI context.
    fn advance(&self, generation: u64) {
        let next = self.state.lock().advance(generation);

        if let Some((sequence, index)) = next
            && let Some(frame) = sequence.get(index)
        {
            self.sink.publish(frame);
        }
    }
}

/// Counts a loop task as live for as long as it is alive.
struct LiveLoop<'a>(&'a AtomicUsize);

impl<'a> LiveLoop<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LiveLoop<'_> {
    fn drop(&mut self) { self.0.fetch_sub(1, Ordering::SeqCst); }
}

struct LoopHandle {
    cancel: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Cycles a [`FrameSequence`] at a fixed cadence.
///
/// Timers run on the cadence runtime. State changes and publication are
/// dispatched to the UI context, so the sink is only ever called from there.
pub struct Animator {
    shared: Arc<Shared>,
    runtime: Handle,
    active: Mutex<Option<LoopHandle>>,
}

impl Animator {
    #[must_use]
    pub fn new(runtime: Handle, dispatcher: Arc<dyn Dispatcher>, sink: Arc<dyn FrameSink>) -> Self {
        Self::with_cadence(runtime, dispatcher, sink, FRAME_CADENCE)
    }

    #[must_use]
    pub fn with_cadence(
        runtime: Handle,
        dispatcher: Arc<dyn Dispatcher>,
        sink: Arc<dyn FrameSink>,
        cadence: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(AnimationState::default()),
                sink,
                dispatcher,
                live_loops: AtomicUsize::new(0),
                cadence,
            }),
            runtime,
            active: Mutex::new(None),
        }
    }

    /// Starts cycling from frame 0.
    ///
    /// A loop that is already active is cancelled first; the new loop waits for
    /// it to exit before its first tick.
    pub fn start(&self) {
        let mut active = self.active.lock();

        let previous = active.take().map(|handle| {
            let _ = handle.cancel.send(true);
            handle.join
        });

        let generation = self.shared.state.lock().begin();
        let (cancel, cancelled) = watch::channel(false);
        let shared = Arc::clone(&self.shared);

        let join = self.runtime.spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            run_loop(shared, generation, cancelled).await;
        });

        *active = Some(LoopHandle { cancel, join });
        tracing::debug!(generation, "animation started");
    }

    /// Cancels the active loop, if any. Calling it while idle is a no-op.
    pub fn stop(&self) {
        if let Some(handle) = self.active.lock().take() {
            let _ = handle.cancel.send(true);
        }

        let mut state = self.shared.state.lock();
        if state.running {
            state.halt();
            tracing::debug!("animation stopped");
        }
    }

    /// Installs `sequence` at frame 0 and publishes that frame.
    ///
    /// Both happen in one step on the UI context: inline when called from it,
    /// queued behind pending ticks otherwise. The running state is left untouched.
    pub fn replace_sequence(&self, sequence: FrameSequence) {
        let shared = Arc::clone(&self.shared);
        let show = move || shared.show(sequence);

        if self.shared.dispatcher.is_current() {
            show();
        } else {
            self.shared.dispatcher.dispatch(Box::new(show));
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool { self.shared.state.lock().running }

    #[must_use]
    pub fn cursor(&self) -> usize { self.shared.state.lock().cursor }

    #[must_use]
    pub fn sequence(&self) -> FrameSequence { self.shared.state.lock().sequence.clone() }

    /// Number of loop tasks currently executing.
    #[must_use]
    pub fn live_loops(&self) -> usize { self.shared.live_loops.load(Ordering::SeqCst) }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<dyn Dispatcher> { &self.shared.dispatcher }
}

impl Drop for Animator {
    fn drop(&mut self) { self.stop(); }
}

async fn run_loop(shared: Arc<Shared>, generation: u64, mut cancelled: watch::Receiver<bool>) {
    let _live = LiveLoop::enter(&shared.live_loops);

    let mut ticker = time::interval_at(Instant::now() + shared.cadence, shared.cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancelled.changed() => break,
            _ = ticker.tick() => {}
        }

        if *cancelled.borrow() {
            break;
        }

        let tick = Arc::clone(&shared);
        shared.dispatcher.dispatch(Box::new(move || tick.advance(generation)));
    }

    tracing::trace!(generation, "animation loop exited");
}
