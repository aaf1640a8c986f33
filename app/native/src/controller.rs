//! Orchestration of set selection and playback.
//!
//! [`Engine`] wires the loader, the cadence runtime, the UI dispatcher and the
//! animator together. [`Controller`] sits on top of it and implements the
//! user-facing actions: picking a set, pausing, random mode and favorites.
//!
//! A selection runs in two phases. Frames are resolved on the blocking pool,
//! then applied on the UI context. Every request takes a ticket, and a
//! resolution whose ticket is no longer the latest is discarded, so rapid
//! switches always settle on the last request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak, mpsc};
use std::time::Duration;

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rayon::prelude::*;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::animation::{Animator, CadenceDriver, FrameSink};
use crate::assets::ResourceProvider;
use crate::config::ParrotBarConfig;
use crate::constants::{
    DEFAULT_SET_DISPLAY_NAME, DEFAULT_SET_NAME, FRAME_CADENCE, ICON_SIZE, RANDOM_MODE_INTERVAL,
};
use crate::error::ParrotBarError;
use crate::imaging::{Frame, Size};
use crate::platform::{Dispatcher, SerialQueue, run_sync};
use crate::sets::{FrameSequence, LoaderOptions, MenuEntry, SetKind, SetLoader, SetRegistry};

/// Tunables of an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub loader: LoaderOptions,
    /// Canvas of the frames handed to the sink.
    pub icon_size: Size,
    pub cadence: Duration,
    /// Static set used when a selection yields no frames.
    pub default_set: String,
    pub random_interval: Duration,
    /// Whether [`Controller::launch`] starts playback.
    pub animate_on_launch: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            loader: LoaderOptions::default(),
            icon_size: Size::square(ICON_SIZE),
            cadence: FRAME_CADENCE,
            default_set: DEFAULT_SET_NAME.to_string(),
            random_interval: RANDOM_MODE_INTERVAL,
            animate_on_launch: true,
        }
    }
}

impl From<&ParrotBarConfig> for EngineOptions {
    fn from(config: &ParrotBarConfig) -> Self {
        let default_set = if config.default_set.trim().is_empty() {
            DEFAULT_SET_NAME.to_string()
        } else {
            config.default_set.trim().to_string()
        };

        Self {
            loader: LoaderOptions {
                static_size: Size::square(config.static_frame_size),
                animated_size: Size::square(config.icon_size),
            },
            icon_size: Size::square(config.icon_size),
            cadence: FRAME_CADENCE,
            default_set,
            random_interval: Duration::from_secs(config.random_interval_secs.max(1)),
            animate_on_launch: config.animate_on_launch,
        }
    }
}

/// Loader, cadence runtime and animator, constructed once and shared.
pub struct Engine {
    loader: Arc<SetLoader>,
    // Dropped before `driver`, so the loop is cancelled while its runtime is still alive.
    animator: Animator,
    driver: CadenceDriver,
    dispatcher: Arc<dyn Dispatcher>,
    options: EngineOptions,
}

impl Engine {
    /// Creates an engine publishing on a dedicated `parrotbar-ui` queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the cadence thread cannot be started.
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        sink: Arc<dyn FrameSink>,
        options: EngineOptions,
    ) -> Result<Self, ParrotBarError> {
        let queue: Arc<dyn Dispatcher> = Arc::new(SerialQueue::new("ui"));
        Self::with_dispatcher(provider, sink, queue, options)
    }

    /// Creates an engine publishing through `dispatcher`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cadence thread cannot be started.
    pub fn with_dispatcher(
        provider: Arc<dyn ResourceProvider>,
        sink: Arc<dyn FrameSink>,
        dispatcher: Arc<dyn Dispatcher>,
        options: EngineOptions,
    ) -> Result<Self, ParrotBarError> {
        let driver = CadenceDriver::spawn()?;
        let loader = Arc::new(SetLoader::new(provider, options.loader));
        let animator = Animator::with_cadence(
            driver.handle().clone(),
            Arc::clone(&dispatcher),
            sink,
            options.cadence,
        );

        Ok(Self { loader, animator, driver, dispatcher, options })
    }

    #[must_use]
    pub const fn loader(&self) -> &Arc<SetLoader> { &self.loader }

    #[must_use]
    pub const fn animator(&self) -> &Animator { &self.animator }

    #[must_use]
    pub const fn runtime(&self) -> &Handle { self.driver.handle() }

    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<dyn Dispatcher> { &self.dispatcher }

    #[must_use]
    pub const fn options(&self) -> &EngineOptions { &self.options }
}

/// What a finished selection produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOutcome {
    /// Name shown for the set, `PartyParrot` after a fallback.
    pub name: String,
    pub kind: SetKind,
    pub frame_count: usize,
    pub fell_back: bool,
    /// `false` when a newer selection superseded this one before it was shown.
    pub applied: bool,
}

struct Request {
    ticket: u64,
    /// Tried in order. The default set is the last resort.
    candidates: Vec<(String, SetKind)>,
    resume: bool,
}

struct Resolved {
    ticket: u64,
    name: String,
    kind: SetKind,
    frames: FrameSequence,
    fell_back: bool,
    resume: bool,
}

impl Resolved {
    fn outcome(&self, applied: bool) -> SelectionOutcome {
        SelectionOutcome {
            name: self.name.clone(),
            kind: self.kind,
            frame_count: self.frames.len(),
            fell_back: self.fell_back,
            applied,
        }
    }
}

#[derive(Debug, Default)]
struct Selection {
    name: Option<String>,
    did_fallback: bool,
}

/// User-facing actions over an [`Engine`].
pub struct Controller {
    this: Weak<Controller>,
    engine: Engine,
    registry: SetRegistry,
    ticket: AtomicU64,
    selection: Mutex<Selection>,
    favorites: Mutex<Vec<String>>,
    random_mode: Mutex<Option<JoinHandle<()>>>,
}

impl Controller {
    /// Wraps `engine` and registers a selection command for every GIF in its bundle.
    #[must_use]
    pub fn new(engine: Engine) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let registry = SetRegistry::discover(engine.loader().provider().as_ref(), |name| {
                let this = this.clone();
                let name = name.to_string();
                Arc::new(move || {
                    if let Some(controller) = this.upgrade() {
                        controller.select_set(&name, SetKind::Animated);
                    }
                })
            });

            Self {
                this: this.clone(),
                engine,
                registry,
                ticket: AtomicU64::new(0),
                selection: Mutex::new(Selection::default()),
                favorites: Mutex::new(Vec::new()),
                random_mode: Mutex::new(None),
            }
        })
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine { &self.engine }

    #[must_use]
    pub const fn registry(&self) -> &SetRegistry { &self.registry }

    #[must_use]
    pub fn menu_entries(&self) -> Vec<MenuEntry> { self.registry.menu_entries() }

    fn request(&self, candidates: Vec<(String, SetKind)>, force_start: bool) -> Request {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let resume = force_start || self.engine.animator().is_running();
        Request { ticket, candidates, resume }
    }

    /// Shows the default static set, and starts playing it when
    /// `animate_on_launch` is set. Waits until it is on screen.
    ///
    /// Must not be called from the UI context or the cadence runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the cadence runtime or the UI context has shut down.
    pub fn launch(&self) -> Result<SelectionOutcome, ParrotBarError> {
        let options = self.engine.options();
        tracing::info!(
            set = %options.default_set,
            animate = options.animate_on_launch,
            "launching"
        );

        let candidates = vec![(options.default_set.clone(), SetKind::Static)];
        let request = self.request(candidates, options.animate_on_launch);
        self.submit_blocking(request)
    }

    /// Loads `name` in the background and shows it once ready.
    ///
    /// Playback resumes only if it was running when the request was made.
    pub fn select_set(&self, name: &str, kind: SetKind) {
        let request = self.request(vec![(name.to_string(), kind)], false);
        self.submit(request);
    }

    /// Like [`Self::select_set`], but waits until the selection has been applied.
    ///
    /// Must not be called from the UI context or the cadence runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the cadence runtime or the UI context has shut down.
    pub fn select_set_blocking(
        &self,
        name: &str,
        kind: SetKind,
    ) -> Result<SelectionOutcome, ParrotBarError> {
        let request = self.request(vec![(name.to_string(), kind)], false);
        self.submit_blocking(request)
    }

    /// Plays a favorite, trying it as a GIF first and then as a static set.
    pub fn select_favorite(&self, name: &str) {
        let candidates =
            vec![(name.to_string(), SetKind::Animated), (name.to_string(), SetKind::Static)];
        let request = self.request(candidates, false);
        self.submit(request);
    }

    /// Picks a random GIF set and starts playing it. Returns the chosen name.
    pub fn random_set(&self) -> Option<String> {
        let names = self.registry.names();
        let Some(name) = names.choose(&mut rand::rng()).cloned() else {
            tracing::warn!("no gif sets to choose from");
            return None;
        };

        tracing::debug!(set = %name, "random set chosen");
        let request = self.request(vec![(name.clone(), SetKind::Animated)], true);
        self.submit(request);
        Some(name)
    }

    /// Turns random mode on or off.
    ///
    /// While on, a random set is chosen immediately and then once per interval.
    pub fn set_random_mode(&self, enabled: bool) {
        let mut slot = self.random_mode.lock();

        if let Some(task) = slot.take() {
            task.abort();
        }

        if !enabled {
            tracing::debug!("random mode disabled");
            return;
        }

        let this = self.this.clone();
        let period = self.engine.options().random_interval;

        *slot = Some(self.engine.runtime().spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let Some(controller) = this.upgrade() else { break };
                controller.random_set();
            }
        }));

        tracing::debug!(interval = ?period, "random mode enabled");
    }

    #[must_use]
    pub fn is_random_mode(&self) -> bool { self.random_mode.lock().is_some() }

    /// Pauses a running animation or resumes a paused one. Returns the new state.
    pub fn toggle_animation(&self) -> bool {
        let Some(this) = self.this.upgrade() else {
            return false;
        };

        run_sync(self.engine.dispatcher().as_ref(), move || {
            let animator = this.engine.animator();
            if animator.is_running() {
                animator.stop();
            } else {
                animator.start();
            }
            animator.is_running()
        })
        .unwrap_or(false)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool { self.engine.animator().is_running() }

    /// Name of the set on screen, if any has been shown yet.
    #[must_use]
    pub fn current_set_name(&self) -> Option<String> { self.selection.lock().name.clone() }

    /// Whether the last applied selection fell back to the default set.
    #[must_use]
    pub fn did_fallback(&self) -> bool { self.selection.lock().did_fallback }

    /// Remembers the current set. Returns `false` if there is none or it is already a favorite.
    pub fn add_current_to_favorites(&self) -> bool {
        let Some(name) = self.current_set_name() else {
            return false;
        };

        let mut favorites = self.favorites.lock();
        if favorites.contains(&name) {
            return false;
        }

        tracing::debug!(set = %name, "added to favorites");
        favorites.push(name);
        true
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<String> { self.favorites.lock().clone() }

    pub fn clear_favorites(&self) { self.favorites.lock().clear(); }

    fn submit(&self, request: Request) {
        let Some(this) = self.this.upgrade() else {
            return;
        };

        self.engine.runtime().spawn(async move {
            let resolved = this.resolve(request).await;
            let dispatcher = Arc::clone(this.engine.dispatcher());
            dispatcher.dispatch(Box::new(move || {
                this.apply(&resolved);
            }));
        });
    }

    fn submit_blocking(&self, request: Request) -> Result<SelectionOutcome, ParrotBarError> {
        let this = self.this.upgrade().ok_or_else(|| {
            ParrotBarError::RuntimeError("controller is shutting down".to_string())
        })?;

        let (tx, rx) = mpsc::channel();
        let resolver = Arc::clone(&this);
        self.engine.runtime().spawn(async move {
            let _ = tx.send(resolver.resolve(request).await);
        });

        let resolved = rx.recv().map_err(|_| {
            ParrotBarError::RuntimeError("cadence runtime stopped during selection".to_string())
        })?;

        run_sync(self.engine.dispatcher().as_ref(), move || {
            let applied = this.apply(&resolved);
            resolved.outcome(applied)
        })
        .ok_or_else(|| ParrotBarError::RuntimeError("UI queue is closed".to_string()))
    }

    /// Loads the first candidate with frames, or the default set, and sizes it for display.
    async fn resolve(&self, request: Request) -> Resolved {
        let loader = self.engine.loader();
        let options = self.engine.options();

        let mut found = None;
        for (name, kind) in request.candidates {
            let frames = loader.load_async(name.clone(), kind).await;
            if !frames.is_empty() {
                found = Some((name, kind, frames));
                break;
            }
            tracing::debug!(set = %name, %kind, "set has no frames");
        }

        let (name, kind, frames, fell_back) = match found {
            Some((name, kind, frames)) => (name, kind, frames, false),
            None => {
                tracing::warn!(default = %options.default_set, "falling back to default set");
                let frames = loader.load_async(options.default_set.clone(), SetKind::Static).await;
                (options.default_set.clone(), SetKind::Static, frames, true)
            }
        };

        let frames = self.fit_for_display(frames, &name).await;
        let name = if fell_back { DEFAULT_SET_DISPLAY_NAME.to_string() } else { name };

        Resolved {
            ticket: request.ticket,
            name,
            kind,
            frames,
            fell_back,
            resume: request.resume,
        }
    }

    /// Fits `frames` into the icon canvas unless the loader already did.
    async fn fit_for_display(&self, frames: FrameSequence, name: &str) -> FrameSequence {
        let target = self.engine.options().icon_size;
        if frames.is_empty() || frames.canvas() == Some(target) {
            return frames;
        }

        let resizer = self.engine.loader().resizer().clone();
        let name = name.to_string();
        let source = frames.clone();

        let task = tokio::task::spawn_blocking(move || {
            let resized: Vec<Frame> =
                source.frames().par_iter().map(|frame| resizer.resize(frame, target, &name)).collect();
            FrameSequence::normalized(resized, target)
        });

        match task.await {
            Ok(resized) => resized,
            Err(err) => {
                tracing::error!(error = %err, "display resize failed, showing frames as loaded");
                frames
            }
        }
    }

    /// Shows a resolved selection. Runs on the UI context.
    fn apply(&self, resolved: &Resolved) -> bool {
        let latest = self.ticket.load(Ordering::SeqCst);
        if resolved.ticket != latest {
            tracing::debug!(
                set = %resolved.name,
                ticket = resolved.ticket,
                latest,
                "discarding superseded selection"
            );
            return false;
        }

        let animator = self.engine.animator();
        animator.stop();
        animator.replace_sequence(resolved.frames.clone());
        if resolved.resume {
            animator.start();
        }

        let mut selection = self.selection.lock();
        selection.name = Some(resolved.name.clone());
        selection.did_fallback = resolved.fell_back;

        tracing::info!(
            set = %resolved.name,
            kind = %resolved.kind,
            frames = resolved.frames.len(),
            fell_back = resolved.fell_back,
            "set selected"
        );
        true
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(task) = self.random_mode.get_mut().take() {
            task.abort();
        }
    }
}
