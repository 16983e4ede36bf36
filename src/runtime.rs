// SPDX-License-Identifier: MPL-2.0
//! Main-thread event loop.
//!
//! [`Runtime`] owns the [`Overlay`] and drives it from a tokio channel. A
//! [`Handle`] is cheap to clone and `Send`; any thread can post messages through
//! it without blocking. Animations and timeouts are played on the tokio timer
//! and report back through the same channel.
//!
//! The overlay holds host services that are usually not `Send`, so the runtime
//! is meant to run on the thread that owns the UI, inside a
//! [`tokio::task::LocalSet`] or a current-thread `block_on`.
//!
//! ```ignore
//! let (runtime, handle) = Runtime::new(config::global().clone(), measure, display, clipboard);
//! toast_overlay::install(handle);
//! local.spawn_local(runtime.run());
//!
//! toast_overlay::info("Saved", "All changes stored");
//! ```

use crate::appearance::Environment;
use crate::card::CardId;
use crate::config::SharedConfig;
use crate::message::Message;
use crate::overlay::{Event, Overlay};
use crate::platform::{
    Animation, Animator, Clipboard, DisplayProvider, DisplayTarget, Host, Measure, Scheduler,
    TargetId, TimerToken,
};
use crate::surface::PointerOutcome;
use iced_core::Point;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Requests posted to the runtime.
#[derive(Debug)]
enum Command {
    Event(Event),
    PointerDown {
        point: Point,
        target: TargetId,
        reply: oneshot::Sender<PointerOutcome>,
    },
    Shutdown,
}

/// Posts requests to a running [`Runtime`].
///
/// Posting never blocks. Once the runtime has stopped, posts are dropped.
#[derive(Debug, Clone)]
pub struct Handle {
    sender: mpsc::UnboundedSender<Command>,
    config: SharedConfig,
}

impl Handle {
    pub fn show(&self, message: Message) {
        self.post(Command::Event(Event::Show(message)));
    }

    /// Shows a message in the info scheme.
    pub fn info(&self, title: impl Into<String>, text: impl Into<String>) {
        self.show(Message::info(&self.config.snapshot(), title, text));
    }

    /// Shows a message in the error scheme.
    pub fn error(&self, title: impl Into<String>, text: impl Into<String>) {
        self.show(Message::error(&self.config.snapshot(), title, text));
    }

    /// Like [`Handle::info`], letting `customize` override the scheme's
    /// defaults before the message is posted.
    ///
    /// ```ignore
    /// handle.info_with("Copied", path, |message| message.without_timeout());
    /// ```
    pub fn info_with(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        customize: impl FnOnce(Message) -> Message,
    ) {
        self.show(customize(Message::info(&self.config.snapshot(), title, text)));
    }

    /// Like [`Handle::error`], with the same override hook as [`Handle::info_with`].
    pub fn error_with(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        customize: impl FnOnce(Message) -> Message,
    ) {
        self.show(customize(Message::error(&self.config.snapshot(), title, text)));
    }

    /// Forwards a pointer-down; the receiver yields whether a card consumed it.
    ///
    /// The receiver reports an error if the runtime stopped first.
    pub fn pointer_down(&self, point: Point, target: TargetId) -> oneshot::Receiver<PointerOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.post(Command::PointerDown {
            point,
            target,
            reply,
        });
        outcome
    }

    pub fn dismiss(&self, card: CardId) {
        self.post(Command::Event(Event::Dismiss(card)));
    }

    pub fn dismiss_all(&self) {
        self.post(Command::Event(Event::DismissAll));
    }

    pub fn environment_changed(&self, environment: Environment) {
        self.post(Command::Event(Event::EnvironmentChanged(environment)));
    }

    pub fn resized(&self, target: DisplayTarget) {
        self.post(Command::Event(Event::Resized(target)));
    }

    /// Stops the runtime after the requests already posted.
    pub fn shutdown(&self) {
        self.post(Command::Shutdown);
    }

    /// Whether the runtime has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Configuration used by [`Handle::info`] and [`Handle::error`].
    #[must_use]
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    fn post(&self, command: Command) {
        // A stopped runtime has nothing left to show
        let _ = self.sender.send(command);
    }
}

/// Plays animations on the tokio timer.
///
/// Holds a weak sender so pending animations do not keep the runtime alive.
#[derive(Debug)]
struct TokioAnimator {
    sender: mpsc::WeakUnboundedSender<Command>,
}

impl Animator for TokioAnimator {
    fn animate(&mut self, animation: Animation) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(animation.duration).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(Command::Event(Event::AnimationFinished(animation.id)));
            }
        });
    }
}

#[derive(Debug)]
struct TokioScheduler {
    sender: mpsc::WeakUnboundedSender<Command>,
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(Command::Event(Event::TimerFired(token)));
            }
        });
    }
}

type Observer = Box<dyn FnMut(&Overlay)>;

/// Owns the overlay and processes posted requests in order.
pub struct Runtime {
    overlay: Overlay,
    receiver: mpsc::UnboundedReceiver<Command>,
    observer: Option<Observer>,
}

impl Runtime {
    /// Creates a runtime using the host's measurement, display and clipboard.
    /// Animations and timers run on tokio.
    pub fn new(
        config: SharedConfig,
        measure: impl Measure + 'static,
        display: impl DisplayProvider + 'static,
        clipboard: impl Clipboard + 'static,
    ) -> (Self, Handle) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let host = Host {
            measure: Box::new(measure),
            display: Box::new(display),
            clipboard: Box::new(clipboard),
            animator: Box::new(TokioAnimator {
                sender: sender.downgrade(),
            }),
            scheduler: Box::new(TokioScheduler {
                sender: sender.downgrade(),
            }),
        };

        let runtime = Self {
            overlay: Overlay::new(config.clone(), host),
            receiver,
            observer: None,
        };
        (runtime, Handle { sender, config })
    }

    /// Calls `observer` after every processed request, typically to redraw.
    #[must_use]
    pub fn with_observer(mut self, observer: impl FnMut(&Overlay) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Processes requests until [`Handle::shutdown`] is called or every
    /// handle is dropped.
    pub async fn run(mut self) {
        tracing::debug!("toast runtime started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                Command::Event(event) => {
                    self.overlay.handle(event);
                }
                Command::PointerDown {
                    point,
                    target,
                    reply,
                } => {
                    let outcome = self.overlay.pointer_down(point, target);
                    // The caller may not care about the outcome
                    let _ = reply.send(outcome);
                }
                Command::Shutdown => break,
            }

            if let Some(observer) = self.observer.as_mut() {
                observer(&self.overlay);
            }
        }

        tracing::debug!("toast runtime stopped");
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("overlay", &self.overlay)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

// ==========================================================================
// Process-wide handle
// ==========================================================================

static INSTALLED: OnceLock<Handle> = OnceLock::new();

/// Registers the handle used by [`show`], [`info`] and [`error`].
///
/// Returns `false` if a handle was already installed; the first one stays.
pub fn install(handle: Handle) -> bool {
    INSTALLED.set(handle).is_ok()
}

/// The installed handle, if any.
#[must_use]
pub fn installed() -> Option<&'static Handle> {
    INSTALLED.get()
}

/// Shows `message` through the installed handle. Dropped if none is installed.
pub fn show(message: Message) {
    match INSTALLED.get() {
        Some(handle) => handle.show(message),
        None => tracing::debug!(title = message.title(), "no toast runtime installed"),
    }
}

/// Shows an info message through the installed handle.
pub fn info(title: impl Into<String>, text: impl Into<String>) {
    if let Some(handle) = INSTALLED.get() {
        handle.info(title, text);
    }
}

/// Shows an error message through the installed handle.
pub fn error(title: impl Into<String>, text: impl Into<String>) {
    if let Some(handle) = INSTALLED.get() {
        handle.error(title, text);
    }
}

/// Shows an info message through the installed handle after `customize` has
/// applied per-call overrides such as a timeout or tap action.
pub fn info_with(
    title: impl Into<String>,
    text: impl Into<String>,
    customize: impl FnOnce(Message) -> Message,
) {
    if let Some(handle) = INSTALLED.get() {
        handle.info_with(title, text, customize);
    }
}

/// Error-scheme counterpart of [`info_with`].
pub fn error_with(
    title: impl Into<String>,
    text: impl Into<String>,
    customize: impl FnOnce(Message) -> Message,
) {
    if let Some(handle) = INSTALLED.get() {
        handle.error_with(title, text, customize);
    }
}
