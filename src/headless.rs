// SPDX-License-Identifier: MPL-2.0
//! Deterministic host services.
//!
//! Every outbound trait has an in-memory implementation here: monospace text
//! measurement, a clipboard that remembers what was copied, a single fake
//! display, and an animator and scheduler that share one virtual clock.
//! [`Headless`] wires them into an [`Overlay`] and lets tests, benches and
//! tools drive time explicitly.

use crate::appearance::Environment;
use crate::card::{CardId, Label};
use crate::config::{Config, SharedConfig, WindowLevel};
use crate::icon::Icon;
use crate::message::Message;
use crate::overlay::Overlay;
use crate::platform::{
    Animation, AnimationId, Animator, Clipboard, DisplayProvider, DisplayTarget, Host, Measure,
    Scheduler, TargetId, TimerToken,
};
use crate::surface::{OverlaySurface, PointerOutcome};
use iced_core::{Padding, Point, Rectangle, Size};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

// ==========================================================================
// Measurement
// ==========================================================================

/// Measures text as if every glyph had the same advance.
///
/// Each paragraph wraps at `floor(max_width / advance)` characters; the line
/// count is capped by the style's `max_lines` (zero means unlimited) and each
/// line is one `line_height_px` tall.
#[derive(Debug, Default)]
pub struct MonospaceMeasure {
    label_calls: Cell<usize>,
}

impl MonospaceMeasure {
    /// Number of label measurements performed so far.
    #[must_use]
    pub fn label_calls(&self) -> usize {
        self.label_calls.get()
    }
}

impl Measure for MonospaceMeasure {
    fn label_height(&self, label: &Label, max_width: f32) -> f32 {
        self.label_calls.set(self.label_calls.get() + 1);

        let style = label.style();
        if label.content().is_empty() {
            return 0.0;
        }

        let advance = style.size * GLYPH_WIDTH_RATIO;
        let per_line = ((max_width / advance).floor() as usize).max(1);
        let mut lines: usize = label
            .content()
            .split('\n')
            .map(|paragraph| paragraph.chars().count().div_ceil(per_line).max(1))
            .sum();
        if style.max_lines > 0 {
            lines = lines.min(style.max_lines);
        }

        lines as f32 * style.line_height_px()
    }

    fn icon_size(&self, icon: &Icon) -> Size {
        icon.size_hint().unwrap_or(Size::ZERO)
    }
}

// ==========================================================================
// Clipboard
// ==========================================================================

/// Clipboard that keeps the last copied text. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: String) {
        *self.contents.borrow_mut() = Some(text);
    }
}

// ==========================================================================
// Display
// ==========================================================================

/// Id of the application window [`HeadlessDisplay`] reports as active.
pub const PARENT_TARGET: TargetId = TargetId(1);

#[derive(Debug)]
struct DisplayState {
    parent: DisplayTarget,
    available: bool,
    next_overlay: u64,
    open: Option<DisplayTarget>,
    opened: usize,
    closed: usize,
    level: Option<WindowLevel>,
}

/// One application window; overlays cover it exactly. Clones share state.
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<DisplayState>>,
}

impl HeadlessDisplay {
    #[must_use]
    pub fn new(bounds: Rectangle, safe_area: Padding) -> Self {
        Self {
            state: Rc::new(RefCell::new(DisplayState {
                parent: DisplayTarget {
                    id: PARENT_TARGET,
                    bounds,
                    safe_area,
                },
                available: true,
                next_overlay: PARENT_TARGET.0 + 1,
                open: None,
                opened: 0,
                closed: 0,
                level: None,
            })),
        }
    }

    /// Makes `active_target` report nothing, like an app in the background.
    pub fn set_available(&self, available: bool) {
        self.state.borrow_mut().available = available;
    }

    /// Changes the application window and returns the matching overlay target,
    /// if one is open.
    pub fn resize(&self, bounds: Rectangle, safe_area: Padding) -> Option<DisplayTarget> {
        let mut state = self.state.borrow_mut();
        state.parent.bounds = bounds;
        state.parent.safe_area = safe_area;
        let parent = state.parent;
        state.open.as_mut().map(|overlay| {
            overlay.bounds = parent.bounds;
            overlay.safe_area = parent.safe_area;
            *overlay
        })
    }

    #[must_use]
    pub fn parent(&self) -> DisplayTarget {
        self.state.borrow().parent
    }

    /// The overlay window currently open, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<DisplayTarget> {
        self.state.borrow().open
    }

    #[must_use]
    pub fn opened(&self) -> usize {
        self.state.borrow().opened
    }

    #[must_use]
    pub fn closed(&self) -> usize {
        self.state.borrow().closed
    }

    /// Level requested for the most recent overlay window.
    #[must_use]
    pub fn level(&self) -> Option<WindowLevel> {
        self.state.borrow().level
    }
}

impl DisplayProvider for HeadlessDisplay {
    fn active_target(&self) -> Option<DisplayTarget> {
        let state = self.state.borrow();
        state.available.then_some(state.parent)
    }

    fn open_overlay(&mut self, parent: &DisplayTarget, level: WindowLevel) -> Option<DisplayTarget> {
        let mut state = self.state.borrow_mut();
        if !state.available {
            return None;
        }

        let overlay = DisplayTarget {
            id: TargetId(state.next_overlay),
            bounds: parent.bounds,
            safe_area: parent.safe_area,
        };
        state.next_overlay += 1;
        state.open = Some(overlay);
        state.opened += 1;
        state.level = Some(level);
        Some(overlay)
    }

    fn close_overlay(&mut self, overlay: TargetId) {
        let mut state = self.state.borrow_mut();
        if state.open.is_some_and(|open| open.id == overlay) {
            state.open = None;
            state.closed += 1;
        }
    }

    fn convert_point(&self, point: Point, from: TargetId, to: TargetId) -> Point {
        let state = self.state.borrow();
        let origin = |id: TargetId| {
            if id == state.parent.id {
                Some(state.parent.bounds.position())
            } else {
                state
                    .open
                    .filter(|open| open.id == id)
                    .map(|open| open.bounds.position())
            }
        };

        match (origin(from), origin(to)) {
            (Some(from), Some(to)) => Point::new(point.x + from.x - to.x, point.y + from.y - to.y),
            _ => point,
        }
    }
}

// ==========================================================================
// Virtual clock
// ==========================================================================

#[derive(Debug, Clone)]
enum Due {
    Animation(Animation),
    Timer(TimerToken),
}

#[derive(Debug, Default)]
struct ClockState {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), Due>,
}

impl ClockState {
    fn push(&mut self, delay: Duration, due: Due) {
        let key = (self.now.saturating_add(delay), self.seq);
        self.seq += 1;
        self.queue.insert(key, due);
    }
}

/// Shared virtual time for [`RecordingAnimator`] and [`ManualScheduler`].
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    state: Rc<RefCell<ClockState>>,
}

impl VirtualClock {
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Animations requested and not yet finished, in request order.
    #[must_use]
    pub fn pending_animations(&self) -> Vec<Animation> {
        let state = self.state.borrow();
        let mut animations: Vec<Animation> = state
            .queue
            .values()
            .filter_map(|due| match due {
                Due::Animation(animation) => Some(animation.clone()),
                Due::Timer(_) => None,
            })
            .collect();
        animations.sort_by_key(|animation| animation.id);
        animations
    }

    /// Timers scheduled and not yet fired, with their deadlines.
    #[must_use]
    pub fn pending_timers(&self) -> Vec<(Duration, TimerToken)> {
        self.state
            .borrow()
            .queue
            .iter()
            .filter_map(|((deadline, _), due)| match due {
                Due::Timer(token) => Some((*deadline, *token)),
                Due::Animation(_) => None,
            })
            .collect()
    }

    fn next_animation_deadline(&self) -> Option<Duration> {
        self.state
            .borrow()
            .queue
            .iter()
            .find(|(_, due)| matches!(due, Due::Animation(_)))
            .map(|((deadline, _), _)| *deadline)
    }

    /// Removes the earliest entry due at or before `until` and moves the clock
    /// to its deadline.
    fn pop_due(&self, until: Duration) -> Option<Due> {
        let mut state = self.state.borrow_mut();
        let key = *state.queue.keys().next()?;
        if key.0 > until {
            return None;
        }
        state.now = key.0;
        state.queue.remove(&key)
    }

    fn set_now(&self, now: Duration) {
        let mut state = self.state.borrow_mut();
        state.now = state.now.max(now);
    }
}

/// Animator that completes every animation after its duration on the
/// virtual clock.
#[derive(Debug, Clone)]
pub struct RecordingAnimator {
    clock: VirtualClock,
    started: Rc<RefCell<Vec<Animation>>>,
}

impl RecordingAnimator {
    #[must_use]
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            started: Rc::default(),
        }
    }

    /// Every animation ever requested, in request order.
    #[must_use]
    pub fn started(&self) -> Vec<Animation> {
        self.started.borrow().clone()
    }
}

impl Animator for RecordingAnimator {
    fn animate(&mut self, animation: Animation) {
        tracing::trace!(id = ?animation.id, kind = ?animation.kind, "animation started");
        self.started.borrow_mut().push(animation.clone());
        self.clock
            .state
            .borrow_mut()
            .push(animation.duration, Due::Animation(animation));
    }
}

/// Scheduler that fires timers when the virtual clock passes their deadline.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: VirtualClock,
}

impl ManualScheduler {
    #[must_use]
    pub fn new(clock: VirtualClock) -> Self {
        Self { clock }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.clock.state.borrow_mut().push(delay, Due::Timer(token));
    }
}

// ==========================================================================
// Harness
// ==========================================================================

/// An [`Overlay`] wired to headless services and driven by virtual time.
#[derive(Debug)]
pub struct Headless {
    overlay: Overlay,
    clock: VirtualClock,
    animator: RecordingAnimator,
    display: HeadlessDisplay,
    clipboard: MemoryClipboard,
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl Headless {
    /// A phone-sized window without safe-area insets and the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bounds(Rectangle::new(Point::ORIGIN, Size::new(390.0, 844.0)), Padding::ZERO)
    }

    #[must_use]
    pub fn with_bounds(bounds: Rectangle, safe_area: Padding) -> Self {
        Self::build(bounds, safe_area, SharedConfig::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::build(
            Rectangle::new(Point::ORIGIN, Size::new(390.0, 844.0)),
            Padding::ZERO,
            SharedConfig::new(config),
        )
    }

    /// Fully specified harness.
    #[must_use]
    pub fn build(bounds: Rectangle, safe_area: Padding, config: SharedConfig) -> Self {
        let clock = VirtualClock::default();
        let animator = RecordingAnimator::new(clock.clone());
        let display = HeadlessDisplay::new(bounds, safe_area);
        let clipboard = MemoryClipboard::default();

        let host = Host {
            measure: Box::new(MonospaceMeasure::default()),
            display: Box::new(display.clone()),
            clipboard: Box::new(clipboard.clone()),
            animator: Box::new(animator.clone()),
            scheduler: Box::new(ManualScheduler::new(clock.clone())),
        };

        Self {
            overlay: Overlay::new(config, host),
            clock,
            animator,
            display,
            clipboard,
        }
    }

    pub fn show(&mut self, message: Message) -> Option<CardId> {
        self.overlay.show(message)
    }

    /// Taps `point` in application window coordinates.
    pub fn tap(&mut self, point: Point) -> PointerOutcome {
        self.overlay.pointer_down(point, PARENT_TARGET)
    }

    /// Dismisses cards programmatically.
    pub fn remove(&mut self, cards: &[CardId]) {
        for card in cards {
            self.overlay.dismiss(*card);
        }
    }

    pub fn environment_changed(&mut self, environment: Environment) {
        self.overlay.environment_changed(environment);
    }

    /// Resizes the application window and the overlay with it.
    pub fn resize(&mut self, bounds: Rectangle, safe_area: Padding) {
        if let Some(target) = self.display.resize(bounds, safe_area) {
            self.overlay.resized(target);
        }
    }

    /// Moves virtual time forward, delivering every completion and timer due on
    /// the way in deadline order.
    pub fn advance(&mut self, by: Duration) {
        let until = self.clock.now().saturating_add(by);
        while let Some(due) = self.clock.pop_due(until) {
            match due {
                Due::Animation(animation) => self.overlay.animation_finished(animation.id),
                Due::Timer(token) => self.overlay.timer_fired(token),
            }
        }
        self.clock.set_now(until);
    }

    /// Advances until no animation is running. Timers due before then fire too.
    pub fn settle(&mut self) {
        while let Some(deadline) = self.clock.next_animation_deadline() {
            let by = deadline.saturating_sub(self.clock.now());
            self.advance(by);
        }
    }

    /// Finishes one animation immediately, without moving the clock.
    pub fn finish(&mut self, animation: AnimationId) {
        let removed = {
            let mut state = self.clock.state.borrow_mut();
            let key = state
                .queue
                .iter()
                .find(|(_, due)| matches!(due, Due::Animation(a) if a.id == animation))
                .map(|(key, _)| *key);
            key.and_then(|key| state.queue.remove(&key))
        };
        if removed.is_some() {
            self.overlay.animation_finished(animation);
        }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn pending_animations(&self) -> Vec<Animation> {
        self.clock.pending_animations()
    }

    #[must_use]
    pub fn pending_timers(&self) -> Vec<(Duration, TimerToken)> {
        self.clock.pending_timers()
    }

    /// Every animation requested since the harness was built.
    #[must_use]
    pub fn started_animations(&self) -> Vec<Animation> {
        self.animator.started()
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut Overlay {
        &mut self.overlay
    }

    #[must_use]
    pub fn surface(&self) -> Option<&OverlaySurface> {
        self.overlay.surface()
    }

    #[must_use]
    pub fn display(&self) -> &HeadlessDisplay {
        &self.display
    }

    #[must_use]
    pub fn clipboard(&self) -> &MemoryClipboard {
        &self.clipboard
    }

    #[must_use]
    pub fn windows_opened(&self) -> usize {
        self.display.opened()
    }

    #[must_use]
    pub fn windows_closed(&self) -> usize {
        self.display.closed()
    }
}
