// SPDX-License-Identifier: MPL-2.0
//! Boundary to the host platform.
//!
//! The overlay never talks to a windowing system, text engine or animation
//! engine directly. Hosts implement the traits in this module and hand them to
//! the overlay bundled in a [`Host`]. Animations and timers are fire-and-forget:
//! the overlay describes what should happen and the host reports completion
//! later by feeding [`AnimationId`]s and [`TimerToken`]s back in.

use crate::card::{CardId, Label};
use crate::config::WindowLevel;
use crate::icon::Icon;
use iced_core::{Padding, Point, Rectangle, Size};
use std::time::Duration;

/// Identifies a display target (a screen, scene or window) of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// A region the host can draw into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTarget {
    pub id: TargetId,
    pub bounds: Rectangle,
    /// Area obscured by system chrome (status bar, notch, home indicator).
    pub safe_area: Padding,
}

/// Text and image measurement.
pub trait Measure {
    /// Height `label` occupies when wrapped at `max_width`.
    fn label_height(&self, label: &Label, max_width: f32) -> f32;

    /// Intrinsic size of `icon`.
    fn icon_size(&self, icon: &Icon) -> Size;
}

/// Access to the host's windows.
pub trait DisplayProvider {
    /// The foreground display target, if the application currently has one.
    fn active_target(&self) -> Option<DisplayTarget>;

    /// Opens an always-on-top, input-transparent window over `parent`.
    ///
    /// Only points the overlay claims in [`crate::Overlay::pointer_down`] are
    /// consumed; every other event must reach the windows below.
    fn open_overlay(&mut self, parent: &DisplayTarget, level: WindowLevel)
        -> Option<DisplayTarget>;

    /// Releases a window opened by [`DisplayProvider::open_overlay`].
    fn close_overlay(&mut self, overlay: TargetId);

    /// Converts `point` from the coordinate space of `from` into that of `to`.
    fn convert_point(&self, point: Point, from: TargetId, to: TargetId) -> Point;
}

/// System pasteboard.
pub trait Clipboard {
    fn set_text(&mut self, text: String);
}

/// Animation engine.
///
/// The overlay updates its model (frames, opacity, colors) first and then asks
/// for an animation; the host interpolates from what is on screen to the model
/// and reports [`crate::Event::AnimationFinished`] with the same id when done.
pub trait Animator {
    fn animate(&mut self, animation: Animation);
}

/// Deferred task queue on the main thread.
pub trait Scheduler {
    /// Reports [`crate::Event::TimerFired`] with `token` after `delay`.
    fn schedule(&mut self, delay: Duration, token: TimerToken);
}

/// The host services an overlay needs.
pub struct Host {
    pub measure: Box<dyn Measure>,
    pub display: Box<dyn DisplayProvider>,
    pub clipboard: Box<dyn Clipboard>,
    pub animator: Box<dyn Animator>,
    pub scheduler: Box<dyn Scheduler>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// Unique identifier of a requested animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Creates a new unique animation ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    EaseOut,
    EaseInOut,
}

impl Curve {
    /// Maps linear progress in `0.0..=1.0` onto the curve.
    #[must_use]
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::EaseInOut if t < 0.5 => 2.0 * t * t,
            Curve::EaseInOut => 1.0 - (2.0 - 2.0 * t) * (2.0 - 2.0 * t) / 2.0,
        }
    }
}

/// What an animation transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationKind {
    /// Card frames moved to a new stack layout.
    Layout,
    /// Cards fade to zero opacity before removal.
    FadeOut(Vec<CardId>),
    /// A tapped card flashes its touched color.
    Flash(CardId),
}

/// A transition the host should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub id: AnimationId,
    pub duration: Duration,
    pub curve: Curve,
    /// Touches keep reaching the cards while the animation runs.
    pub allows_interaction: bool,
    pub kind: AnimationKind,
}

/// Identifies a scheduled auto-dismiss.
///
/// A token only resolves while its card is alive and its generation matches
/// the card's current one; re-showing a card bumps the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub card: CardId,
    pub generation: u64,
}
