// SPDX-License-Identifier: MPL-2.0
//! The overlay surface: a vertical stack of cards inside one overlay window.
//!
//! The surface is the only writer of its card sequence. Cards are laid out
//! top-to-bottom in arrival order; a separate z-order decides which card a
//! touch reaches first (most recently shown or re-shown on top).
//!
//! Every removal (timeout, tap, background tap) goes through [`OverlaySurface::remove`]:
//! the cards fade out, are detached when the fade completes, and the remaining
//! cards slide into place. When nothing remains the surface reports
//! [`Status::Empty`] and its owner releases it.

use crate::appearance::Environment;
use crate::card::{CardId, CardState, MessageCard};
use crate::config::Config;
use crate::geometry::{ceil, contains_rect, hit, inset, rect, snap};
use crate::message::Message;
use crate::platform::{
    Animation, AnimationId, AnimationKind, Curve, DisplayTarget, Host, TimerToken,
};
use iced_core::{Point, Rectangle, Size};
use std::collections::HashMap;

/// Configuration snapshot and host services for one operation.
pub(crate) struct Cx<'a> {
    pub config: &'a Config,
    pub host: &'a mut Host,
}

/// Result of hit-testing a point against the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Card(CardId),
    Background,
}

/// What happened to a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The touch landed on a card and must not reach the windows below.
    Consumed(CardId),
    /// The touch missed every card and continues to the host's windows.
    PassThrough,
}

/// Whether the surface still holds cards after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Live,
    Empty,
}

#[derive(Debug, Clone)]
enum Completion {
    Layout,
    Flash(CardId),
    FadeOut(Vec<CardId>),
}

/// The stack of visible cards.
#[derive(Debug)]
pub struct OverlaySurface {
    window: DisplayTarget,
    environment: Environment,
    /// Arrival order, which is also layout order.
    cards: Vec<MessageCard>,
    /// Back-to-front; the last id is hit-tested first.
    z_order: Vec<CardId>,
    pending: HashMap<AnimationId, Completion>,
}

impl OverlaySurface {
    pub(crate) fn new(window: DisplayTarget, environment: Environment) -> Self {
        Self {
            window,
            environment,
            cards: Vec::new(),
            z_order: Vec::new(),
            pending: HashMap::new(),
        }
    }

    /// The overlay window this surface draws into.
    #[must_use]
    pub fn window(&self) -> &DisplayTarget {
        &self.window
    }

    /// Cards in arrival (top-to-bottom) order.
    #[must_use]
    pub fn cards(&self) -> &[MessageCard] {
        &self.cards
    }

    /// Cards back-to-front, the order a renderer should paint them in.
    pub fn paint_order(&self) -> impl Iterator<Item = &MessageCard> {
        self.z_order.iter().filter_map(|id| self.card(*id))
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&MessageCard> {
        self.cards.iter().find(|card| card.id() == id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut MessageCard> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Region cards are stacked in: window bounds minus safe area minus insets.
    #[must_use]
    pub fn content_rect(&self, config: &Config) -> Rectangle {
        inset(
            inset(self.window.bounds, self.window.safe_area),
            config.insets,
        )
    }

    /// Whether `card` lies entirely inside the window and is not entering.
    #[must_use]
    pub fn is_settled(&self, card: &MessageCard) -> bool {
        !card.is_entering() && contains_rect(self.window.bounds, card.frame())
    }

    fn card_width(&self, config: &Config) -> (f32, f32) {
        let content = self.content_rect(config);
        let width = content.width.min(config.max_width);
        (content.x + (content.width - width) / 2.0, width)
    }

    // ======================================================================
    // Showing
    // ======================================================================

    /// Shows `message`, merging it into an identical card if one is visible.
    ///
    /// Returns the id of the card now displaying the message.
    pub(crate) fn show(&mut self, message: Message, cx: &mut Cx<'_>) -> CardId {
        let timeout = message.timeout();
        let mut card = MessageCard::new(message, cx.config, self.environment);

        let duplicate = self
            .cards
            .iter_mut()
            .find(|existing| existing.state() == CardState::Idle && existing.is_duplicate_of(&card))
            .map(|existing| (existing.id(), existing.refresh_timeout()));

        if let Some((id, generation)) = duplicate {
            tracing::debug!(card = ?id, "toast already visible, refreshing");
            self.bring_to_front(id);
            self.animate_layout(cx, None);
            self.schedule_timeout(id, generation, timeout, cx);
            return id;
        }

        // Start just above the window so the layout pass slides the card in.
        let (x, width) = self.card_width(cx.config);
        let height = card.measure_height(width, cx.host.measure.as_ref());
        card.set_frame(rect(x, self.window.bounds.y - height, Size::new(width, height)));

        let id = card.id();
        let generation = card.timeout_generation();
        tracing::debug!(card = ?id, title = card.title().content(), "showing toast");

        self.cards.push(card);
        self.z_order.push(id);
        self.animate_layout(cx, Some(id));
        self.schedule_timeout(id, generation, timeout, cx);
        id
    }

    fn bring_to_front(&mut self, id: CardId) {
        self.z_order.retain(|other| *other != id);
        self.z_order.push(id);
    }

    fn schedule_timeout(
        &self,
        card: CardId,
        generation: u64,
        timeout: Option<std::time::Duration>,
        cx: &mut Cx<'_>,
    ) {
        if let Some(timeout) = timeout {
            cx.host.scheduler.schedule(
                timeout.saturating_add(cx.config.animation.timeout_grace),
                TimerToken { card, generation },
            );
        }
    }

    // ======================================================================
    // Layout
    // ======================================================================

    /// Positions every card without animating.
    pub(crate) fn layout(&mut self, cx: &mut Cx<'_>) {
        let (x, width) = self.card_width(cx.config);
        let gap = ceil(cx.config.spacing);
        let mut top = self.content_rect(cx.config).y;

        for card in &mut self.cards {
            let height = card.measure_height(width, cx.host.measure.as_ref());
            let frame = snap(rect(x, top, Size::new(width, height)));
            card.set_frame(frame);
            top += frame.height + gap;
        }
    }

    /// Lays out and animates the change. Cards still entering, plus `newcomer`,
    /// stay "entering" until this animation completes.
    fn animate_layout(&mut self, cx: &mut Cx<'_>, newcomer: Option<CardId>) {
        self.layout(cx);

        let curve = if newcomer.is_some() {
            Curve::EaseOut
        } else {
            Curve::EaseInOut
        };
        let animation = self.start(AnimationKind::Layout, Completion::Layout, curve, cx);

        for card in &mut self.cards {
            if card.is_entering() || Some(card.id()) == newcomer {
                card.set_entering(Some(animation));
            }
        }
    }

    fn start(
        &mut self,
        kind: AnimationKind,
        completion: Completion,
        curve: Curve,
        cx: &mut Cx<'_>,
    ) -> AnimationId {
        let id = AnimationId::new();
        self.pending.insert(id, completion);
        cx.host.animator.animate(Animation {
            id,
            duration: cx.config.animation.transition,
            curve,
            allows_interaction: true,
            kind,
        });
        id
    }

    // ======================================================================
    // Touches
    // ======================================================================

    /// Finds the front-most card under `point` (overlay coordinates).
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Hit {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.card(*id))
            .find(|card| hit(card.frame(), point))
            .map_or(Hit::Background, |card| Hit::Card(card.id()))
    }

    /// Handles a pointer-down at `point` (overlay coordinates).
    ///
    /// A touched card runs its tap behavior and flashes before removal. A touch
    /// on empty space dismisses every settled card and passes through.
    pub(crate) fn pointer_down(&mut self, point: Point, cx: &mut Cx<'_>) -> PointerOutcome {
        match self.hit_test(point) {
            Hit::Card(id) => {
                let pressed = self
                    .card_mut(id)
                    .is_some_and(|card| card.press(cx.host.clipboard.as_mut()));
                if pressed {
                    tracing::debug!(card = ?id, "toast tapped");
                    self.start(
                        AnimationKind::Flash(id),
                        Completion::Flash(id),
                        Curve::EaseInOut,
                        cx,
                    );
                }
                PointerOutcome::Consumed(id)
            }
            Hit::Background => {
                self.remove_settled(cx);
                PointerOutcome::PassThrough
            }
        }
    }

    fn remove_settled(&mut self, cx: &mut Cx<'_>) {
        let settled: Vec<CardId> = self
            .cards
            .iter()
            .filter(|card| self.is_settled(card))
            .map(MessageCard::id)
            .collect();
        self.remove(&settled, cx);
    }

    // ======================================================================
    // Removal
    // ======================================================================

    /// Fades out and then detaches the given cards.
    ///
    /// Ids that are unknown or already fading are ignored, so removing the same
    /// card twice is harmless.
    pub(crate) fn remove(&mut self, ids: &[CardId], cx: &mut Cx<'_>) {
        let fading: Vec<CardId> = ids
            .iter()
            .copied()
            .filter(|id| self.card_mut(*id).is_some_and(MessageCard::begin_dismiss))
            .collect();

        if fading.is_empty() {
            return;
        }

        tracing::debug!(cards = ?fading, "dismissing toasts");
        self.start(
            AnimationKind::FadeOut(fading.clone()),
            Completion::FadeOut(fading),
            Curve::EaseInOut,
            cx,
        );
    }

    /// Runs the completion of a finished animation. Unknown ids are ignored.
    pub(crate) fn animation_finished(&mut self, id: AnimationId, cx: &mut Cx<'_>) -> Status {
        let Some(completion) = self.pending.remove(&id) else {
            return Status::Live;
        };

        match completion {
            Completion::Layout => {
                for card in &mut self.cards {
                    if card.entering() == Some(id) {
                        card.set_entering(None);
                    }
                }
            }
            Completion::Flash(card) => self.remove(&[card], cx),
            Completion::FadeOut(ids) => {
                self.cards.retain(|card| !ids.contains(&card.id()));
                self.z_order.retain(|card| !ids.contains(card));

                if self.cards.is_empty() {
                    return Status::Empty;
                }
                self.animate_layout(cx, None);
            }
        }

        Status::Live
    }

    /// Dismisses the card named by `token` unless it is gone or was re-shown.
    pub(crate) fn timer_fired(&mut self, token: TimerToken, cx: &mut Cx<'_>) {
        let current = self
            .card(token.card)
            .map(MessageCard::timeout_generation);

        if current != Some(token.generation) {
            tracing::trace!(card = ?token.card, "stale toast timeout");
            return;
        }

        self.remove(&[token.card], cx);
    }

    // ======================================================================
    // Environment
    // ======================================================================

    /// Restyles every card for a new environment and lays out again.
    pub(crate) fn environment_changed(&mut self, environment: Environment, cx: &mut Cx<'_>) {
        self.environment = environment;
        for card in &mut self.cards {
            card.environment_changed(environment, cx.config);
        }
        self.layout(cx);
    }

    /// Adopts new window bounds or safe area and lays out again.
    pub(crate) fn resize(&mut self, window: DisplayTarget, cx: &mut Cx<'_>) {
        self.window = window;
        self.layout(cx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::Headless;
    use iced_core::{Color, Padding};
    use std::time::Duration;

    fn message(title: &str, text: &str) -> Message {
        Message::new(title, text, Color::WHITE, Color::BLACK, Color::WHITE)
    }

    fn frames(harness: &Headless) -> Vec<Rectangle> {
        harness
            .surface()
            .map(|surface| surface.cards().iter().map(MessageCard::frame).collect())
            .unwrap_or_default()
    }

    #[test]
    fn new_card_starts_above_the_window() {
        let mut harness = Headless::new();
        let id = harness.show(message("A", "1")).expect("shown");

        let animations = harness.pending_animations();
        assert_eq!(animations.len(), 1);
        assert_eq!(animations[0].kind, AnimationKind::Layout);
        assert_eq!(animations[0].curve, Curve::EaseOut);

        let surface = harness.surface().expect("surface");
        let card = surface.card(id).expect("card");
        assert!(card.is_entering());
        assert!(!surface.is_settled(card));
    }

    #[test]
    fn layout_stacks_in_arrival_order_with_exact_gaps() {
        let mut harness = Headless::new();
        harness.show(message("First", "1"));
        harness.show(message("Second", &"long text ".repeat(20)));
        harness.show(message("Third", "3"));
        harness.settle();

        let config = Config::default();
        let frames = frames(&harness);
        assert_eq!(frames.len(), 3);

        for pair in frames.windows(2) {
            let gap = pair[1].y - (pair[0].y + pair[0].height);
            assert_eq!(gap, ceil(config.spacing));
        }
        for frame in &frames {
            assert!(frame.width <= config.max_width);
        }
    }

    #[test]
    fn wide_window_centers_cards_at_max_width() {
        let mut harness = Headless::with_bounds(
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: 1024.0,
                height: 768.0,
            },
            Padding::ZERO,
        );
        harness.show(message("A", "1"));
        harness.settle();

        let frame = frames(&harness)[0];
        assert_eq!(frame.width, 480.0);
        assert_eq!(frame.x, (1024.0 - 480.0) / 2.0);
        assert_eq!(frame.y, 24.0);
    }

    #[test]
    fn narrow_window_uses_content_width_inside_safe_area() {
        let mut harness = Headless::with_bounds(
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: 390.0,
                height: 844.0,
            },
            Padding {
                top: 47.0,
                right: 0.0,
                bottom: 34.0,
                left: 0.0,
            },
        );
        harness.show(message("A", "1"));
        harness.settle();

        let frame = frames(&harness)[0];
        assert_eq!(frame.x, 24.0);
        assert_eq!(frame.width, 390.0 - 48.0);
        assert_eq!(frame.y, 47.0 + 24.0);
    }

    #[test]
    fn hit_test_prefers_front_most_card() {
        let mut harness = Headless::new();
        let first = harness.show(message("A", "1")).expect("shown");
        harness.settle();

        let surface = harness.surface().expect("surface");
        let frame = surface.card(first).expect("card").frame();
        let inside = Point::new(frame.x + 1.0, frame.y + 1.0);
        assert_eq!(surface.hit_test(inside), Hit::Card(first));
        assert_eq!(
            surface.hit_test(Point::new(frame.x + 1.0, frame.y + frame.height + 1.0)),
            Hit::Background
        );
    }

    #[test]
    fn duplicate_moves_to_front_without_new_card() {
        let mut harness = Headless::new();
        let first = harness.show(message("A", "1")).expect("shown");
        let second = harness.show(message("B", "2")).expect("shown");
        let again = harness.show(message("A", "1")).expect("shown");

        assert_eq!(again, first);
        let surface = harness.surface().expect("surface");
        assert_eq!(surface.len(), 2);

        let order: Vec<CardId> = surface.paint_order().map(MessageCard::id).collect();
        assert_eq!(order, vec![second, first]);

        let layout_order: Vec<CardId> = surface.cards().iter().map(MessageCard::id).collect();
        assert_eq!(layout_order, vec![first, second]);
    }

    #[test]
    fn remove_twice_starts_one_fade() {
        let mut harness = Headless::new();
        let id = harness.show(message("A", "1")).expect("shown");
        harness.settle();

        harness.remove(&[id]);
        harness.remove(&[id]);

        let fades = harness
            .pending_animations()
            .into_iter()
            .filter(|animation| matches!(animation.kind, AnimationKind::FadeOut(_)))
            .count();
        assert_eq!(fades, 1);
    }

    #[test]
    fn removal_relayouts_remaining_cards() {
        let mut harness = Headless::new();
        let first = harness.show(message("A", "1")).expect("shown");
        let second = harness.show(message("B", "2")).expect("shown");
        harness.settle();
        let top = harness.surface().expect("surface").card(first).expect("card").frame().y;

        harness.remove(&[first]);
        harness.settle();

        let surface = harness.surface().expect("surface");
        assert_eq!(surface.len(), 1);
        assert_eq!(surface.card(second).expect("card").frame().y, top);
    }

    #[test]
    fn stale_timer_is_ignored_after_reshow() {
        let mut harness = Headless::new();
        let timed = message("A", "1").with_timeout(Duration::from_secs(3));
        let id = harness.show(timed.clone()).expect("shown");
        harness.settle();

        harness.advance(Duration::from_secs(2));
        harness.show(timed);
        harness.settle();

        // First deadline (3.25 s) passes; the refreshed one (5.25 s) has not.
        harness.advance(Duration::from_millis(1500));
        assert!(harness.surface().and_then(|surface| surface.card(id)).is_some());

        harness.advance(Duration::from_secs(2));
        harness.settle();
        assert!(harness.surface().is_none());
    }
    #[test]
    fn reshow_while_touched_creates_fresh_card() {
        let mut harness = Headless::new();
        let first = harness.show(message("A", "1")).expect("shown");
        harness.settle();

        let frame = harness.surface().expect("surface").card(first).expect("card").frame();
        let outcome = harness.tap(frame.center());
        assert_eq!(outcome, PointerOutcome::Consumed(first));
        assert_eq!(
            harness.surface().and_then(|surface| surface.card(first)).map(MessageCard::state),
            Some(CardState::Touched)
        );

        let second = harness.show(message("A", "1")).expect("shown");
        assert_ne!(second, first);
        assert_eq!(harness.surface().expect("surface").len(), 2);

        harness.settle();
        let surface = harness.surface().expect("surface");
        assert_eq!(surface.len(), 1);
        assert!(surface.card(first).is_none());
        assert!(surface.card(second).is_some());
    }

    #[test]
    fn reshow_while_dismissing_creates_fresh_card() {
        let mut harness = Headless::new();
        let first = harness.show(message("A", "1")).expect("shown");
        harness.settle();

        harness.remove(&[first]);
        let second = harness.show(message("A", "1")).expect("shown");
        assert_ne!(second, first);
        assert_eq!(harness.surface().expect("surface").len(), 2);

        harness.settle();
        let surface = harness.surface().expect("surface");
        assert_eq!(surface.len(), 1);
        assert!(surface.card(second).is_some());
    }

    #[test]
    fn unbounded_timeout_keeps_card() {
        let mut harness = Headless::new();
        let id = harness
            .show(message("A", "1").with_timeout(Duration::MAX))
            .expect("shown");
        harness.settle();

        assert_eq!(harness.pending_timers().len(), 1);
        harness.advance(Duration::from_secs(3600));
        assert!(harness.surface().and_then(|surface| surface.card(id)).is_some());
    }
}
