// SPDX-License-Identifier: MPL-2.0
//! Overlay lifecycle.
//!
//! The [`Overlay`] owns at most one [`OverlaySurface`]. It opens the overlay
//! window lazily on the first `show` and closes it as soon as the last card is
//! gone, so no invisible always-on-top window is left intercepting input.

use crate::appearance::Environment;
use crate::card::CardId;
use crate::config::SharedConfig;
use crate::message::Message;
use crate::platform::{AnimationId, DisplayTarget, Host, TargetId, TimerToken};
use crate::surface::{Cx, OverlaySurface, PointerOutcome, Status};
use iced_core::Point;

/// Inputs the overlay reacts to.
#[derive(Debug, Clone)]
pub enum Event {
    /// Display a message.
    Show(Message),
    /// A pointer went down at `point`, in the coordinate space of `target`.
    PointerDown { point: Point, target: TargetId },
    /// The host finished playing an animation.
    AnimationFinished(AnimationId),
    /// A scheduled auto-dismiss is due.
    TimerFired(TimerToken),
    /// Appearance or layout direction changed.
    EnvironmentChanged(Environment),
    /// The overlay window was resized or its safe area changed.
    Resized(DisplayTarget),
    /// Fade out one card.
    Dismiss(CardId),
    /// Fade out every card.
    DismissAll,
}

/// Owns the overlay surface and the host services it needs.
#[derive(Debug)]
pub struct Overlay {
    config: SharedConfig,
    host: Host,
    environment: Environment,
    surface: Option<OverlaySurface>,
}

impl Overlay {
    #[must_use]
    pub fn new(config: SharedConfig, host: Host) -> Self {
        Self {
            config,
            host,
            environment: Environment::default(),
            surface: None,
        }
    }

    /// Dispatches an event. Returns the pointer outcome for `PointerDown`.
    pub fn handle(&mut self, event: Event) -> Option<PointerOutcome> {
        match event {
            Event::Show(message) => {
                self.show(message);
            }
            Event::PointerDown { point, target } => {
                return Some(self.pointer_down(point, target));
            }
            Event::AnimationFinished(id) => self.animation_finished(id),
            Event::TimerFired(token) => self.timer_fired(token),
            Event::EnvironmentChanged(environment) => self.environment_changed(environment),
            Event::Resized(target) => self.resized(target),
            Event::Dismiss(card) => self.dismiss(card),
            Event::DismissAll => self.dismiss_all(),
        }
        None
    }

    /// Shows `message`, opening the overlay window if needed.
    ///
    /// Returns `None` when the host has no display target to draw on, in which
    /// case the message is dropped.
    pub fn show(&mut self, message: Message) -> Option<CardId> {
        let config = self.config.snapshot();

        if self.surface.is_none() {
            let Some(parent) = self.host.display.active_target() else {
                tracing::debug!(title = message.title(), "no active display target, dropping toast");
                return None;
            };
            let Some(window) = self.host.display.open_overlay(&parent, config.window_level) else {
                tracing::debug!(title = message.title(), "overlay window refused, dropping toast");
                return None;
            };
            tracing::debug!(window = ?window.id, "overlay surface created");
            self.surface = Some(OverlaySurface::new(window, self.environment));
        }

        let surface = self.surface.as_mut()?;
        let mut cx = Cx {
            config: &config,
            host: &mut self.host,
        };
        Some(surface.show(message, &mut cx))
    }

    /// Routes a pointer-down to the cards.
    ///
    /// Without a surface every touch passes through.
    pub fn pointer_down(&mut self, point: Point, from: TargetId) -> PointerOutcome {
        let config = self.config.snapshot();
        let Some(surface) = self.surface.as_mut() else {
            return PointerOutcome::PassThrough;
        };

        let point = self
            .host
            .display
            .convert_point(point, from, surface.window().id);
        let mut cx = Cx {
            config: &config,
            host: &mut self.host,
        };
        surface.pointer_down(point, &mut cx)
    }

    /// Fades out a card. Unknown or already leaving cards are ignored.
    pub fn dismiss(&mut self, card: CardId) {
        let config = self.config.snapshot();
        if let Some(surface) = self.surface.as_mut() {
            let mut cx = Cx {
                config: &config,
                host: &mut self.host,
            };
            surface.remove(&[card], &mut cx);
        }
    }

    /// Fades out every card currently shown.
    pub fn dismiss_all(&mut self) {
        let config = self.config.snapshot();
        if let Some(surface) = self.surface.as_mut() {
            let ids: Vec<CardId> = surface.cards().iter().map(|card| card.id()).collect();
            let mut cx = Cx {
                config: &config,
                host: &mut self.host,
            };
            surface.remove(&ids, &mut cx);
        }
    }

    pub fn animation_finished(&mut self, id: AnimationId) {
        let config = self.config.snapshot();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let mut cx = Cx {
            config: &config,
            host: &mut self.host,
        };
        if surface.animation_finished(id, &mut cx) == Status::Empty {
            self.teardown();
        }
    }

    pub fn timer_fired(&mut self, token: TimerToken) {
        let config = self.config.snapshot();
        match self.surface.as_mut() {
            Some(surface) => {
                let mut cx = Cx {
                    config: &config,
                    host: &mut self.host,
                };
                surface.timer_fired(token, &mut cx);
            }
            None => tracing::trace!(card = ?token.card, "timeout after overlay teardown"),
        }
    }

    /// Restyles the cards for a new appearance or layout direction.
    pub fn environment_changed(&mut self, environment: Environment) {
        self.environment = environment;
        let config = self.config.snapshot();
        if let Some(surface) = self.surface.as_mut() {
            let mut cx = Cx {
                config: &config,
                host: &mut self.host,
            };
            surface.environment_changed(environment, &mut cx);
        }
    }

    /// Adopts new bounds for the overlay window.
    pub fn resized(&mut self, target: DisplayTarget) {
        let config = self.config.snapshot();
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if surface.window().id != target.id {
            return;
        }
        let mut cx = Cx {
            config: &config,
            host: &mut self.host,
        };
        surface.resize(target, &mut cx);
    }

    fn teardown(&mut self) {
        if let Some(surface) = self.surface.take() {
            let window = surface.window().id;
            self.host.display.close_overlay(window);
            tracing::debug!(window = ?window, "overlay surface released");
        }
    }

    /// The current surface, for rendering.
    #[must_use]
    pub fn surface(&self) -> Option<&OverlaySurface> {
        self.surface.as_ref()
    }

    /// Whether an overlay window is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }
}
