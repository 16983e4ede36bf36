// SPDX-License-Identifier: MPL-2.0
use iced_core::{Color, Padding, Point, Rectangle, Size};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use toast_overlay::config::{self, Config};
use toast_overlay::geometry::ceil;
use toast_overlay::headless::Headless;
use toast_overlay::platform::AnimationKind;
use toast_overlay::{
    Appearance, CardId, Environment, Icon, LayoutDirection, Message, PointerOutcome,
};

fn message(title: &str, text: &str) -> Message {
    Message::new(title, text, Color::WHITE, Color::BLACK, Color::WHITE)
}

fn frame_of(harness: &Headless, id: CardId) -> Rectangle {
    harness
        .surface()
        .and_then(|surface| surface.card(id))
        .map(|card| card.frame())
        .expect("card is visible")
}

fn center(frame: Rectangle) -> Point {
    Point::new(frame.x + frame.width / 2.0, frame.y + frame.height / 2.0)
}

#[test]
fn identical_show_refreshes_instead_of_duplicating() {
    let mut harness = Headless::new();
    let three_seconds = message("A", "1").with_timeout(Duration::from_secs(3));

    let first = harness.show(three_seconds.clone()).expect("shown");
    harness.advance(Duration::from_secs(1));
    let second = harness.show(three_seconds).expect("shown");

    assert_eq!(first, second);
    assert_eq!(harness.surface().map(|surface| surface.len()), Some(1));

    // Timeout is measured from the second call: 1 s + 3 s + 0.25 s grace.
    harness.advance(Duration::from_millis(3_000));
    assert!(harness.overlay().is_active());

    harness.advance(Duration::from_millis(600));
    assert!(!harness.overlay().is_active());
}

#[test]
fn message_without_timeout_stays_until_tapped() {
    let mut harness = Headless::new();
    let id = harness
        .show(message("Sticky", "stays").without_timeout())
        .expect("shown");

    harness.advance(Duration::from_secs(600));
    assert!(harness.overlay().is_active());
    assert!(harness.pending_timers().is_empty());

    let outcome = harness.tap(center(frame_of(&harness, id)));
    assert_eq!(outcome, PointerOutcome::Consumed(id));
    harness.settle();
    assert!(!harness.overlay().is_active());
}

#[test]
fn messages_stack_in_arrival_order_centered() {
    let mut harness = Headless::with_bounds(
        Rectangle::new(Point::ORIGIN, Size::new(1024.0, 768.0)),
        Padding::ZERO,
    );
    let m1 = harness.show(message("M1", "first")).expect("shown");
    let m2 = harness.show(message("M2", "second")).expect("shown");
    harness.settle();

    let config = Config::default();
    let f1 = frame_of(&harness, m1);
    let f2 = frame_of(&harness, m2);

    assert!(f1.y < f2.y);
    assert_eq!(f2.y, f1.y + f1.height + ceil(config.spacing));
    assert_eq!(f1.x, f2.x);
    assert_eq!(f1.width, config.max_width);
    assert_eq!(f1.x + f1.width / 2.0, 512.0);
}

#[test]
fn timeout_after_tap_is_harmless() {
    let mut harness = Headless::new();
    let id = harness
        .show(message("A", "1").with_timeout(Duration::from_secs(1)))
        .expect("shown");
    harness.settle();

    harness.tap(center(frame_of(&harness, id)));
    harness.settle();
    assert!(!harness.overlay().is_active());

    harness.advance(Duration::from_secs(2));
    assert!(!harness.overlay().is_active());
    assert_eq!(harness.windows_closed(), 1);
}

#[test]
fn background_tap_spares_entering_cards() {
    let mut harness = Headless::new();
    let settled = harness.show(message("Old", "settled")).expect("shown");
    harness.settle();
    let entering = harness.show(message("New", "entering")).expect("shown");

    let outcome = harness.tap(Point::new(5.0, 800.0));
    assert_eq!(outcome, PointerOutcome::PassThrough);

    let fading: Vec<CardId> = harness
        .pending_animations()
        .into_iter()
        .filter_map(|animation| match animation.kind {
            AnimationKind::FadeOut(cards) => Some(cards),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(fading, vec![settled]);

    harness.settle();
    let surface = harness.surface().expect("entering card keeps the surface");
    assert_eq!(surface.len(), 1);
    assert!(surface.card(entering).is_some());
}

#[test]
fn background_tap_removes_all_settled_cards_together() {
    let mut harness = Headless::new();
    harness.show(message("A", "1"));
    harness.show(message("B", "2"));
    harness.show(message("C", "3"));
    harness.settle();

    harness.tap(Point::new(5.0, 800.0));
    let fades = harness
        .pending_animations()
        .into_iter()
        .filter(|animation| matches!(animation.kind, AnimationKind::FadeOut(_)))
        .count();
    assert_eq!(fades, 1);

    harness.settle();
    assert!(!harness.overlay().is_active());
}

#[test]
fn tap_in_gap_between_cards_passes_through() {
    let mut harness = Headless::new();
    let first = harness.show(message("A", "1")).expect("shown");
    let second = harness.show(message("B", "2")).expect("shown");
    harness.settle();

    let upper = frame_of(&harness, first);
    let lower = frame_of(&harness, second);

    assert_eq!(
        harness.tap(Point::new(upper.x + 1.0, lower.y)),
        PointerOutcome::Consumed(second)
    );
    harness.settle();

    let remaining = harness.surface().map(|surface| surface.len());
    assert_eq!(remaining, Some(1));
    // Far edges are exclusive, so the bottom edge of the upper card is a miss.
    assert_eq!(
        harness.tap(Point::new(upper.x + 1.0, upper.y + upper.height)),
        PointerOutcome::PassThrough
    );
}

#[test]
fn tap_callback_runs_once_and_skips_clipboard() {
    let taps = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&taps);

    let mut harness = Headless::new();
    let id = harness
        .show(message("Open", "details").on_tap(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .expect("shown");
    harness.settle();

    let point = center(frame_of(&harness, id));
    assert_eq!(harness.tap(point), PointerOutcome::Consumed(id));
    assert_eq!(harness.tap(point), PointerOutcome::Consumed(id));

    assert_eq!(taps.load(Ordering::SeqCst), 1);
    assert!(harness.clipboard().contents().is_none());
}

#[test]
fn surface_is_recreated_after_teardown() {
    let mut harness = Headless::new();
    let id = harness.show(message("A", "1")).expect("shown");
    harness.settle();
    harness.tap(center(frame_of(&harness, id)));
    harness.settle();
    assert!(!harness.overlay().is_active());

    harness.show(message("B", "2")).expect("shown");
    assert!(harness.overlay().is_active());
    assert_eq!(harness.windows_opened(), 2);
}

#[test]
fn card_width_never_exceeds_max_width() {
    let mut config = Config::default();
    config.max_width = 300.0;
    let mut harness = Headless::with_config(config);

    for i in 0..5 {
        harness.show(message(&format!("Title {i}"), &"text ".repeat(i * 10)));
    }
    harness.settle();

    let surface = harness.surface().expect("surface");
    for card in surface.cards() {
        assert!(card.frame().width <= 300.0);
    }
    for pair in surface.cards().windows(2) {
        let (a, b) = (pair[0].frame(), pair[1].frame());
        assert_eq!(b.y - (a.y + a.height), ceil(12.0));
    }
}

#[test]
fn info_and_error_use_distinct_schemes() {
    let config = Config::default();
    let mut harness = Headless::new();
    let info = harness
        .show(Message::info(&config, "Saved", "ok"))
        .expect("shown");
    let error = harness
        .show(Message::error(&config, "Failed", "disk full"))
        .expect("shown");

    let surface = harness.surface().expect("surface");
    let info = surface.card(info).expect("info card");
    let error = surface.card(error).expect("error card");
    assert_ne!(info.background_color(), error.background_color());
    assert_eq!(info.icon(), Icon::lookup("info").as_ref());
    assert_eq!(error.icon(), Icon::lookup("warning").as_ref());

    let timers = harness.pending_timers();
    assert_eq!(timers[0].0, Duration::from_millis(3_250));
    assert_eq!(timers[1].0, Duration::from_millis(6_250));
}

#[test]
fn environment_change_restyles_visible_cards() {
    let mut harness = Headless::new();
    let id = harness
        .show(Message::new(
            "A",
            "1",
            Color::WHITE,
            toast_overlay::DynamicColor::new(Color::WHITE, Color::BLACK),
            Color::WHITE,
        ))
        .expect("shown");
    harness.settle();

    harness.environment_changed(Environment {
        appearance: Appearance::Dark,
        direction: LayoutDirection::RightToLeft,
    });

    let card = harness.surface().and_then(|s| s.card(id)).expect("card");
    assert_eq!(card.background_color(), Color::BLACK);
    assert_eq!(card.environment().direction, LayoutDirection::RightToLeft);
}

#[test]
fn resize_relayouts_into_new_bounds() {
    let mut harness = Headless::new();
    let id = harness.show(message("A", "1")).expect("shown");
    harness.settle();

    harness.resize(
        Rectangle::new(Point::ORIGIN, Size::new(844.0, 390.0)),
        Padding {
            top: 0.0,
            right: 47.0,
            bottom: 21.0,
            left: 47.0,
        },
    );

    let frame = frame_of(&harness, id);
    assert_eq!(frame.width, 480.0);
    assert_eq!(frame.x, (844.0 - 480.0) / 2.0);
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join(config::CONFIG_FILE);

    std::fs::write(
        &path,
        r##"
max_width = 320.0
spacing = 8.0

[info]
timeout_secs = 0.0
background = "#112233FF"
"##,
    )
    .expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("Failed to load config");
    assert_eq!(loaded.max_width, 320.0);
    assert_eq!(loaded.spacing, 8.0);
    assert!(loaded.info.timeout.is_none());

    let mut harness = Headless::with_config(loaded.clone());
    let id = harness
        .show(Message::info(&loaded, "Saved", "ok"))
        .expect("shown");
    harness.advance(Duration::from_secs(60));
    assert!(harness.surface().and_then(|s| s.card(id)).is_some());
    assert_eq!(frame_of(&harness, id).width, 320.0);
}
