// SPDX-License-Identifier: MPL-2.0
//! A single visible notification card.
//!
//! A card is built from a [`Message`] and a [`Config`] snapshot. It measures
//! itself for a given width (memoized until the width or environment changes),
//! lays out its icon, title, body and accessory, and handles taps by invoking
//! the message callback or copying its text to the clipboard.
//!
//! Cards never remove themselves: the owning surface drives every state change
//! after a tap.

use crate::appearance::{DynamicColor, Environment};
use crate::config::{Config, LabelStyle, Shadow, TITLE_GAP_RATIO};
use crate::geometry::{ceil, snap};
use crate::icon::Icon;
use crate::message::{Message, TapAction};
use crate::platform::{AnimationId, Clipboard, Measure};
use iced_core::alignment::Horizontal;
use iced_core::{Color, Rectangle, Size};

/// Unique identifier for a card. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u64);

impl CardId {
    /// Creates a new unique card ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

/// Styled text of a card, as passed to [`Measure::label_height`].
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    content: String,
    color: DynamicColor,
    style: LabelStyle,
    alignment: Horizontal,
}

impl Label {
    fn new(content: String, color: DynamicColor, style: LabelStyle, env: Environment) -> Self {
        Self {
            content,
            color,
            style,
            alignment: alignment_for(env),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn color(&self) -> DynamicColor {
        self.color
    }

    #[must_use]
    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    #[must_use]
    pub fn alignment(&self) -> Horizontal {
        self.alignment
    }
}

fn alignment_for(env: Environment) -> Horizontal {
    if env.direction.is_rtl() {
        Horizontal::Right
    } else {
        Horizontal::Left
    }
}

/// Frames of a card's parts, relative to the card's own origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub size: Size,
    pub icon: Rectangle,
    pub title: Rectangle,
    pub text: Rectangle,
    pub accessory: Rectangle,
}

/// Interaction state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Idle,
    /// Tapped; flashing its touched color before removal.
    Touched,
    /// Fading out; ignores further taps and removals.
    Dismissing,
}

/// Rendered attributes two cards must share to count as duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupeKey {
    title: String,
    title_color: DynamicColor,
    text: String,
    background: DynamicColor,
    icon: Option<Icon>,
    accessory: Option<Icon>,
}

// Everything the layout depends on, kept apart from the cache so the cache can
// be filled while the content is borrowed.
#[derive(Debug, Clone)]
struct Content {
    title: Label,
    text: Label,
    icon: Option<Icon>,
    accessory: Option<Icon>,
    padding: f32,
    environment: Environment,
}

impl Content {
    fn layout(&self, width: f32, measure: &dyn Measure) -> CardLayout {
        let padding = self.padding;
        let icon_size = self
            .icon
            .as_ref()
            .map_or(Size::ZERO, |icon| measure.icon_size(icon));
        let accessory_size = self
            .accessory
            .as_ref()
            .map_or(Size::ZERO, |icon| measure.icon_size(icon));

        let leading = if icon_size.width > 0.0 {
            icon_size.width + padding * 2.0
        } else {
            padding
        };
        let trailing = if accessory_size.width > 0.0 {
            accessory_size.width + padding * 2.0
        } else {
            padding
        };

        let text_width = (width - leading - trailing).max(0.0);
        let title_height = ceil(measure.label_height(&self.title, text_width));
        let text_height = ceil(measure.label_height(&self.text, text_width));
        let gap = ceil(self.title.style.line_height_px() * TITLE_GAP_RATIO);
        let height = ceil(
            icon_size
                .height
                .max(accessory_size.height)
                .max(title_height + gap + text_height),
        ) + padding * 2.0;

        let accessory_y = (height - accessory_size.height) / 2.0;

        let (icon_x, text_x, accessory_x) = if self.environment.direction.is_rtl() {
            (width - padding - icon_size.width, trailing, padding)
        } else {
            (padding, leading, width - padding - accessory_size.width)
        };

        CardLayout {
            size: Size::new(width, height),
            icon: snap(Rectangle {
                x: icon_x,
                y: padding,
                width: icon_size.width,
                height: icon_size.height,
            }),
            title: snap(Rectangle {
                x: text_x,
                y: padding,
                width: text_width,
                height: title_height,
            }),
            text: snap(Rectangle {
                x: text_x,
                y: padding + title_height + gap,
                width: text_width,
                height: text_height,
            }),
            accessory: snap(Rectangle {
                x: accessory_x,
                y: accessory_y,
                width: accessory_size.width,
                height: accessory_size.height,
            }),
        }
    }
}

/// One notification in the overlay stack.
pub struct MessageCard {
    id: CardId,
    content: Content,
    foreground: DynamicColor,
    background: DynamicColor,
    touched: DynamicColor,
    on_tap: Option<TapAction>,
    corner_radius: f32,
    shadow: Shadow,
    cache: Option<CardLayout>,
    frame: Rectangle,
    alpha: f32,
    state: CardState,
    pressed: bool,
    entering: Option<AnimationId>,
    timeout_generation: u64,
}

impl MessageCard {
    /// Builds a card, styling its labels from `config`.
    #[must_use]
    pub fn new(message: Message, config: &Config, environment: Environment) -> Self {
        let title = Label::new(
            message.title().to_owned(),
            message.foreground(),
            config.title,
            environment,
        );
        let text = Label::new(
            message.text().to_owned(),
            message.foreground(),
            config.text,
            environment,
        );

        Self {
            id: CardId::new(),
            content: Content {
                title,
                text,
                icon: message.icon().cloned(),
                accessory: message.accessory().cloned(),
                padding: config.content_padding,
                environment,
            },
            foreground: message.foreground(),
            background: message.background(),
            touched: message.touched(),
            on_tap: message.tap_action().cloned(),
            corner_radius: config.corner_radius,
            shadow: config.shadow,
            cache: None,
            frame: Rectangle::with_size(Size::ZERO),
            alpha: 1.0,
            state: CardState::Idle,
            pressed: false,
            entering: None,
            timeout_generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &Label {
        &self.content.title
    }

    #[must_use]
    pub fn text(&self) -> &Label {
        &self.content.text
    }

    #[must_use]
    pub fn icon(&self) -> Option<&Icon> {
        self.content.icon.as_ref()
    }

    #[must_use]
    pub fn accessory(&self) -> Option<&Icon> {
        self.content.accessory.as_ref()
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.content.environment
    }

    /// Frame in overlay coordinates, as set by the last layout pass.
    #[must_use]
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[must_use]
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Whether the entrance animation has not finished yet.
    #[must_use]
    pub fn is_entering(&self) -> bool {
        self.entering.is_some()
    }

    #[must_use]
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    #[must_use]
    pub fn shadow(&self) -> Shadow {
        self.shadow
    }

    /// Text and icon color for the current appearance.
    #[must_use]
    pub fn foreground_color(&self) -> Color {
        self.foreground.resolve(self.content.environment.appearance)
    }

    /// Background color for the current appearance, flashed after a tap.
    #[must_use]
    pub fn background_color(&self) -> Color {
        let color = if self.pressed {
            self.touched
        } else {
            self.background
        };
        color.resolve(self.content.environment.appearance)
    }

    /// Height of the card at `width`, memoized per width.
    pub fn measure_height(&mut self, width: f32, measure: &dyn Measure) -> f32 {
        self.layout(width, measure).size.height
    }

    /// Lays out the card's parts at `width`, reusing the cached result when the
    /// width is unchanged.
    pub fn layout(&mut self, width: f32, measure: &dyn Measure) -> &CardLayout {
        if self
            .cache
            .as_ref()
            .is_some_and(|cached| cached.size.width != width)
        {
            self.cache = None;
        }
        let content = &self.content;
        self.cache
            .get_or_insert_with(|| content.layout(width, measure))
    }

    /// The last computed layout, if still valid.
    #[must_use]
    pub fn cached_layout(&self) -> Option<&CardLayout> {
        self.cache.as_ref()
    }

    /// Drops the cached layout.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Adopts a new environment and the current label styling.
    pub fn environment_changed(&mut self, environment: Environment, config: &Config) {
        let content = &mut self.content;
        content.environment = environment;
        content.padding = config.content_padding;
        content.title.style = config.title;
        content.title.alignment = alignment_for(environment);
        content.text.style = config.text;
        content.text.alignment = alignment_for(environment);
        self.invalidate();
    }

    /// Handles a pointer-down on the card.
    ///
    /// Runs the tap callback, or copies `"title\ntext"` when there is none, and
    /// switches to the touched state. Returns `false` and does nothing if the
    /// card was already tapped or is being dismissed.
    pub fn press(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        if self.state != CardState::Idle {
            return false;
        }

        match &self.on_tap {
            Some(action) => action(),
            None => clipboard.set_text(self.copy_text()),
        }

        self.state = CardState::Touched;
        self.pressed = true;
        true
    }

    /// Text copied to the clipboard on tap.
    #[must_use]
    pub fn copy_text(&self) -> String {
        format!("{}\n{}", self.content.title.content, self.content.text.content)
    }

    #[must_use]
    pub fn dedupe_key(&self) -> DedupeKey {
        DedupeKey {
            title: self.content.title.content.clone(),
            title_color: self.content.title.color,
            text: self.content.text.content.clone(),
            background: self.background,
            icon: self.content.icon.clone(),
            accessory: self.content.accessory.clone(),
        }
    }

    /// Whether `other` renders the same notification.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &MessageCard) -> bool {
        self.dedupe_key() == other.dedupe_key()
    }

    pub(crate) fn set_frame(&mut self, frame: Rectangle) {
        self.frame = frame;
    }

    pub(crate) fn set_entering(&mut self, animation: Option<AnimationId>) {
        self.entering = animation;
    }

    pub(crate) fn entering(&self) -> Option<AnimationId> {
        self.entering
    }

    /// Marks the card as fading out. Returns `false` if it already was.
    pub(crate) fn begin_dismiss(&mut self) -> bool {
        if self.state == CardState::Dismissing {
            return false;
        }
        self.state = CardState::Dismissing;
        self.alpha = 0.0;
        true
    }

    pub(crate) fn timeout_generation(&self) -> u64 {
        self.timeout_generation
    }

    /// Invalidates every pending timer of this card and returns the new generation.
    pub(crate) fn refresh_timeout(&mut self) -> u64 {
        self.timeout_generation += 1;
        self.timeout_generation
    }
}

impl std::fmt::Debug for MessageCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCard")
            .field("id", &self.id)
            .field("title", &self.content.title.content)
            .field("text", &self.content.text.content)
            .field("frame", &self.frame)
            .field("alpha", &self.alpha)
            .field("state", &self.state)
            .field("entering", &self.entering)
            .finish_non_exhaustive()
    }
}
