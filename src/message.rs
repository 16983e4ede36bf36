// SPDX-License-Identifier: MPL-2.0
//! The message value handed to `show`.
//!
//! A [`Message`] is plain data: texts, colors, optional icons, an optional
//! auto-dismiss timeout and an optional tap callback. When no callback is set,
//! tapping the card copies its text to the clipboard instead.

use crate::appearance::DynamicColor;
use crate::config::{Config, Scheme};
use crate::icon::Icon;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked when the user taps a card.
pub type TapAction = Arc<dyn Fn() + Send + Sync>;

/// A notification to be displayed.
#[derive(Clone)]
pub struct Message {
    title: String,
    text: String,
    foreground: DynamicColor,
    background: DynamicColor,
    touched: DynamicColor,
    icon: Option<Icon>,
    accessory: Option<Icon>,
    timeout: Option<Duration>,
    on_tap: Option<TapAction>,
}

impl Message {
    /// Creates a message with explicit colors, no icons and no timeout.
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        foreground: impl Into<DynamicColor>,
        background: impl Into<DynamicColor>,
        touched: impl Into<DynamicColor>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            foreground: foreground.into(),
            background: background.into(),
            touched: touched.into(),
            icon: None,
            accessory: None,
            timeout: None,
            on_tap: None,
        }
    }

    /// Creates a message from a scheme, taking its colors, icon and timeout.
    pub fn with_scheme(scheme: &Scheme, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            icon: scheme.icon.clone(),
            timeout: scheme.timeout,
            ..Self::new(
                title,
                text,
                scheme.foreground,
                scheme.background,
                scheme.touched,
            )
        }
    }

    /// Creates a message in the info scheme of `config`.
    pub fn info(config: &Config, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_scheme(&config.info, title, text)
    }

    /// Creates a message in the error scheme of `config`.
    pub fn error(config: &Config, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_scheme(&config.error, title, text)
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn without_icon(mut self) -> Self {
        self.icon = None;
        self
    }

    #[must_use]
    pub fn with_accessory(mut self, accessory: Icon) -> Self {
        self.accessory = Some(accessory);
        self
    }

    /// Sets the auto-dismiss timeout. A zero duration behaves like no timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Keeps the card until it is tapped.
    #[must_use]
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Runs `action` on tap instead of copying the text to the clipboard.
    #[must_use]
    pub fn on_tap(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_tap = Some(Arc::new(action));
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn foreground(&self) -> DynamicColor {
        self.foreground
    }

    #[must_use]
    pub fn background(&self) -> DynamicColor {
        self.background
    }

    #[must_use]
    pub fn touched(&self) -> DynamicColor {
        self.touched
    }

    #[must_use]
    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    #[must_use]
    pub fn accessory(&self) -> Option<&Icon> {
        self.accessory.as_ref()
    }

    /// Timeout after which the card removes itself, if positive.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }

    #[must_use]
    pub fn tap_action(&self) -> Option<&TapAction> {
        self.on_tap.as_ref()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("title", &self.title)
            .field("text", &self.text)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("touched", &self.touched)
            .field("icon", &self.icon)
            .field("accessory", &self.accessory)
            .field("timeout", &self.timeout)
            .field("on_tap", &self.on_tap.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced_core::Color;

    #[test]
    fn info_takes_scheme_defaults() {
        let config = Config::default();
        let message = Message::info(&config, "Saved", "All changes stored");

        assert_eq!(message.title(), "Saved");
        assert_eq!(message.text(), "All changes stored");
        assert_eq!(message.foreground(), config.info.foreground);
        assert_eq!(message.background(), config.info.background);
        assert_eq!(message.icon(), config.info.icon.as_ref());
        assert_eq!(message.timeout(), config.info.timeout);
    }

    #[test]
    fn error_scheme_differs_from_info() {
        let config = Config::default();
        let info = Message::info(&config, "a", "b");
        let error = Message::error(&config, "a", "b");

        assert_ne!(info.background(), error.background());
        assert!(error.timeout() > info.timeout());
    }

    #[test]
    fn builder_overrides_scheme_defaults() {
        let config = Config::default();
        let message = Message::info(&config, "a", "b")
            .without_icon()
            .with_accessory(Icon::lookup("chevron_right").expect("bundled"))
            .without_timeout();

        assert!(message.icon().is_none());
        assert!(message.accessory().is_some());
        assert!(message.timeout().is_none());
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let message = Message::new("a", "b", Color::WHITE, Color::BLACK, Color::WHITE)
            .with_timeout(Duration::ZERO);
        assert!(message.timeout().is_none());
    }

    #[test]
    fn plain_colors_become_fixed() {
        let message = Message::new("a", "b", Color::WHITE, Color::BLACK, Color::WHITE);
        assert_eq!(message.background(), DynamicColor::fixed(Color::BLACK));
    }

    #[test]
    fn debug_does_not_require_debuggable_callback() {
        let message =
            Message::new("a", "b", Color::WHITE, Color::BLACK, Color::WHITE).on_tap(|| {});
        assert!(format!("{message:?}").contains("on_tap: true"));
    }
}
