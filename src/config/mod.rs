// SPDX-License-Identifier: MPL-2.0
//! Overlay configuration: color schemes, geometry, typography and timing.
//!
//! A [`Config`] is a plain value. Sharing happens through [`SharedConfig`], a
//! single mutex around the whole struct: readers take a [`SharedConfig::snapshot`]
//! and writers batch their edits in [`SharedConfig::update`]. The process-wide
//! instance behind [`config`] and [`with_config`] is what the free `show`,
//! `info` and `error` functions read.
//!
//! Configuration can also be loaded from a `toast.toml` file of overrides.
//!
//! # Examples
//!
//! ```no_run
//! use toast_overlay::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Tweak the process-wide configuration
//! config::with_config(|config| {
//!     config.max_width = 360.0;
//! });
//! assert_eq!(config::config().max_width, 360.0);
//!
//! // Save and load overrides (e.g., for a settings screen)
//! let path = PathBuf::from("./toast.toml");
//! config::save_to_path(&Config::default(), &path).expect("Failed to save config");
//! let loaded = config::load_from_path(&path).expect("Failed to load config");
//! assert_eq!(loaded.max_width, Config::default().max_width);
//! ```

mod defaults;

pub use defaults::*;

use crate::appearance::{hsb, DynamicColor};
use crate::error::{Error, Result};
use crate::icon::Icon;
use iced_core::font::Weight;
use iced_core::text::LineHeight;
use iced_core::{Color, Font, Padding, Pixels};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

/// Conventional file name for configuration overrides.
pub const CONFIG_FILE: &str = "toast.toml";

/// Stacking level of the overlay window relative to the host's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowLevel(pub i32);

impl WindowLevel {
    /// Level of ordinary application windows.
    pub const NORMAL: WindowLevel = WindowLevel(0);
}

impl Default for WindowLevel {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_LEVEL)
    }
}

/// Named bundle of colors, default icon and default timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    pub foreground: DynamicColor,
    pub background: DynamicColor,
    pub touched: DynamicColor,
    pub icon: Option<Icon>,
    pub timeout: Option<Duration>,
}

/// Styling of a card label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub font: Font,
    pub size: f32,
    pub line_height: LineHeight,
    pub max_lines: usize,
    pub line_height_multiple: f32,
    /// Paragraph spacing as a fraction of the line height.
    pub paragraph_spacing: f32,
    pub hyphenation: bool,
}

impl LabelStyle {
    /// Absolute height of one line of this style.
    #[must_use]
    pub fn line_height_px(&self) -> f32 {
        self.line_height.to_absolute(Pixels(self.size)).0
    }
}

/// Card drop shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub radius: f32,
    pub opacity: f32,
}

/// Durations shared by all card animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    /// Duration of layout, fade-out and tap-flash animations.
    pub transition: Duration,
    /// Added to every timeout before the card is removed.
    pub timeout_grace: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(DEFAULT_TRANSITION_MS),
            timeout_grace: Duration::from_millis(DEFAULT_TIMEOUT_GRACE_MS),
        }
    }
}

/// Everything the overlay reads when building and laying out cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub info: Scheme,
    pub error: Scheme,
    pub window_level: WindowLevel,
    pub insets: Padding,
    pub max_width: f32,
    pub content_padding: f32,
    pub spacing: f32,
    pub corner_radius: f32,
    pub shadow: Shadow,
    pub title: LabelStyle,
    pub text: LabelStyle,
    pub animation: AnimationTiming,
}

impl Default for Config {
    fn default() -> Self {
        let touched = DynamicColor::new(hsb(0.67, 0.03, 0.90, 1.0), hsb(0.67, 0.03, 0.30, 1.0));

        Self {
            info: Scheme {
                foreground: DynamicColor::new(hsb(0.0, 0.0, 1.0, 1.0), hsb(0.0, 0.0, 0.15, 1.0)),
                background: DynamicColor::new(hsb(0.0, 0.0, 0.0, 0.75), hsb(0.0, 0.0, 0.85, 0.95)),
                touched,
                icon: Icon::bundled(INFO_ICON),
                timeout: Some(Duration::from_secs(INFO_TIMEOUT_SECS)),
            },
            error: Scheme {
                foreground: DynamicColor::fixed(hsb(0.0, 0.0, 1.0, 1.0)),
                background: DynamicColor::fixed(hsb(0.0, 0.95, 0.70, 0.85)),
                touched,
                icon: Icon::bundled(ERROR_ICON),
                timeout: Some(Duration::from_secs(ERROR_TIMEOUT_SECS)),
            },
            window_level: WindowLevel::default(),
            insets: Padding::new(DEFAULT_INSET),
            max_width: DEFAULT_MAX_WIDTH,
            content_padding: DEFAULT_CONTENT_PADDING,
            spacing: DEFAULT_SPACING,
            corner_radius: DEFAULT_CORNER_RADIUS,
            shadow: Shadow {
                color: Color::BLACK,
                radius: DEFAULT_SHADOW_RADIUS,
                opacity: DEFAULT_SHADOW_OPACITY,
            },
            title: LabelStyle {
                font: Font {
                    weight: Weight::Semibold,
                    ..Font::DEFAULT
                },
                size: TITLE_FONT_SIZE,
                line_height: LineHeight::Relative(LINE_HEIGHT_RATIO),
                max_lines: TITLE_MAX_LINES,
                line_height_multiple: LINE_HEIGHT_MULTIPLE,
                paragraph_spacing: PARAGRAPH_SPACING_RATIO,
                hyphenation: false,
            },
            text: LabelStyle {
                font: Font::DEFAULT,
                size: TEXT_FONT_SIZE,
                line_height: LineHeight::Relative(LINE_HEIGHT_RATIO),
                max_lines: TEXT_MAX_LINES,
                line_height_multiple: LINE_HEIGHT_MULTIPLE,
                paragraph_spacing: PARAGRAPH_SPACING_RATIO,
                hyphenation: true,
            },
            animation: AnimationTiming::default(),
        }
    }
}

// ==========================================================================
// Shared access
// ==========================================================================

/// A [`Config`] behind a single lock, cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<Mutex<Config>>);

impl SharedConfig {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self(Arc::new(Mutex::new(config)))
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> Config {
        self.lock().clone()
    }

    /// Applies a batch of edits under the lock.
    pub fn update(&self, mutator: impl FnOnce(&mut Config)) {
        mutator(&mut self.lock());
    }

    /// Replaces the whole configuration.
    pub fn replace(&self, config: Config) {
        *self.lock() = config;
    }

    // A panic inside a mutator leaves a complete `Config` behind, so poisoning
    // is not an error here.
    fn lock(&self) -> MutexGuard<'_, Config> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The process-wide configuration.
pub fn global() -> &'static SharedConfig {
    static GLOBAL: OnceLock<SharedConfig> = OnceLock::new();
    GLOBAL.get_or_init(SharedConfig::default)
}

/// Snapshot of the process-wide configuration.
#[must_use]
pub fn config() -> Config {
    global().snapshot()
}

/// Edits the process-wide configuration.
pub fn with_config(mutator: impl FnOnce(&mut Config)) {
    global().update(mutator);
}

// ==========================================================================
// Config files
// ==========================================================================

/// Overrides for a [`Scheme`]. An empty `icon` removes the icon and a zero
/// `timeout_secs` disables auto-dismiss.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SchemeFile {
    #[serde(default)]
    pub foreground: Option<DynamicColor>,
    #[serde(default)]
    pub background: Option<DynamicColor>,
    #[serde(default)]
    pub touched: Option<DynamicColor>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<f64>,
}

/// Overrides for a [`LabelStyle`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LabelFile {
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub max_lines: Option<usize>,
    #[serde(default)]
    pub line_height_multiple: Option<f32>,
}

/// Overrides for the edge insets.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InsetsFile {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Overrides for the card shadow.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShadowFile {
    #[serde(default)]
    pub color: Option<DynamicColor>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub opacity: Option<f32>,
}

/// Overrides for animation timing.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnimationFile {
    #[serde(default)]
    pub transition_ms: Option<u64>,
    #[serde(default)]
    pub timeout_grace_ms: Option<u64>,
}

/// On-disk form of a [`Config`]: every field optional, applied over the defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub window_level: Option<WindowLevel>,
    #[serde(default)]
    pub max_width: Option<f32>,
    #[serde(default)]
    pub content_padding: Option<f32>,
    #[serde(default)]
    pub spacing: Option<f32>,
    #[serde(default)]
    pub corner_radius: Option<f32>,
    #[serde(default)]
    pub insets: Option<InsetsFile>,
    #[serde(default)]
    pub shadow: Option<ShadowFile>,
    #[serde(default)]
    pub animation: Option<AnimationFile>,
    #[serde(default)]
    pub info: Option<SchemeFile>,
    #[serde(default)]
    pub error: Option<SchemeFile>,
    #[serde(default)]
    pub title: Option<LabelFile>,
    #[serde(default)]
    pub text: Option<LabelFile>,
}

impl ConfigFile {
    /// Applies the overrides on top of `config`.
    ///
    /// Fails with [`Error::UnknownIcon`] when a scheme names an icon that is not
    /// bundled; `config` is left untouched in that case.
    pub fn apply_to(&self, config: &Config) -> Result<Config> {
        let mut config = config.clone();

        if let Some(level) = self.window_level {
            config.window_level = level;
        }
        if let Some(max_width) = self.max_width {
            config.max_width = max_width;
        }
        if let Some(padding) = self.content_padding {
            config.content_padding = padding;
        }
        if let Some(spacing) = self.spacing {
            config.spacing = spacing;
        }
        if let Some(radius) = self.corner_radius {
            config.corner_radius = radius;
        }
        if let Some(insets) = &self.insets {
            config.insets = Padding {
                top: insets.top,
                right: insets.right,
                bottom: insets.bottom,
                left: insets.left,
            };
        }
        if let Some(shadow) = &self.shadow {
            if let Some(color) = shadow.color {
                config.shadow.color = color.light;
            }
            if let Some(radius) = shadow.radius {
                config.shadow.radius = radius;
            }
            if let Some(opacity) = shadow.opacity {
                config.shadow.opacity = opacity.clamp(0.0, 1.0);
            }
        }
        if let Some(animation) = &self.animation {
            if let Some(ms) = animation.transition_ms {
                config.animation.transition = Duration::from_millis(ms);
            }
            if let Some(ms) = animation.timeout_grace_ms {
                config.animation.timeout_grace = Duration::from_millis(ms);
            }
        }
        if let Some(scheme) = &self.info {
            scheme.apply(&mut config.info)?;
        }
        if let Some(scheme) = &self.error {
            scheme.apply(&mut config.error)?;
        }
        if let Some(label) = &self.title {
            label.apply(&mut config.title);
        }
        if let Some(label) = &self.text {
            label.apply(&mut config.text);
        }

        Ok(config)
    }
}

impl SchemeFile {
    fn apply(&self, scheme: &mut Scheme) -> Result<()> {
        if let Some(color) = self.foreground {
            scheme.foreground = color;
        }
        if let Some(color) = self.background {
            scheme.background = color;
        }
        if let Some(color) = self.touched {
            scheme.touched = color;
        }
        if let Some(name) = &self.icon {
            scheme.icon = if name.is_empty() {
                None
            } else {
                Some(Icon::lookup(name).ok_or_else(|| Error::UnknownIcon(name.clone()))?)
            };
        }
        if let Some(secs) = self.timeout_secs {
            scheme.timeout = if secs > 0.0 {
                let timeout = Duration::try_from_secs_f64(secs)
                    .map_err(|err| Error::Config(format!("timeout_secs = {secs}: {err}")))?;
                Some(timeout)
            } else {
                None
            };
        }
        Ok(())
    }

    fn from_scheme(scheme: &Scheme) -> Self {
        Self {
            foreground: Some(scheme.foreground),
            background: Some(scheme.background),
            touched: Some(scheme.touched),
            icon: Some(
                scheme
                    .icon
                    .as_ref()
                    .and_then(Icon::name)
                    .unwrap_or_default()
                    .to_owned(),
            ),
            timeout_secs: Some(scheme.timeout.map_or(0.0, |timeout| timeout.as_secs_f64())),
        }
    }
}

impl LabelFile {
    fn apply(&self, style: &mut LabelStyle) {
        if let Some(size) = self.size {
            style.size = size;
        }
        if let Some(max_lines) = self.max_lines {
            style.max_lines = max_lines;
        }
        if let Some(multiple) = self.line_height_multiple {
            style.line_height_multiple = multiple;
        }
    }

    fn from_style(style: &LabelStyle) -> Self {
        Self {
            size: Some(style.size),
            max_lines: Some(style.max_lines),
            line_height_multiple: Some(style.line_height_multiple),
        }
    }
}

impl From<&Config> for ConfigFile {
    fn from(config: &Config) -> Self {
        Self {
            window_level: Some(config.window_level),
            max_width: Some(config.max_width),
            content_padding: Some(config.content_padding),
            spacing: Some(config.spacing),
            corner_radius: Some(config.corner_radius),
            insets: Some(InsetsFile {
                top: config.insets.top,
                right: config.insets.right,
                bottom: config.insets.bottom,
                left: config.insets.left,
            }),
            shadow: Some(ShadowFile {
                color: Some(DynamicColor::fixed(config.shadow.color)),
                radius: Some(config.shadow.radius),
                opacity: Some(config.shadow.opacity),
            }),
            animation: Some(AnimationFile {
                transition_ms: Some(duration_ms(config.animation.transition)),
                timeout_grace_ms: Some(duration_ms(config.animation.timeout_grace)),
            }),
            info: Some(SchemeFile::from_scheme(&config.info)),
            error: Some(SchemeFile::from_scheme(&config.error)),
            title: Some(LabelFile::from_style(&config.title)),
            text: Some(LabelFile::from_style(&config.text)),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Loads a config file and applies it over the defaults.
///
/// Unparseable TOML falls back to the defaults; unknown icon names are an error.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let file: ConfigFile = match toml::from_str(&content) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid toast config, using defaults");
            ConfigFile::default()
        }
    };
    file.apply_to(&Config::default())
}

/// Writes every setting of `config` to `path`, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(&ConfigFile::from(config))?;
    fs::write(path, content)?;
    Ok(())
}
