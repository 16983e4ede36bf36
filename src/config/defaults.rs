// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Geometry**: Overlay insets, card width and spacing
//! - **Card Chrome**: Corner radius and shadow
//! - **Typography**: Title and body label styling
//! - **Timing**: Animation durations and scheme timeouts

// ==========================================================================
// Geometry Defaults
// ==========================================================================

/// Inset applied on every edge of the overlay after the safe area.
pub const DEFAULT_INSET: f32 = 24.0;

/// Maximum width of a card; wider overlays center the stack.
pub const DEFAULT_MAX_WIDTH: f32 = 480.0;

/// Padding between a card's edge and its content.
pub const DEFAULT_CONTENT_PADDING: f32 = 12.0;

/// Vertical gap between consecutive cards.
pub const DEFAULT_SPACING: f32 = 12.0;

/// Window level of the overlay, one above the host's normal level.
pub const DEFAULT_WINDOW_LEVEL: i32 = 1;

// ==========================================================================
// Card Chrome Defaults
// ==========================================================================

/// Corner radius of a card.
pub const DEFAULT_CORNER_RADIUS: f32 = 8.0;

/// Blur radius of the card shadow.
pub const DEFAULT_SHADOW_RADIUS: f32 = 4.0;

/// Opacity of the card shadow.
pub const DEFAULT_SHADOW_OPACITY: f32 = 0.5;

// ==========================================================================
// Typography Defaults
// ==========================================================================

/// Title font size (callout text style).
pub const TITLE_FONT_SIZE: f32 = 16.0;

/// Maximum number of title lines before truncation.
pub const TITLE_MAX_LINES: usize = 2;

/// Body font size (footnote text style).
pub const TEXT_FONT_SIZE: f32 = 13.0;

/// Maximum number of body lines before truncation.
pub const TEXT_MAX_LINES: usize = 6;

/// Nominal line height relative to the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Line height multiple applied by the paragraph style.
pub const LINE_HEIGHT_MULTIPLE: f32 = 0.85;

/// Paragraph spacing relative to the line height.
pub const PARAGRAPH_SPACING_RATIO: f32 = 0.15;

/// Gap between title and body relative to the title line height.
pub const TITLE_GAP_RATIO: f32 = 0.3;

// ==========================================================================
// Timing Defaults
// ==========================================================================

/// Duration of every layout, fade and flash animation (in milliseconds).
pub const DEFAULT_TRANSITION_MS: u64 = 250;

/// Extra delay added to a timeout so the entrance animation can finish
/// before the exit starts (in milliseconds).
pub const DEFAULT_TIMEOUT_GRACE_MS: u64 = 250;

/// Auto-dismiss timeout of the info scheme (in seconds).
pub const INFO_TIMEOUT_SECS: u64 = 3;

/// Auto-dismiss timeout of the error scheme (in seconds).
pub const ERROR_TIMEOUT_SECS: u64 = 6;

/// Default icon of the info scheme.
pub const INFO_ICON: &str = "info";

/// Default icon of the error scheme.
pub const ERROR_ICON: &str = "warning";
