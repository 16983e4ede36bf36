// SPDX-License-Identifier: MPL-2.0
//! Icons shown at the leading and trailing edges of a card.
//!
//! Bundled icons are SVGs embedded at compile time from `assets/icons/` and are
//! addressed by file stem (`"info"`, `"warning"`, ...). Hosts may also supply
//! their own vector or raster images.
//!
//! Two icons are equal when they refer to the same image data at the same
//! point size. Card deduplication relies on this identity.

use iced_core::{image, svg, Size};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/icons/"]
struct Bundled;

/// Default point size of bundled scheme icons.
pub const DEFAULT_ICON_SIZE: f32 = 24.0;

#[derive(Debug, Clone)]
enum Source {
    Vector(svg::Handle),
    Raster(image::Handle),
}

/// An image drawn inside a card.
#[derive(Debug, Clone)]
pub struct Icon {
    source: Source,
    name: Option<String>,
    size: Option<Size>,
}

impl Icon {
    /// Loads a bundled icon at [`DEFAULT_ICON_SIZE`].
    ///
    /// Asking for an icon that is not bundled is a programming error: debug builds
    /// stop with an assertion, release builds return `None`.
    #[must_use]
    pub fn bundled(name: &str) -> Option<Self> {
        let icon = Self::lookup(name);
        debug_assert!(icon.is_some(), "no such bundled icon: {name}");
        icon
    }

    /// Loads a bundled icon without asserting that it exists.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let file = Bundled::get(&format!("{name}.svg"))?;
        Some(Self {
            source: Source::Vector(svg::Handle::from_memory(file.data)),
            name: Some(name.to_owned()),
            size: Some(Size::new(DEFAULT_ICON_SIZE, DEFAULT_ICON_SIZE)),
        })
    }

    /// Names of all bundled icons, sorted.
    #[must_use]
    pub fn bundled_names() -> Vec<String> {
        let mut names: Vec<String> = Bundled::iter()
            .filter_map(|file| file.strip_suffix(".svg").map(str::to_owned))
            .collect();
        names.sort();
        names
    }

    /// Wraps host-provided SVG data.
    pub fn from_svg(data: impl Into<std::borrow::Cow<'static, [u8]>>) -> Self {
        Self {
            source: Source::Vector(svg::Handle::from_memory(data)),
            name: None,
            size: None,
        }
    }

    /// Wraps host-provided RGBA pixels; the intrinsic size is the pixel size.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            source: Source::Raster(image::Handle::from_rgba(width, height, pixels)),
            name: None,
            size: Some(Size::new(width as f32, height as f32)),
        }
    }

    /// Wraps an existing raster handle.
    #[must_use]
    pub fn from_image(handle: image::Handle) -> Self {
        Self {
            source: Source::Raster(handle),
            name: None,
            size: None,
        }
    }

    /// Overrides the point size the icon is drawn at.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Point size requested for this icon, if any.
    #[must_use]
    pub fn size_hint(&self) -> Option<Size> {
        self.size
    }

    /// Bundled name, when loaded through [`Icon::bundled`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Vector handle for renderers.
    #[must_use]
    pub fn svg(&self) -> Option<&svg::Handle> {
        match &self.source {
            Source::Vector(handle) => Some(handle),
            Source::Raster(_) => None,
        }
    }

    /// Raster handle for renderers.
    #[must_use]
    pub fn image(&self) -> Option<&image::Handle> {
        match &self.source {
            Source::Raster(handle) => Some(handle),
            Source::Vector(_) => None,
        }
    }
}

impl PartialEq for Icon {
    fn eq(&self, other: &Self) -> bool {
        let same_image = match (&self.source, &other.source) {
            (Source::Vector(a), Source::Vector(b)) => a.id() == b.id(),
            (Source::Raster(a), Source::Raster(b)) => a.id() == b.id(),
            _ => false,
        };
        same_image && self.size == other.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_icons_are_bundled() {
        for name in ["info", "warning", "cross", "chevron_right"] {
            assert!(Icon::lookup(name).is_some(), "missing bundled icon {name}");
        }
    }

    #[test]
    fn bundled_names_are_listed() {
        let names = Icon::bundled_names();
        assert!(names.contains(&"info".to_string()));
        assert!(names.contains(&"warning".to_string()));
    }

    #[test]
    fn same_bundled_icon_is_equal() {
        assert_eq!(Icon::bundled("info"), Icon::bundled("info"));
        assert_ne!(Icon::bundled("info"), Icon::bundled("warning"));
    }

    #[test]
    fn size_participates_in_identity() {
        let small = Icon::lookup("info").map(|icon| icon.with_size(Size::new(16.0, 16.0)));
        assert_ne!(small, Icon::lookup("info"));
    }

    #[test]
    fn lookup_of_unknown_icon_is_none() {
        assert!(Icon::lookup("does-not-exist").is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no such bundled icon")]
    fn bundled_unknown_icon_stops_in_debug() {
        let _ = Icon::bundled("does-not-exist");
    }

    #[test]
    fn raster_icon_uses_pixel_size() {
        let icon = Icon::from_rgba(2, 3, vec![0u8; 2 * 3 * 4]);
        assert_eq!(icon.size_hint(), Some(Size::new(2.0, 3.0)));
        assert!(icon.image().is_some());
        assert!(icon.svg().is_none());
    }
}
