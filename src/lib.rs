// SPDX-License-Identifier: MPL-2.0
//! `toast_overlay` shows short-lived notification cards above every other
//! window of an application.
//!
//! Cards stack top-to-bottom inside the safe area, identical messages are
//! merged, and each card leaves on timeout, on tap or when the user touches
//! empty space. The overlay window only exists while at least one card is
//! visible.
//!
//! The crate does not render anything itself. Hosts implement the traits in
//! [`platform`] for measurement, windows, clipboard, animation and timers, then
//! either drive an [`Overlay`] directly or run it on a [`Runtime`] and post
//! messages through a [`Handle`] from any thread.

#![doc(html_root_url = "https://docs.rs/toast_overlay/0.1.0")]

pub mod appearance;
pub mod card;
pub mod config;
pub mod error;
pub mod geometry;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod icon;
pub mod message;
pub mod overlay;
pub mod platform;
pub mod runtime;
pub mod surface;

pub use appearance::{Appearance, DynamicColor, Environment, LayoutDirection};
pub use card::{CardId, CardState, MessageCard};
pub use config::{config, with_config, Config, SharedConfig};
pub use error::{Error, Result};
pub use icon::Icon;
pub use message::Message;
pub use overlay::{Event, Overlay};
pub use platform::{DisplayTarget, Host, TargetId};
pub use runtime::{error, error_with, info, info_with, install, show, Handle, Runtime};
pub use surface::{Hit, OverlaySurface, PointerOutcome};
