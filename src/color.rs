//! Tint colors and theme palette for the preview surface chrome.
//!
//! The bar resolves its effective tint once at construction (see
//! `TimeBarStyle`); later retints go through `set_preview_color_tint` or,
//! for themed embedders, through a `ColorRes` looked up in the `Palette`.
//! Colors are plain RGBA8, independent of any UI toolkit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback scrubber tint when the style declares nothing
pub const DEFAULT_TINT: Color = Color::from_rgb(255, 220, 100);

/// RGBA8 color, unmultiplied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB components
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey
    pub const fn from_gray(v: u8) -> Self {
        Self::from_rgb(v, v, v)
    }

    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
}

/// Reference to a theme color resource, resolved through a [`Palette`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRes(pub u32);

/// Theme color table: resource reference -> concrete color.
///
/// The embedding application fills this from its theme at construction time
/// and hands it to the bar via `TimeBarStyle`. Lookup of an unknown resource
/// returns `None`; callers treat that as "keep the current color".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Palette {
    colors: HashMap<ColorRes, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a resource color
    pub fn insert(&mut self, res: ColorRes, color: Color) {
        self.colors.insert(res, color);
    }

    /// Builder-style insert
    pub fn with(mut self, res: ColorRes, color: Color) -> Self {
        self.insert(res, color);
        self
    }

    /// Look up a resource color
    pub fn resolve(&self, res: ColorRes) -> Option<Color> {
        self.colors.get(&res).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
