//! Sprite primitives painted by the effects

use glam::Vec2;

use crate::color::Rgb;

/// Geometry of a sprite, centered on its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteShape {
    /// Filled rectangle; `offset` shifts the top-left corner from the center
    Rect { width: f32, height: f32, offset: Vec2 },
    /// Filled disc
    Circle { radius: f32 },
    /// Stroked plus sign with arms of length `size`
    Cross { size: f32 },
    /// Single text glyph, anchored at its baseline-left like canvas `fillText`
    Glyph { ch: char, font_px: f32 },
}

/// One paint operation: shape plus transform and style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub shape: SpriteShape,
    pub pos: Vec2,
    /// Rotation in degrees around `pos`
    pub rotation: f32,
    pub color: Rgb,
    /// Opacity in [0, 1]
    pub alpha: f32,
    /// Soft glow blur radius in pixels (0 = none)
    pub glow: f32,
}

impl Sprite {
    pub fn new(shape: SpriteShape, pos: Vec2, color: Rgb) -> Self {
        Self {
            shape,
            pos,
            rotation: 0.0,
            color,
            alpha: 1.0,
            glow: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow.max(0.0);
        self
    }
}
