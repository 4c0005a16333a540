//! In-memory surface that records every paint operation

use super::{Sprite, Surface};
use crate::color::Rgb;

/// A recorded surface operation
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Resize { width: f32, height: f32 },
    Clear,
    Fade { color: Rgb, alpha: f32 },
    Draw(Sprite),
}

/// Headless surface for tests and the native demo
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Every operation since creation (or the last `take_ops`)
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the recorded operations
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Sprites painted since the most recent clear
    pub fn visible(&self) -> Vec<&Sprite> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Clear | SurfaceOp::Resize { .. }))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Draw(sprite) => Some(sprite),
                _ => None,
            })
            .collect()
    }

    /// Number of sprites painted since the most recent clear
    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    pub fn clear_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == SurfaceOp::Clear).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.ops.push(SurfaceOp::Resize {
            width: self.width,
            height: self.height,
        });
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.ops.push(SurfaceOp::Fade { color, alpha });
    }

    fn draw(&mut self, sprite: &Sprite) {
        self.ops.push(SurfaceOp::Draw(*sprite));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SpriteShape;
    use glam::Vec2;

    #[test]
    fn test_visible_resets_on_clear() {
        let mut s = RecordingSurface::new(100.0, 50.0);
        let dot = Sprite::new(SpriteShape::Circle { radius: 1.0 }, Vec2::ZERO, Rgb::BLACK);
        s.draw(&dot);
        s.clear();
        s.draw(&dot);
        s.draw(&dot);
        assert_eq!(s.visible_count(), 2);
        assert_eq!(s.clear_count(), 1);

        s.resize(10.0, 10.0);
        assert_eq!(s.visible_count(), 0);
        assert_eq!(s.size(), (10.0, 10.0));
    }
}
