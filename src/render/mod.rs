//! Drawing surface abstraction
//!
//! Effects never touch a platform API directly. They paint `Sprite`s onto
//! anything implementing `Surface`: a 2D canvas in the browser, or the
//! `RecordingSurface` used by tests and the native demo.

pub mod recording;
pub mod sprite;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use recording::{RecordingSurface, SurfaceOp};
pub use sprite::{Sprite, SpriteShape};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::color::Rgb;

/// A mutable 2D raster target with resizable pixel dimensions
pub trait Surface {
    /// Current (width, height) in pixels. Must be re-read on every emission.
    fn size(&self) -> (f32, f32);

    /// Change the pixel dimensions. Clears the contents.
    fn resize(&mut self, width: f32, height: f32);

    /// Erase the whole surface to transparent
    fn clear(&mut self);

    /// Paint a translucent full-surface rectangle (trail fade)
    fn fade(&mut self, color: Rgb, alpha: f32);

    /// Paint one sprite
    fn draw(&mut self, sprite: &Sprite);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> (f32, f32) {
        (**self).size()
    }

    fn resize(&mut self, width: f32, height: f32) {
        (**self).resize(width, height)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        (**self).fade(color, alpha)
    }

    fn draw(&mut self, sprite: &Sprite) {
        (**self).draw(sprite)
    }
}
