//! HTML canvas surface (WASM only)

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Sprite, SpriteShape, Surface};
use crate::color::Rgb;
use crate::error::{FxError, Result};

/// A full-window `<canvas>` with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Bind a canvas, size it to the viewport and follow window resizes.
    ///
    /// Fails with `FxError::NoContext` if the canvas cannot provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(FxError::NoContext)?;

        fit_to_window(&canvas);

        {
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                fit_to_window(&canvas);
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        Ok(Self { canvas, ctx })
    }

    /// Look a canvas up by element id
    pub fn from_element_id(id: &str) -> Result<Self> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| FxError::Js(format!("no canvas with id '{}'", id)))?;
        Self::new(canvas)
    }

    fn paint_shape(&self, shape: &SpriteShape, color: &str) {
        let ctx = &self.ctx;
        match *shape {
            SpriteShape::Rect {
                width,
                height,
                offset,
            } => {
                ctx.fill_rect(offset.x as f64, offset.y as f64, width as f64, height as f64);
            }
            SpriteShape::Circle { radius } => {
                ctx.begin_path();
                ctx.arc(0.0, 0.0, radius.max(0.0) as f64, 0.0, TAU).ok();
                ctx.fill();
            }
            SpriteShape::Cross { size } => {
                let half = size as f64 / 2.0;
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(0.0, -half);
                ctx.line_to(0.0, half);
                ctx.move_to(-half, 0.0);
                ctx.line_to(half, 0.0);
                ctx.stroke();
            }
            SpriteShape::Glyph { ch, font_px } => {
                ctx.set_font(&format!("{}px 'JetBrains Mono', monospace", font_px));
                let mut buf = [0u8; 4];
                ctx.fill_text(ch.encode_utf8(&mut buf), 0.0, 0.0).ok();
            }
        }
    }
}

fn fit_to_window(canvas: &HtmlCanvasElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        let (w, h) = self.size();
        self.ctx.set_fill_style_str(&color.css_rgba(alpha));
        self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn draw(&mut self, sprite: &Sprite) {
        let ctx = &self.ctx;
        let color = sprite.color.to_string();
        ctx.save();
        if sprite.glow > 0.0 {
            ctx.set_shadow_color(&color);
            ctx.set_shadow_blur(sprite.glow as f64);
        }
        ctx.translate(sprite.pos.x as f64, sprite.pos.y as f64).ok();
        if sprite.rotation != 0.0 {
            ctx.rotate((sprite.rotation as f64).to_radians()).ok();
        }
        ctx.set_global_alpha(sprite.alpha as f64);
        ctx.set_fill_style_str(&color);
        self.paint_shape(&sprite.shape, &color);
        ctx.restore();
    }
}
