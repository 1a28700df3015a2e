//! Browser surface: the only place that touches
//! [`web_sys::CanvasRenderingContext2d`].
//!
//! Fallible `Canvas2D` calls are mapped into [`RenderError::Surface`] so the
//! render pass can log and continue.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::error::RenderError;
use crate::geometry::{Affine, Point, Size};
use crate::render::DrawSurface;

/// Fill used for the pin when no image has been loaded yet.
const PIN_FALLBACK_COLOR: &str = "#d32f2f";

fn surface_err(e: JsValue) -> RenderError {
    RenderError::Surface(format!("{e:?}"))
}

/// [`DrawSurface`] over a 2D canvas context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    pin: Option<HtmlImageElement>,
}

impl CanvasSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, pin: None }
    }

    /// Use `image` for the active-photo and current-sweep pin.
    #[must_use]
    pub fn with_pin(mut self, image: HtmlImageElement) -> Self {
        self.pin = Some(image);
        self
    }

    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, size: Size) -> Result<(), RenderError> {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).map_err(surface_err)?;
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
        Ok(())
    }

    fn set_transform(&mut self, m: &Affine) -> Result<(), RenderError> {
        let [a, b, c, d, e, f] = m.coeffs();
        self.ctx.set_transform(a, b, c, d, e, f).map_err(surface_err)
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), RenderError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI).map_err(surface_err)?;
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, width: f64, color: &str) -> Result<(), RenderError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        if closed {
            self.ctx.close_path();
        }
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, font: &str, color: &str) -> Result<(), RenderError> {
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("top");
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, at.x, at.y).map_err(surface_err)
    }

    fn draw_pin(&mut self, size: f64) -> Result<(), RenderError> {
        let half = size * 0.5;
        match &self.pin {
            Some(img) if img.complete() => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, -half, -half, size, size)
                .map_err(surface_err),
            _ => self.fill_circle(Point::new(0.0, 0.0), half, PIN_FALLBACK_COLOR),
        }
    }
}
