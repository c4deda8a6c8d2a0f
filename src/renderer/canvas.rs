//! Charset blitting via CanvasRenderingContext2d
//!
//! Recoloring works by compositing: the charset is copied onto an
//! offscreen buffer, tinted with `source-in`, and backgrounds are filled
//! behind it with `destination-over`. The target cell is then blitted to
//! the main canvas at 2x scale with smoothing off.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::consts::*;
use crate::sim::{Color, Glyph, Sprite};

pub struct CanvasRenderer {
    context: CanvasRenderingContext2d,
    buffer: HtmlCanvasElement,
    buffer_context: CanvasRenderingContext2d,
    charset: HtmlImageElement,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    /// Build a renderer drawing onto `canvas`, with an offscreen buffer
    /// sized to the charset sheet.
    pub fn new(
        document: &Document,
        canvas: &HtmlCanvasElement,
        charset: HtmlImageElement,
    ) -> Result<Self, JsValue> {
        let width = (WORLD_WIDTH * SCALE) as f64;
        let height = (WORLD_HEIGHT * SCALE) as f64;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = context_2d(canvas)?;
        context.set_image_smoothing_enabled(false);

        let buffer: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        buffer.set_width(charset.width());
        buffer.set_height(charset.height());
        let buffer_context = context_2d(&buffer)?;

        Ok(Self {
            context,
            buffer,
            buffer_context,
            charset,
            width,
            height,
        })
    }

    /// Paint one frame: clear, background, then every sprite in order
    pub fn render(&self, sprites: &[Sprite]) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
        self.context.set_fill_style_str(&Color::BLACK.css());
        self.context.fill_rect(0.0, 0.0, self.width, self.height);

        for sprite in sprites {
            if let Err(err) = self.blit(sprite.pos, &sprite.glyph) {
                log::warn!("blit failed: {err:?}");
            }
        }
    }

    /// Draw the score readouts in the top-left corner
    pub fn render_hud(&self, score: u32, corrupted: u32) {
        self.context
            .set_font("16px 'Fira Mono', 'Lucida Console', monospace");
        self.context.set_fill_style_str(&Color::WHITE.css());
        let _ = self
            .context
            .fill_text(&format!("FREED SPACE: {score}kb"), 10.0, 20.0);
        self.context.set_fill_style_str(&Color::RED.css());
        let _ = self
            .context
            .fill_text(&format!("CORRUPTED DATA: {corrupted}kb"), 10.0, 42.0);
    }

    /// Tint the charset copy in the buffer with the glyph's colors
    fn set_glyph_color(&self, color: Color, background: Option<Color>) -> Result<(), JsValue> {
        let ctx = &self.buffer_context;
        let (w, h) = (self.buffer.width() as f64, self.buffer.height() as f64);

        ctx.save();
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.draw_image_with_html_image_element(&self.charset, 0.0, 0.0)?;
        ctx.set_fill_style_str(&color.css());
        ctx.set_global_composite_operation("source-in")?;
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.restore();

        if let Some(background) = background {
            ctx.save();
            ctx.set_fill_style_str(&background.css());
            ctx.set_global_composite_operation("destination-over")?;
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.restore();
        }
        Ok(())
    }

    fn blit(&self, pos: Vec2, glyph: &Glyph) -> Result<(), JsValue> {
        self.set_glyph_color(glyph.color, glyph.background)?;
        self.context
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.buffer,
                glyph.cell.0 as f64 * CHAR_WIDTH as f64,
                glyph.cell.1 as f64 * CHAR_HEIGHT as f64,
                CHAR_WIDTH as f64,
                CHAR_HEIGHT as f64,
                pos.x as f64 * SCALE as f64,
                pos.y as f64 * SCALE as f64,
                (CHAR_WIDTH * SCALE) as f64,
                (CHAR_HEIGHT * SCALE) as f64,
            )
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}
