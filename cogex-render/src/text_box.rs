use crate::error::RenderError;
use crate::glyph_cache::{blit_glyph, GlyphCache};
use crate::layout::{layout_paragraph, Layout};
use crate::stimulus::TextStimulus;
use ab_glyph::FontVec;
use cogex_core::{Anchor, StimulusKind, Units};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxParams {
    pub pos: (f32, f32),
    pub units: Units,
    pub anchor: Anchor,
    /// Letter height, in `units`
    pub letter_height: f32,
    /// Box width, in `units`; text wraps inside it
    pub width: f32,
    /// Inner padding, in `units`; half the letter height when unset
    pub padding: Option<f32>,
    pub color: [u8; 4],
    pub fill_color: Option<[u8; 4]>,
    pub border_color: Option<[u8; 4]>,
}

impl Default for TextBoxParams {
    fn default() -> Self {
        Self {
            pos: (0.0, -0.25),
            units: Units::Height,
            anchor: Anchor::Center,
            letter_height: 0.03,
            width: 1.0,
            padding: None,
            color: [255, 255, 255, 255],
            fill_color: Some([0, 0, 0, 255]),
            border_color: None,
        }
    }
}

/// Glyph-atlas text box.
///
/// `set_text` only lays out glyph positions and rasterizes glyphs the atlas
/// has not seen yet. Every `draw` paints the box and blits each glyph.
pub struct TextBox {
    font: Arc<FontVec>,
    params: TextBoxParams,
    window: (u32, u32),
    text: String,
    layout: Layout,
    cache: GlyphCache,
    top_left: (f32, f32),
    size: (f32, f32),
    padding: f32,
}

impl TextBox {
    pub fn new(
        font: Arc<FontVec>,
        window: (u32, u32),
        params: TextBoxParams,
        text: &str,
    ) -> Result<Self, RenderError> {
        let mut tb = Self {
            font,
            params,
            window,
            text: String::new(),
            layout: Layout::default(),
            cache: GlyphCache::new(),
            top_left: (0.0, 0.0),
            size: (0.0, 0.0),
            padding: 0.0,
        };
        tb.set_text(text)?;
        Ok(tb)
    }

    pub fn params(&self) -> &TextBoxParams {
        &self.params
    }

    /// Distinct glyphs rasterized so far.
    pub fn atlas_len(&self) -> usize {
        self.cache.len()
    }

    /// Box rectangle in screen pixels: (x, y, width, height).
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.top_left.0, self.top_left.1, self.size.0, self.size.1)
    }

    fn relayout(&mut self) {
        let units = self.params.units;
        let window_h = self.window.1;
        let px_height = units.to_pixels(self.params.letter_height, window_h);
        self.padding = units.to_pixels(
            self.params.padding.unwrap_or(self.params.letter_height / 2.0),
            window_h,
        );
        let width = units.to_pixels(self.params.width, window_h);
        let inner = (width - 2.0 * self.padding).max(px_height);

        self.layout = layout_paragraph(self.font.as_ref(), &self.text, px_height, Some(inner));

        let mut misses = 0usize;
        for g in &self.layout.glyphs {
            if self.cache.warm(self.font.as_ref(), g) {
                misses += 1;
            }
        }
        if misses > 0 {
            log::trace!("text box atlas: {} new glyphs, {} total", misses, self.cache.len());
        }

        self.size = (width, self.layout.height + 2.0 * self.padding);
        let anchor_at = units.to_screen(self.params.pos, self.window);
        self.top_left = self.params.anchor.top_left(anchor_at, self.size);
    }
}

fn rgba(c: [u8; 4]) -> Color {
    Color::from_rgba8(c[0], c[1], c[2], c[3])
}

impl TextStimulus for TextBox {
    fn kind(&self) -> StimulusKind {
        StimulusKind::TextBox
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) -> Result<(), RenderError> {
        self.text.clear();
        self.text.push_str(text);
        self.relayout();
        Ok(())
    }

    fn draw(&mut self, target: &mut Pixmap) -> Result<(), RenderError> {
        let rect = Rect::from_xywh(self.top_left.0, self.top_left.1, self.size.0, self.size.1);

        if let Some(rect) = rect {
            if let Some(fill) = self.params.fill_color {
                let mut paint = Paint::default();
                paint.set_color(rgba(fill));
                target.fill_rect(rect, &paint, Transform::identity(), None);
            }
            if let Some(border) = self.params.border_color {
                let mut paint = Paint::default();
                paint.set_color(rgba(border));
                paint.anti_alias = true;
                let path = PathBuilder::from_rect(rect);
                let stroke = Stroke {
                    width: 1.0,
                    ..Default::default()
                };
                target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        let (w, h) = (target.width(), target.height());
        let origin = (
            self.top_left.0 + self.padding,
            self.top_left.1 + self.padding,
        );
        let pixels = target.pixels_mut();
        for g in &self.layout.glyphs {
            if let Some(cached) = self.cache.get(g) {
                let at = (origin.0 + g.position.x, origin.1 + g.position.y);
                blit_glyph(pixels, w, h, at, cached, self.params.color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::any_system_font;

    #[test]
    fn atlas_only_grows_for_new_glyphs() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let mut tb =
            TextBox::new(loaded.font, (1920, 1080), TextBoxParams::default(), "ABAB").unwrap();
        let after_first = tb.atlas_len();
        assert_eq!(after_first, 2);
        tb.set_text("BABA BA").unwrap();
        assert_eq!(tb.atlas_len(), after_first);
        tb.set_text("ABC").unwrap();
        assert_eq!(tb.atlas_len(), after_first + 1);
    }

    #[test]
    fn box_is_anchored_at_center() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let tb =
            TextBox::new(loaded.font, (1920, 1080), TextBoxParams::default(), "TEXT").unwrap();
        let (x, y, w, h) = tb.bounds();
        assert!((x + w / 2.0 - 960.0).abs() < 0.01);
        assert!((y + h / 2.0 - 810.0).abs() < 0.01);
        assert!((w - 1080.0).abs() < 0.01);
    }

    #[test]
    fn draw_fills_background_and_border() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let params = TextBoxParams {
            pos: (0.0, 0.0),
            units: Units::Pix,
            letter_height: 20.0,
            width: 100.0,
            fill_color: Some([0, 0, 255, 255]),
            border_color: Some([255, 0, 0, 255]),
            ..TextBoxParams::default()
        };
        let mut tb = TextBox::new(loaded.font, (200, 200), params, "I").unwrap();
        let mut target = Pixmap::new(200, 200).unwrap();
        tb.draw(&mut target).unwrap();

        let (x, y, _, _) = tb.bounds();
        let inside = target.pixel(x as u32 + 3, y as u32 + 3).unwrap();
        assert_eq!(inside.blue(), 255);
        assert_eq!(target.pixel(0, 0).unwrap().alpha(), 0);
    }
}
