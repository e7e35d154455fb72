use crate::error::RenderError;
use crate::layout::{layout_paragraph, Layout};
use crate::stimulus::TextStimulus;
use ab_glyph::{Font, FontVec};
use cogex_core::{StimulusKind, Units};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tiny_skia::{Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStimParams {
    pub pos: (f32, f32),
    pub units: Units,
    /// Letter height, in `units`
    pub height: f32,
    /// Line wrap width, in `units`
    pub wrap_width: Option<f32>,
    pub color: [u8; 4],
}

impl Default for TextStimParams {
    fn default() -> Self {
        Self {
            pos: (0.0, 300.0),
            units: Units::Pix,
            height: 32.0,
            wrap_width: Some(1200.0),
            color: [255, 255, 255, 255],
        }
    }
}

/// Rasterize-on-change text.
///
/// Every `set_text` lays out and rasterizes the whole paragraph into a
/// private pixmap; `draw` only composites that pixmap.
pub struct TextStim {
    font: Arc<FontVec>,
    params: TextStimParams,
    window: (u32, u32),
    text: String,
    rendered: Pixmap,
    top_left: (i32, i32),
}

impl TextStim {
    pub fn new(
        font: Arc<FontVec>,
        window: (u32, u32),
        params: TextStimParams,
        text: &str,
    ) -> Result<Self, RenderError> {
        let rendered = Pixmap::new(1, 1).ok_or(RenderError::Pixmap {
            width: 1,
            height: 1,
        })?;
        let mut stim = Self {
            font,
            params,
            window,
            text: String::new(),
            rendered,
            top_left: (0, 0),
        };
        stim.set_text(text)?;
        Ok(stim)
    }

    pub fn params(&self) -> &TextStimParams {
        &self.params
    }

    /// Size of the rasterized paragraph in pixels.
    pub fn rendered_size(&self) -> (u32, u32) {
        (self.rendered.width(), self.rendered.height())
    }

    fn rebuild(&mut self) -> Result<(), RenderError> {
        let window_h = self.window.1;
        let px_height = self.params.units.to_pixels(self.params.height, window_h);
        let wrap = self
            .params
            .wrap_width
            .map(|w| self.params.units.to_pixels(w, window_h));

        let layout = layout_paragraph(self.font.as_ref(), &self.text, px_height, wrap);
        self.rendered = rasterize_layout(self.font.as_ref(), &layout, self.params.color)?;

        let center = self.params.units.to_screen(self.params.pos, self.window);
        self.top_left = (
            (center.0 - self.rendered.width() as f32 / 2.0).round() as i32,
            (center.1 - self.rendered.height() as f32 / 2.0).round() as i32,
        );
        Ok(())
    }
}

impl TextStimulus for TextStim {
    fn kind(&self) -> StimulusKind {
        StimulusKind::TextStim
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: &str) -> Result<(), RenderError> {
        self.text.clear();
        self.text.push_str(text);
        self.rebuild()
    }

    fn draw(&mut self, target: &mut Pixmap) -> Result<(), RenderError> {
        target.draw_pixmap(
            self.top_left.0,
            self.top_left.1,
            self.rendered.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }
}

/// Rasterizes a laid-out paragraph into a transparent premultiplied pixmap
/// the size of the layout box.
pub fn rasterize_layout<F: Font>(
    font: &F,
    layout: &Layout,
    color: [u8; 4],
) -> Result<Pixmap, RenderError> {
    let w = (layout.width.ceil() as u32).max(1);
    let h = (layout.height.ceil() as u32).max(1);
    let mut pm = Pixmap::new(w, h).ok_or(RenderError::Pixmap {
        width: w,
        height: h,
    })?;

    let stride = w as usize;
    let dst = pm.pixels_mut();

    for g in &layout.glyphs {
        let Some(out) = font.outline_glyph(g.clone()) else {
            continue;
        };
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x).floor() as i32;
            let iy = (y as f32 + b.min.y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            // Premultiply source by (coverage * alpha)
            let a_lin = (cov * color[3] as f32 / 255.0).clamp(0.0, 1.0);
            let sr = (color[0] as f32 * a_lin) as u8;
            let sg = (color[1] as f32 * a_lin) as u8;
            let sb = (color[2] as f32 * a_lin) as u8;
            let sa = (a_lin * 255.0) as u8;

            // Porter-Duff over in premultiplied space: out = src + bg * (1 - src.a)
            let bg = dst[i];
            let inv = 1.0 - (sa as f32 / 255.0);
            let out_a = sa.saturating_add((bg.alpha() as f32 * inv) as u8);
            let out_r = sr.saturating_add((bg.red() as f32 * inv) as u8).min(out_a);
            let out_g = sg.saturating_add((bg.green() as f32 * inv) as u8).min(out_a);
            let out_b = sb.saturating_add((bg.blue() as f32 * inv) as u8).min(out_a);

            if let Some(px) = PremultipliedColorU8::from_rgba(out_r, out_g, out_b, out_a) {
                dst[i] = px;
            }
        });
    }

    Ok(pm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::any_system_font;
    use tiny_skia::Color;

    #[test]
    fn set_text_rerasterizes() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let mut stim =
            TextStim::new(loaded.font, (1920, 1080), TextStimParams::default(), "A").unwrap();
        let small = stim.rendered_size();
        stim.set_text("A MUCH LONGER LINE OF TEXT").unwrap();
        assert_eq!(stim.text(), "A MUCH LONGER LINE OF TEXT");
        assert!(stim.rendered_size().0 > small.0);
    }

    #[test]
    fn long_text_wraps_to_wrap_width() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let text = "WORD ".repeat(200);
        let stim =
            TextStim::new(loaded.font, (1920, 1080), TextStimParams::default(), &text).unwrap();
        let (w, h) = stim.rendered_size();
        assert!(w <= 1200);
        assert!(h > 64);
    }

    #[test]
    fn draw_puts_ink_around_its_position() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let params = TextStimParams {
            pos: (0.0, 0.0),
            ..TextStimParams::default()
        };
        let mut stim = TextStim::new(loaded.font, (200, 100), params, "HHHH").unwrap();
        let mut target = Pixmap::new(200, 100).unwrap();
        target.fill(Color::BLACK);
        stim.draw(&mut target).unwrap();
        let lit = target.pixels().iter().filter(|p| p.red() > 0).count();
        assert!(lit > 0);
        assert_eq!(target.pixels()[0].red(), 0);
    }
}
