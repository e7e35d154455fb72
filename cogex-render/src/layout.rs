use ab_glyph::{point, Font, Glyph, GlyphId, PxScale, ScaleFont};

/// Positioned glyphs of a word-wrapped paragraph.
///
/// Coordinates are relative to the paragraph's top-left corner; each glyph
/// position is on its line's baseline.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub glyphs: Vec<Glyph>,
    pub width: f32,
    pub height: f32,
    pub lines: usize,
}

/// Lays out `text` at `px_height`, wrapping at spaces so no line is wider
/// than `wrap_width`. Words longer than a whole line are broken between
/// characters. Explicit newlines always start a new line.
pub fn layout_paragraph<F: Font>(
    font: &F,
    text: &str,
    px_height: f32,
    wrap_width: Option<f32>,
) -> Layout {
    let scale = PxScale::from(px_height);
    let sf = font.as_scaled(scale);
    let line_height = sf.height() + sf.line_gap();
    let ascent = sf.ascent();
    let space_id = font.glyph_id(' ');
    let space_advance = sf.h_advance(space_id);

    let mut glyphs = Vec::with_capacity(text.len());
    let mut line = 0usize;
    let mut caret = 0.0f32;
    let mut width = 0.0f32;

    for (p, paragraph) in text.split('\n').enumerate() {
        if p > 0 {
            caret = 0.0;
            line += 1;
        }
        for (w, word) in paragraph.split(' ').enumerate() {
            if w > 0 {
                caret += space_advance;
            }
            if word.is_empty() {
                continue;
            }
            if let Some(limit) = wrap_width {
                let word_width = measure(font, scale, word);
                if caret > 0.0 && caret + word_width > limit && word_width <= limit {
                    caret = 0.0;
                    line += 1;
                }
            }

            let mut prev: Option<GlyphId> = None;
            for ch in word.chars() {
                let id = font.glyph_id(ch);
                if let Some(prev_id) = prev {
                    caret += sf.kern(prev_id, id);
                }
                let advance = sf.h_advance(id);
                if let Some(limit) = wrap_width {
                    if caret > 0.0 && caret + advance > limit {
                        caret = 0.0;
                        line += 1;
                    }
                }
                glyphs.push(Glyph {
                    id,
                    scale,
                    position: point(caret, line as f32 * line_height + ascent),
                });
                caret += advance;
                width = width.max(caret);
                prev = Some(id);
            }
        }
    }

    let lines = line + 1;
    Layout {
        glyphs,
        width,
        height: lines as f32 * line_height,
        lines,
    }
}

fn measure<F: Font>(font: &F, scale: PxScale, word: &str) -> f32 {
    let sf = font.as_scaled(scale);
    let mut prev: Option<GlyphId> = None;
    let mut w = 0.0;
    for ch in word.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev_id) = prev {
            w += sf.kern(prev_id, id);
        }
        w += sf.h_advance(id);
        prev = Some(id);
    }
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::any_system_font;

    #[test]
    fn wrapped_lines_stay_within_width() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let font = loaded.font.as_ref();
        let text = "AAA BBBBB C DDDDDDD EEE FFFFF GG HHHHHHHHH I JJJ KKKKK LLL";
        let layout = layout_paragraph(font, text, 32.0, Some(200.0));
        assert!(layout.lines > 1);
        assert!(layout.width <= 200.0 + 0.01);
        let sf = font.as_scaled(PxScale::from(32.0));
        for g in &layout.glyphs {
            assert!(g.position.x + sf.h_advance(g.id) <= 200.0 + 0.01);
        }
    }

    #[test]
    fn unwrapped_text_is_one_line() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let layout = layout_paragraph(loaded.font.as_ref(), "HELLO WORLD", 24.0, None);
        assert_eq!(layout.lines, 1);
        assert_eq!(layout.glyphs.len(), 10);
        assert!(layout.height > 0.0);
    }

    #[test]
    fn newline_starts_a_line() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let layout = layout_paragraph(loaded.font.as_ref(), "AB\nCD", 24.0, None);
        assert_eq!(layout.lines, 2);
        assert!(layout.glyphs[2].position.y > layout.glyphs[0].position.y);
    }
}
