use ab_glyph::{point, Font, Glyph};
use std::collections::HashMap;
use tiny_skia::PremultipliedColorU8;

/// Coverage bitmap of one rasterized glyph
#[derive(Clone)]
pub struct CachedGlyph {
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
}

#[derive(Hash, Eq, PartialEq, Clone, Copy)]
struct GlyphCacheKey {
    glyph_id: u16,
    scale_bits: u32, // f32 bits for exact scale matching
}

impl GlyphCacheKey {
    fn of(glyph: &Glyph) -> Self {
        Self {
            glyph_id: glyph.id.0,
            scale_bits: glyph.scale.y.to_bits(),
        }
    }
}

/// Glyph atlas keyed by glyph id and pixel scale.
///
/// Blank glyphs (spaces, missing outlines) are remembered as `None` so they
/// are only outlined once.
#[derive(Default)]
pub struct GlyphCache {
    map: HashMap<GlyphCacheKey, Option<CachedGlyph>>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self {
            map: HashMap::with_capacity(256),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rasterizes `glyph` unless an entry for its id and scale exists.
    /// Returns whether it was a miss.
    pub fn warm<F: Font>(&mut self, font: &F, glyph: &Glyph) -> bool {
        let key = GlyphCacheKey::of(glyph);
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, rasterize(font, glyph));
        true
    }

    pub fn get(&self, glyph: &Glyph) -> Option<&CachedGlyph> {
        self.map.get(&GlyphCacheKey::of(glyph)).and_then(Option::as_ref)
    }
}

fn rasterize<F: Font>(font: &F, glyph: &Glyph) -> Option<CachedGlyph> {
    let g = Glyph {
        id: glyph.id,
        scale: glyph.scale,
        position: point(0.0, 0.0),
    };
    let outlined = font.outline_glyph(g)?;
    let bounds = outlined.px_bounds();
    let w = bounds.width().ceil() as u32;
    let h = bounds.height().ceil() as u32;
    if w == 0 || h == 0 {
        return None;
    }
    let mut bitmap = vec![0u8; (w * h) as usize];
    outlined.draw(|x, y, cov| {
        if x < w && y < h {
            bitmap[(y * w + x) as usize] = (cov.clamp(0.0, 1.0) * 255.0) as u8;
        }
    });
    Some(CachedGlyph {
        bitmap,
        width: w,
        height: h,
        bearing_x: bounds.min.x.floor() as i32,
        bearing_y: bounds.min.y.floor() as i32,
    })
}

/// Blends a cached glyph at `origin` (baseline position) onto a premultiplied
/// pixel buffer of `w`x`h`, clipping at the edges.
pub fn blit_glyph(
    pixels: &mut [PremultipliedColorU8],
    w: u32,
    h: u32,
    origin: (f32, f32),
    cached: &CachedGlyph,
    color: [u8; 4],
) {
    let [cr, cg, cb, ca] = color;
    let glyph_x = origin.0 as i32 + cached.bearing_x;
    let glyph_y = origin.1 as i32 + cached.bearing_y;

    let wi = w as i32;
    let hi = h as i32;

    let cr_f = cr as f32 / 255.0;
    let cg_f = cg as f32 / 255.0;
    let cb_f = cb as f32 / 255.0;
    let ca_f = ca as f32 / 255.0;

    for gy in 0..cached.height as i32 {
        let py = glyph_y + gy;
        if py < 0 || py >= hi {
            continue;
        }

        let src_row_start = (gy as u32 * cached.width) as usize;
        let dst_row_start = (py as u32 * w) as usize;

        for gx in 0..cached.width as i32 {
            let px = glyph_x + gx;
            if px < 0 || px >= wi {
                continue;
            }

            let coverage = cached.bitmap[src_row_start + gx as usize];
            if coverage == 0 {
                continue;
            }

            let alpha = ca_f * (coverage as f32 / 255.0);
            let dst_idx = dst_row_start + px as usize;

            let out = if alpha >= 0.999 {
                PremultipliedColorU8::from_rgba(cr, cg, cb, 255)
            } else {
                let dst = pixels[dst_idx];
                let src_a = (alpha * 255.0) as u8;
                let inv = 1.0 - alpha;
                let out_a = src_a.max(dst.alpha());
                let r = ((cr_f * alpha * 255.0) + dst.red() as f32 * inv) as u8;
                let g = ((cg_f * alpha * 255.0) + dst.green() as f32 * inv) as u8;
                let b = ((cb_f * alpha * 255.0) + dst.blue() as f32 * inv) as u8;
                PremultipliedColorU8::from_rgba(r.min(out_a), g.min(out_a), b.min(out_a), out_a)
            };
            if let Some(out) = out {
                pixels[dst_idx] = out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::any_system_font;
    use ab_glyph::PxScale;
    use tiny_skia::{Color, Pixmap};

    #[test]
    fn second_warm_is_a_hit() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let font = loaded.font.as_ref();
        let glyph = font.glyph_id('A').with_scale(PxScale::from(32.0));
        let mut cache = GlyphCache::new();
        assert!(cache.warm(font, &glyph));
        assert!(!cache.warm(font, &glyph));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&glyph).is_some());
    }

    #[test]
    fn space_is_cached_as_blank() {
        let Some(loaded) = any_system_font() else {
            return;
        };
        let font = loaded.font.as_ref();
        let glyph = font.glyph_id(' ').with_scale(PxScale::from(32.0));
        let mut cache = GlyphCache::new();
        cache.warm(font, &glyph);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&glyph).is_none());
    }

    #[test]
    fn blit_marks_pixels_and_clips() {
        let cached = CachedGlyph {
            bitmap: vec![255; 16],
            width: 4,
            height: 4,
            bearing_x: 0,
            bearing_y: -4,
        };
        let mut pm = Pixmap::new(8, 8).unwrap();
        pm.fill(Color::BLACK);
        blit_glyph(pm.pixels_mut(), 8, 8, (6.0, 4.0), &cached, [255, 255, 255, 255]);
        let px = pm.pixels();
        assert_eq!(px[6].red(), 255);
        assert_eq!(px[7].red(), 255);
        assert_eq!(px[5].red(), 0);
        assert_eq!(px[4 * 8 + 6].red(), 0);
    }
}
