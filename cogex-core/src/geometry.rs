use serde::{Deserialize, Serialize};

/// Coordinate units for stimulus placement.
///
/// Positions are relative to the window center with y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Pix,
    /// Fractions of the window height
    Height,
}

impl Units {
    pub fn to_pixels(&self, value: f32, window_height: u32) -> f32 {
        match self {
            Units::Pix => value,
            Units::Height => value * window_height as f32,
        }
    }

    /// Maps a center-origin, y-up position to top-left-origin screen pixels.
    pub fn to_screen(&self, pos: (f32, f32), window: (u32, u32)) -> (f32, f32) {
        let x = self.to_pixels(pos.0, window.1);
        let y = self.to_pixels(pos.1, window.1);
        (window.0 as f32 / 2.0 + x, window.1 as f32 / 2.0 - y)
    }
}

/// Which point of a box its position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    fn fractions(&self) -> (f32, f32) {
        match self {
            Anchor::Center => (0.5, 0.5),
            Anchor::TopLeft => (0.0, 0.0),
            Anchor::TopCenter => (0.5, 0.0),
            Anchor::TopRight => (1.0, 0.0),
            Anchor::CenterLeft => (0.0, 0.5),
            Anchor::CenterRight => (1.0, 0.5),
            Anchor::BottomLeft => (0.0, 1.0),
            Anchor::BottomCenter => (0.5, 1.0),
            Anchor::BottomRight => (1.0, 1.0),
        }
    }

    /// Top-left corner of a `size` box whose anchor sits at `screen_pos`.
    pub fn top_left(&self, screen_pos: (f32, f32), size: (f32, f32)) -> (f32, f32) {
        let (fx, fy) = self.fractions();
        (screen_pos.0 - size.0 * fx, screen_pos.1 - size.1 * fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pix_units_are_center_origin_y_up() {
        let p = Units::Pix.to_screen((0.0, 300.0), (1920, 1080));
        assert_eq!(p, (960.0, 240.0));
    }

    #[test]
    fn height_units_scale_with_window_height() {
        assert_eq!(Units::Height.to_pixels(0.03, 1000), 30.0);
        let p = Units::Height.to_screen((0.0, -0.25), (1920, 1080));
        assert_eq!(p, (960.0, 810.0));
    }

    #[test]
    fn anchors_offset_the_box() {
        let size = (100.0, 40.0);
        assert_eq!(Anchor::Center.top_left((500.0, 500.0), size), (450.0, 480.0));
        assert_eq!(Anchor::TopLeft.top_left((500.0, 500.0), size), (500.0, 500.0));
        assert_eq!(Anchor::BottomRight.top_left((500.0, 500.0), size), (400.0, 460.0));
    }
}
