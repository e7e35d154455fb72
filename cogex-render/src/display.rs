use crate::error::RenderError;
use cogex_timing::{HighPrecisionTimer, Timer};
use std::time::Duration;
use tiny_skia::{Color, Pixmap};

/// Key input observed between two polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Escape or a window close request
    Escape,
    Other,
}

/// A frame sink with a back buffer, blocking sync points and key input.
pub trait Display {
    fn size(&self) -> (u32, u32);

    /// Back buffer stimuli draw into; cleared after every flip.
    fn canvas(&mut self) -> &mut Pixmap;

    /// Submits queued rendering work without waiting for it.
    fn flush(&mut self);

    /// Blocks until all submitted rendering work has completed.
    fn finish(&mut self);

    /// Presents the back buffer, blocks until the next refresh and returns
    /// the flip time in seconds.
    fn flip(&mut self) -> Result<f64, RenderError>;

    fn clear_events(&mut self);

    /// Keys pressed since the last `clear_events` or `poll_keys`.
    fn poll_keys(&mut self) -> Vec<KeyPress>;

    /// Nominal refresh period, when known.
    fn refresh_period(&self) -> Option<Duration>;
}

/// In-memory display for headless runs and tests.
///
/// Rendering is CPU-only so `flush`/`finish` have nothing to wait on. With a
/// refresh period `flip` sleeps until the next period boundary, otherwise it
/// returns immediately.
pub struct OffscreenDisplay {
    canvas: Pixmap,
    background: Color,
    timer: HighPrecisionTimer,
    period: Option<Duration>,
    next_flip: Option<u64>,
    frames_since_clear: usize,
    scripted_keys: Vec<(usize, KeyPress)>,
    pending: Vec<KeyPress>,
}

impl OffscreenDisplay {
    pub fn new(width: u32, height: u32, timer: HighPrecisionTimer) -> Result<Self, RenderError> {
        let mut canvas =
            Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        let background = Color::BLACK;
        canvas.fill(background);
        Ok(Self {
            canvas,
            background,
            timer,
            period: None,
            next_flip: None,
            frames_since_clear: 0,
            scripted_keys: Vec::new(),
            pending: Vec::new(),
        })
    }

    /// Paces flips to `hz` refreshes per second.
    pub fn with_refresh_rate(mut self, hz: f64) -> Self {
        self.period = (hz > 0.0).then(|| Duration::from_secs_f64(1.0 / hz));
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self.canvas.fill(color);
        self
    }

    /// Reports `key` once `frames` flips have happened since the last
    /// `clear_events`.
    pub fn with_key_after(mut self, frames: usize, key: KeyPress) -> Self {
        self.scripted_keys.push((frames, key));
        self
    }

    fn pace(&mut self) {
        let Some(period) = self.period else {
            return;
        };
        let period_ns = period.as_nanos() as u64;
        let now = self.timer.now();
        let due = self.next_flip.unwrap_or(now);
        if due > now {
            self.timer.sleep(Duration::from_nanos(due - now));
        }
        // a late flip starts a new cadence instead of bursting to catch up
        let flipped = self.timer.now();
        self.next_flip = Some(due.max(flipped.saturating_sub(period_ns / 2)) + period_ns);
    }
}

impl Display for OffscreenDisplay {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn canvas(&mut self) -> &mut Pixmap {
        &mut self.canvas
    }

    fn flush(&mut self) {}

    fn finish(&mut self) {}

    fn flip(&mut self) -> Result<f64, RenderError> {
        self.pace();
        let now = self.timer.now();
        self.canvas.fill(self.background);

        self.frames_since_clear += 1;
        let frames = self.frames_since_clear;
        self.pending.extend(
            self.scripted_keys
                .iter()
                .filter(|(at, _)| *at == frames)
                .map(|(_, key)| *key),
        );
        Ok(self.timer.seconds(now))
    }

    fn clear_events(&mut self) {
        self.pending.clear();
        self.frames_since_clear = 0;
    }

    fn poll_keys(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut self.pending)
    }

    fn refresh_period(&self) -> Option<Duration> {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_clears_the_canvas() {
        let mut display = OffscreenDisplay::new(4, 4, HighPrecisionTimer::new()).unwrap();
        display.canvas().fill(Color::WHITE);
        display.flip().unwrap();
        assert_eq!(display.canvas().pixel(0, 0).unwrap().red(), 0);
    }

    #[test]
    fn scripted_key_appears_after_n_frames() {
        let mut display = OffscreenDisplay::new(4, 4, HighPrecisionTimer::new())
            .unwrap()
            .with_key_after(3, KeyPress::Other);
        display.clear_events();
        display.flip().unwrap();
        display.flip().unwrap();
        assert!(display.poll_keys().is_empty());
        display.flip().unwrap();
        assert_eq!(display.poll_keys(), vec![KeyPress::Other]);
        assert!(display.poll_keys().is_empty());
    }

    #[test]
    fn paced_flips_are_a_period_apart() {
        let mut display = OffscreenDisplay::new(4, 4, HighPrecisionTimer::new())
            .unwrap()
            .with_refresh_rate(200.0);
        let first = display.flip().unwrap();
        let mut last = first;
        for _ in 0..5 {
            last = display.flip().unwrap();
        }
        assert!(last - first >= 0.024);
        assert_eq!(display.refresh_period(), Some(Duration::from_millis(5)));
    }
}
