use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::timings::DrawTimings;
use cogex_core::{random_text, Condition, DrawOrder};
use cogex_render::{Display, KeyPress, RenderError, TextStimulus};
use cogex_timing::{FrameStats, Timer};
use rand::Rng;
use std::time::Duration;

/// Sets `text` (when given and non-empty), draws, then blocks on the
/// display's `finish` before stopping the clock. Returns milliseconds.
pub fn timed_update<D, T>(
    stim: &mut dyn TextStimulus,
    text: Option<&str>,
    display: &mut D,
    timer: &T,
) -> Result<f64, BenchError>
where
    D: Display + ?Sized,
    T: Timer,
{
    let start = timer.now();
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        stim.set_text(text)?;
    }
    stim.draw(display.canvas())?;
    display.finish();
    Ok(timer.elapsed(start).as_secs_f64() * 1000.0)
}

/// Outcome of one draw-order run
#[derive(Debug, Clone)]
pub struct OrderRun {
    pub order: DrawOrder,
    pub frames: usize,
    /// Flip time (s) right before the first frame
    pub start: f64,
    /// Flip time (s) of the last frame
    pub end: f64,
    pub frame_stats: FrameStats,
    /// Stopped by a key press rather than the flip limit
    pub interrupted: bool,
    /// The key was Escape: remaining orders should be skipped
    pub escaped: bool,
}

/// Owns the display, clock and text source for a benchmark session
pub struct BenchRunner<D, T, R>
where
    D: Display,
    T: Timer,
    R: Rng,
{
    pub display: D,
    pub timer: T,
    pub rng: R,
    pub config: BenchConfig,
}

impl<D, T, R> BenchRunner<D, T, R>
where
    D: Display,
    T: Timer,
    R: Rng,
{
    pub fn new(config: BenchConfig, display: D, timer: T, rng: R) -> Self {
        Self {
            display,
            timer,
            rng,
            config,
        }
    }

    /// Builds a stimulus and draws it once, timing both.
    pub fn time_init<F>(&mut self, build: F) -> Result<(Box<dyn TextStimulus>, f64), BenchError>
    where
        F: FnOnce((u32, u32)) -> Result<Box<dyn TextStimulus>, RenderError>,
    {
        let window = self.display.size();
        let start = self.timer.now();
        let mut stim = build(window)?;
        stim.draw(self.display.canvas())?;
        let ms = self.timer.elapsed(start).as_secs_f64() * 1000.0;
        log::info!("{} init took {:.3} ms", stim.kind(), ms);
        Ok((stim, ms))
    }

    /// Runs frames until a key press or `max_flips`, alternating text-change
    /// and draw-only frames for `first` then `second`.
    pub fn run_order(
        &mut self,
        order: DrawOrder,
        first: &mut dyn TextStimulus,
        second: &mut dyn TextStimulus,
        timings: &mut DrawTimings,
    ) -> Result<OrderRun, BenchError> {
        let change_every = self.config.change_every;
        let max_flips = self.config.max_flips;
        let text_length = self.config.text_length;

        timings.clear();
        self.timer.clear_frames();
        let start = self.display.flip()?;
        self.display.clear_events();
        log::info!("running {} then {}", first.kind(), second.kind());

        let mut frames = 0usize;
        let mut last_flip = start;
        let mut interrupted = false;
        let mut escaped = false;

        loop {
            // keep earlier work out of this frame's measurements
            self.display.flush();
            self.display.finish();

            let condition = Condition::for_frame(frames, change_every);
            let (first_ms, second_ms) = match condition {
                Condition::TextChange => {
                    let text = format!("{}{}", first.kind(), random_text(&mut self.rng, text_length));
                    let a = timed_update(first, Some(&text), &mut self.display, &self.timer)?;
                    let text = format!("{}{}", second.kind(), random_text(&mut self.rng, text_length));
                    let b = timed_update(second, Some(&text), &mut self.display, &self.timer)?;
                    (a, b)
                }
                Condition::NoChange => {
                    let a = timed_update(first, None, &mut self.display, &self.timer)?;
                    let b = timed_update(second, None, &mut self.display, &self.timer)?;
                    (a, b)
                }
            };
            timings.record(condition, first_ms, second_ms);

            let flip = self.display.flip()?;
            self.timer
                .record_frame(Duration::from_secs_f64((flip - last_flip).max(0.0)));
            last_flip = flip;
            frames += 1;

            let keys = self.display.poll_keys();
            if !keys.is_empty() {
                interrupted = true;
                escaped = keys.contains(&KeyPress::Escape);
                break;
            }
            if frames >= max_flips {
                break;
            }
        }

        log::info!(
            "{} then {}: {} frames in {:.3} s{}",
            first.kind(),
            second.kind(),
            frames,
            last_flip - start,
            if interrupted { " (interrupted)" } else { "" }
        );

        Ok(OrderRun {
            order,
            frames,
            start,
            end: last_flip,
            frame_stats: self.timer.frame_stats(self.display.refresh_period()),
            interrupted,
            escaped,
        })
    }
}
