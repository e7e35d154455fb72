use crate::error::BenchError;
use crate::measure::BenchRunner;
use crate::report::Report;
use crate::timings::{DrawTimings, InitDurations};
use cogex_core::{random_text, DrawOrder, StimulusKind};
use cogex_render::{Display, LoadedFont, TextBox, TextStim, TextStimulus};
use cogex_timing::Timer;
use rand::Rng;

/// Both stimuli of a session, addressed by kind
pub struct StimulusPair {
    pub text_stim: Box<dyn TextStimulus>,
    pub text_box: Box<dyn TextStimulus>,
}

impl StimulusPair {
    pub fn get_mut(&mut self, kind: StimulusKind) -> &mut dyn TextStimulus {
        match kind {
            StimulusKind::TextStim => self.text_stim.as_mut(),
            StimulusKind::TextBox => self.text_box.as_mut(),
        }
    }

    /// (first, second) in `order`
    pub fn ordered(
        &mut self,
        order: DrawOrder,
    ) -> (&mut dyn TextStimulus, &mut dyn TextStimulus) {
        match order {
            DrawOrder::TextBoxFirst => (self.text_box.as_mut(), self.text_stim.as_mut()),
            DrawOrder::TextStimFirst => (self.text_stim.as_mut(), self.text_box.as_mut()),
        }
    }
}

impl<D, T, R> BenchRunner<D, T, R>
where
    D: Display,
    T: Timer,
    R: Rng,
{
    /// Creates both stimuli with one shared random text, timing
    /// construction and first draw of each.
    pub fn bootstrap(
        &mut self,
        font: &LoadedFont,
    ) -> Result<(StimulusPair, InitDurations), BenchError> {
        let text = random_text(&mut self.rng, self.config.text_length);
        log::debug!("bootstrap text: {text:?}");

        let stim_params = self.config.text_stim.clone();
        let (text_stim, stim_ms) = self.time_init(|window| {
            let stim: Box<dyn TextStimulus> =
                Box::new(TextStim::new(font.font.clone(), window, stim_params, &text)?);
            Ok(stim)
        })?;

        let box_params = self.config.text_box.clone();
        let (text_box, box_ms) = self.time_init(|window| {
            let stim: Box<dyn TextStimulus> =
                Box::new(TextBox::new(font.font.clone(), window, box_params, &text)?);
            Ok(stim)
        })?;

        let mut init = InitDurations::default();
        init.set(StimulusKind::TextStim, stim_ms);
        init.set(StimulusKind::TextBox, box_ms);
        Ok((StimulusPair { text_stim, text_box }, init))
    }

    /// Runs every draw order once and reports each. An Escape press ends
    /// the session after the report of the order it interrupted.
    pub fn run_session(
        &mut self,
        pair: &mut StimulusPair,
        init: &InitDurations,
    ) -> Result<Vec<Report>, BenchError> {
        let mut timings = DrawTimings::new(self.config.buffer_capacity);
        let mut reports = Vec::with_capacity(DrawOrder::ALL.len());

        for order in DrawOrder::ALL {
            let (first, second) = pair.ordered(order);
            let run = self.run_order(order, first, second, &mut timings)?;
            reports.push(Report::new(&run, &timings, init, &self.config));
            if run.escaped {
                log::warn!("escape pressed, skipping remaining draw orders");
                break;
            }
        }

        Ok(reports)
    }
}
