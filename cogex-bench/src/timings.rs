use cogex_core::{Condition, StimulusKind};
use cogex_timing::SampleRing;
use serde::Serialize;

/// Draw durations (ms) of both stimuli, split by condition.
///
/// `first`/`second` follow the draw order of the run that filled them.
#[derive(Debug, Clone)]
pub struct DrawTimings {
    pub first_change: SampleRing,
    pub first_no_change: SampleRing,
    pub second_change: SampleRing,
    pub second_no_change: SampleRing,
}

impl DrawTimings {
    pub fn new(capacity: usize) -> Self {
        Self {
            first_change: SampleRing::new(capacity),
            first_no_change: SampleRing::new(capacity),
            second_change: SampleRing::new(capacity),
            second_no_change: SampleRing::new(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.first_change.clear();
        self.first_no_change.clear();
        self.second_change.clear();
        self.second_no_change.clear();
    }

    pub fn first(&self, condition: Condition) -> &SampleRing {
        match condition {
            Condition::TextChange => &self.first_change,
            Condition::NoChange => &self.first_no_change,
        }
    }

    pub fn second(&self, condition: Condition) -> &SampleRing {
        match condition {
            Condition::TextChange => &self.second_change,
            Condition::NoChange => &self.second_no_change,
        }
    }

    pub fn record(&mut self, condition: Condition, first_ms: f64, second_ms: f64) {
        match condition {
            Condition::TextChange => {
                self.first_change.push(first_ms);
                self.second_change.push(second_ms);
            }
            Condition::NoChange => {
                self.first_no_change.push(first_ms);
                self.second_no_change.push(second_ms);
            }
        }
    }
}

/// Construction plus first draw, in milliseconds, per stimulus kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InitDurations {
    pub text_stim_ms: f64,
    pub text_box_ms: f64,
}

impl InitDurations {
    pub fn get(&self, kind: StimulusKind) -> f64 {
        match kind {
            StimulusKind::TextStim => self.text_stim_ms,
            StimulusKind::TextBox => self.text_box_ms,
        }
    }

    pub fn set(&mut self, kind: StimulusKind, ms: f64) {
        match kind {
            StimulusKind::TextStim => self.text_stim_ms = ms,
            StimulusKind::TextBox => self.text_box_ms = ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_routes_by_condition() {
        let mut t = DrawTimings::new(10);
        t.record(Condition::TextChange, 1.0, 2.0);
        t.record(Condition::NoChange, 3.0, 4.0);
        t.record(Condition::NoChange, 5.0, 6.0);
        assert_eq!(t.first(Condition::TextChange).mean(), Some(1.0));
        assert_eq!(t.second(Condition::TextChange).mean(), Some(2.0));
        assert_eq!(t.first(Condition::NoChange).mean(), Some(4.0));
        assert_eq!(t.second(Condition::NoChange).mean(), Some(5.0));
        t.clear();
        assert!(t.first_no_change.is_empty() && t.second_change.is_empty());
    }

    #[test]
    fn init_lookup_is_by_kind() {
        let mut init = InitDurations::default();
        init.set(StimulusKind::TextBox, 12.0);
        init.set(StimulusKind::TextStim, 34.0);
        assert_eq!(init.get(StimulusKind::TextBox), 12.0);
        assert_eq!(init.get(StimulusKind::TextStim), 34.0);
    }
}
