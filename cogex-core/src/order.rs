use crate::stimulus::StimulusKind;
use serde::{Deserialize, Serialize};

/// Order in which the two stimuli are updated and drawn within one frame.
///
/// Each benchmark session runs every order once so that a bias caused by
/// drawing first (or second) shows up as a difference between the runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOrder {
    TextBoxFirst,
    TextStimFirst,
}

impl DrawOrder {
    /// Session order: box first, then stim first.
    pub const ALL: [DrawOrder; 2] = [DrawOrder::TextBoxFirst, DrawOrder::TextStimFirst];

    pub fn first(&self) -> StimulusKind {
        match self {
            DrawOrder::TextBoxFirst => StimulusKind::TextBox,
            DrawOrder::TextStimFirst => StimulusKind::TextStim,
        }
    }

    pub fn second(&self) -> StimulusKind {
        match self {
            DrawOrder::TextBoxFirst => StimulusKind::TextStim,
            DrawOrder::TextStimFirst => StimulusKind::TextBox,
        }
    }

    pub fn kinds(&self) -> (StimulusKind, StimulusKind) {
        (self.first(), self.second())
    }
}

/// Whether a frame assigned new text before drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    NoChange,
    TextChange,
}

impl Condition {
    /// Frame 0 and every `change_every`-th frame after it change text.
    pub fn for_frame(frame: usize, change_every: usize) -> Self {
        if frame == 0 || (change_every > 0 && frame % change_every == 0) {
            Condition::TextChange
        } else {
            Condition::NoChange
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Condition::NoChange => "No Txt Change",
            Condition::TextChange => "Txt Change",
        }
    }
}
