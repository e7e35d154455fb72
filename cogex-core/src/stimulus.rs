use serde::{Deserialize, Serialize};
use std::fmt;

/// The two text rendering strategies under comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StimulusKind {
    /// Whole paragraph rasterized into one pixmap whenever the text changes
    TextStim,
    /// Glyph-atlas box: layout on change, per-glyph blits on every draw
    TextBox,
}

impl StimulusKind {
    pub const ALL: [StimulusKind; 2] = [StimulusKind::TextStim, StimulusKind::TextBox];

    pub fn name(&self) -> &'static str {
        match self {
            StimulusKind::TextStim => "TextStim",
            StimulusKind::TextBox => "TextBox",
        }
    }
}

impl fmt::Display for StimulusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_display() {
        for kind in StimulusKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn serializes_as_plain_variant_name() {
        let json = serde_json::to_string(&StimulusKind::TextBox).unwrap();
        assert_eq!(json, "\"TextBox\"");
    }
}
