use crate::error::RenderError;
use cogex_core::StimulusKind;
use tiny_skia::Pixmap;

/// A text stimulus whose text can be swapped and which draws onto a frame.
pub trait TextStimulus {
    fn kind(&self) -> StimulusKind;
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str) -> Result<(), RenderError>;
    fn draw(&mut self, target: &mut Pixmap) -> Result<(), RenderError>;
}

impl<T: TextStimulus + ?Sized> TextStimulus for Box<T> {
    fn kind(&self) -> StimulusKind {
        (**self).kind()
    }
    fn text(&self) -> &str {
        (**self).text()
    }
    fn set_text(&mut self, text: &str) -> Result<(), RenderError> {
        (**self).set_text(text)
    }
    fn draw(&mut self, target: &mut Pixmap) -> Result<(), RenderError> {
        (**self).draw(target)
    }
}
