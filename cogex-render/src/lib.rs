pub mod display;
pub mod error;
pub mod font;
pub mod glyph_cache;
pub mod layout;
pub mod stimulus;
pub mod text_box;
pub mod text_stim;

pub use display::{Display, KeyPress, OffscreenDisplay};
pub use error::RenderError;
pub use font::{find_font, load_font_file, LoadedFont};
pub use stimulus::TextStimulus;
pub use text_box::{TextBox, TextBoxParams};
pub use text_stim::{TextStim, TextStimParams};
