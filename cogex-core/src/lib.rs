pub mod geometry;
pub mod order;
pub mod stimulus;
pub mod text;

pub use geometry::{Anchor, Units};
pub use order::{Condition, DrawOrder};
pub use stimulus::StimulusKind;
pub use text::{random_text, CHAR_PALETTE, WORD_LENGTHS};
