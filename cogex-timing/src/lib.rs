pub mod ring;
pub mod timer;

pub use ring::SampleRing;
pub use timer::{FrameStats, HighPrecisionTimer, Timer};
