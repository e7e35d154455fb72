pub mod config;
pub mod error;
pub mod measure;
pub mod report;
pub mod session;
pub mod timings;

pub use config::BenchConfig;
pub use error::BenchError;
pub use measure::{timed_update, BenchRunner, OrderRun};
pub use report::Report;
pub use session::StimulusPair;
pub use timings::{DrawTimings, InitDurations};
