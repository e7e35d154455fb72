use crate::config::BenchConfig;
use crate::measure::OrderRun;
use crate::timings::{DrawTimings, InitDurations};
use cogex_core::{Condition, DrawOrder, StimulusKind};
use cogex_timing::FrameStats;
use serde::Serialize;
use std::fmt;

const LABEL: usize = 32;
const COLUMN: usize = 16;

/// Summary of one draw-order run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub order: DrawOrder,
    pub first: StimulusKind,
    pub second: StimulusKind,
    pub text_length: usize,
    pub first_init_secs: f64,
    pub second_init_secs: f64,
    pub change_percent: f64,
    pub frames: usize,
    pub duration_secs: f64,
    /// `None` when the run took no measurable time
    pub fps: Option<f64>,
    pub first_no_change_ms: Option<f64>,
    pub first_change_ms: Option<f64>,
    pub second_no_change_ms: Option<f64>,
    pub second_change_ms: Option<f64>,
    pub frame_stats: FrameStats,
    pub interrupted: bool,
}

impl Report {
    pub fn new(
        run: &OrderRun,
        timings: &DrawTimings,
        init: &InitDurations,
        config: &BenchConfig,
    ) -> Self {
        let (first, second) = run.order.kinds();
        let duration_secs = run.end - run.start;
        Self {
            order: run.order,
            first,
            second,
            text_length: config.text_length,
            first_init_secs: init.get(first) / 1000.0,
            second_init_secs: init.get(second) / 1000.0,
            change_percent: config.change_percent(),
            frames: run.frames,
            duration_secs,
            fps: (duration_secs > 0.0).then(|| run.frames as f64 / duration_secs),
            first_no_change_ms: timings.first(Condition::NoChange).mean(),
            first_change_ms: timings.first(Condition::TextChange).mean(),
            second_no_change_ms: timings.second(Condition::NoChange).mean(),
            second_change_ms: timings.second(Condition::TextChange).mean(),
            frame_stats: run.frame_stats.clone(),
            interrupted: run.interrupted,
        }
    }

    /// First over second mean draw time for `condition`.
    pub fn ratio(&self, condition: Condition) -> Option<f64> {
        let (a, b) = match condition {
            Condition::NoChange => (self.first_no_change_ms, self.second_no_change_ms),
            Condition::TextChange => (self.first_change_ms, self.second_change_ms),
        };
        match (a, b) {
            (Some(a), Some(b)) if b != 0.0 => Some(a / b),
            _ => None,
        }
    }
}

fn num(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = |label: &str| format!("{label:<LABEL$}");

        writeln!(f)?;
        writeln!(f, "-------Text Draw Duration Test---------")?;
        writeln!(f)?;
        writeln!(f, "+ Draw Order: {} then {}", self.first, self.second)?;
        writeln!(f, "{}{}", line("+ Text Stim Char Length:"), self.text_length)?;
        writeln!(
            f,
            "{}{:.3}",
            line(&format!("+ {} INIT Dur (secs):", self.first)),
            self.first_init_secs
        )?;
        if self.second != self.first {
            writeln!(
                f,
                "{}{:.3}",
                line(&format!("+ {} INIT Dur (secs):", self.second)),
                self.second_init_secs
            )?;
        }
        writeln!(f, "{}{:.2} %", line("+ Text Change Flip Perc:"), self.change_percent)?;
        writeln!(f)?;
        writeln!(f, "{}{}", line("+ Total Flip Count:"), self.frames)?;
        writeln!(f, "{}{:.3}", line("+ Test Duration (secs):"), self.duration_secs)?;
        writeln!(f, "{}{}", line("+ FPS:"), num(self.fps))?;
        writeln!(f)?;
        writeln!(f, "+ Average Draw Call Durations (msec):")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<COLUMN$}{:<COLUMN$}{}",
            "Text Object",
            Condition::NoChange.label(),
            Condition::TextChange.label()
        )?;
        writeln!(f)?;
        for (kind, no_change, change) in [
            (self.first, self.first_no_change_ms, self.first_change_ms),
            (self.second, self.second_no_change_ms, self.second_change_ms),
        ] {
            writeln!(
                f,
                "{:<COLUMN$}{:<COLUMN$}{}",
                kind.name(),
                num(no_change),
                num(change)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "+ {} / {} Draw Time Ratio:", self.first, self.second)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<8}{:<COLUMN$}{}",
            "",
            Condition::NoChange.label(),
            Condition::TextChange.label()
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<8}{:<COLUMN$}{}",
            "Ratio",
            num(self.ratio(Condition::NoChange)),
            num(self.ratio(Condition::TextChange))
        )?;
        writeln!(f)?;

        let ms = |ns: f64| ns / 1e6;
        writeln!(
            f,
            "+ Flip Interval (msec): mean {:.3}  jitter {:.3}  min {:.3}  max {:.3}",
            ms(self.frame_stats.average_frame_time_ns),
            ms(self.frame_stats.jitter_ns),
            ms(self.frame_stats.min_frame_time_ns),
            ms(self.frame_stats.max_frame_time_ns)
        )?;
        writeln!(f, "{}{}", line("+ Dropped Frames:"), self.frame_stats.dropped_frames)?;
        if self.interrupted {
            writeln!(f, "+ Stopped early by key press")?;
        }
        writeln!(f)?;
        write!(f, "---------------------------------------")
    }
}
