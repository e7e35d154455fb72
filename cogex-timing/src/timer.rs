use crate::ring::SampleRing;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Trait for high-precision timers
pub trait Timer: Clone {
    type Timestamp: Copy + Clone;
    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    /// Seconds since the timer epoch for a timestamp.
    fn seconds(&self, ts: Self::Timestamp) -> f64;
    fn sleep(&self, d: Duration);
    fn record_frame(&mut self, d: Duration);
    fn frame_count(&self) -> usize;
    fn clear_frames(&mut self);
    /// Stats over recorded frame intervals. With a nominal refresh period,
    /// intervals longer than 1.5 periods count as dropped frames.
    fn frame_stats(&self, nominal: Option<Duration>) -> FrameStats;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub average_frame_time_ns: f64,
    pub jitter_ns: f64,
    pub min_frame_time_ns: f64,
    pub max_frame_time_ns: f64,
    pub effective_fps: f64,
    pub dropped_frames: usize,
}

/// Platform-specific high-precision timer.
///
/// Clones share the same epoch, so timestamps taken from any clone are
/// comparable.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
    pub frame_times: SampleRing<Duration>,
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn seconds(&self, ts: u64) -> f64 {
        ts as f64 / 1e9
    }
    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
    fn record_frame(&mut self, d: Duration) {
        self.frame_times.push(d);
    }
    fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
    fn clear_frames(&mut self) {
        self.frame_times.clear();
    }
    fn frame_stats(&self, nominal: Option<Duration>) -> FrameStats {
        let times: Vec<f64> = self
            .frame_times
            .iter()
            .map(|d| d.as_nanos() as f64)
            .collect();
        if times.is_empty() {
            return FrameStats::default();
        }
        let sum: f64 = times.iter().sum();
        let avg = sum / times.len() as f64;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / times.len() as f64;
        let jitter = var.sqrt();
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let dropped_frames = nominal
            .map(|period| {
                let limit = period.as_nanos() as f64 * 1.5;
                times.iter().filter(|&&t| t > limit).count()
            })
            .unwrap_or(0);
        FrameStats {
            average_frame_time_ns: avg,
            jitter_ns: jitter,
            min_frame_time_ns: min,
            max_frame_time_ns: max,
            effective_fps: if avg > 0.0 { 1e9 / avg } else { 0.0 },
            dropped_frames,
        }
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self::with_frame_capacity(1000)
    }

    pub fn with_frame_capacity(max_samples: usize) -> Self {
        Self {
            start: Instant::now(),
            frame_times: SampleRing::new(max_samples),
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "windows")]
        self.windows_sleep(duration);
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(target_os = "macos")]
        self.macos_sleep(duration);
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "windows")]
    fn windows_sleep(&self, duration: Duration) {
        use windows::core::PCWSTR;
        use windows::Win32::Foundation::{CloseHandle, BOOL};
        use windows::Win32::System::Threading::{
            CreateWaitableTimerW, SetWaitableTimer, WaitForSingleObject, INFINITE,
        };

        unsafe {
            let Ok(timer) = CreateWaitableTimerW(None, BOOL::from(true), PCWSTR::null()) else {
                std::thread::sleep(duration);
                return;
            };

            // negative due time is relative, in 100ns intervals
            let due_time = -((duration.as_nanos() / 100) as i64);

            if SetWaitableTimer(timer, &due_time, 0, None, None, BOOL::from(false)).is_ok() {
                WaitForSingleObject(timer, INFINITE);
            }

            let _ = CloseHandle(timer);
        }
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }

    #[cfg(target_os = "macos")]
    fn macos_sleep(&self, duration: Duration) {
        use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};
        use std::thread;

        if duration.as_nanos() < 100_000 {
            unsafe {
                let start = mach_absolute_time();
                let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
                mach_timebase_info(&mut timebase);

                let target_ticks =
                    duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;

                while mach_absolute_time() - start < target_ticks {
                    std::hint::spin_loop();
                }
            }
        } else {
            thread::sleep(duration);
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let t = timer.now();
        timer.sleep(Duration::from_millis(2));
        assert!(timer.elapsed(t) >= Duration::from_millis(1));
        assert!(timer.now() >= t);
    }

    #[test]
    fn clones_share_epoch() {
        let timer = HighPrecisionTimer::new();
        let clone = timer.clone();
        let a = timer.now();
        let b = clone.now();
        assert!(b >= a);
    }

    #[test]
    fn frame_stats_count_dropped_frames() {
        let mut timer = HighPrecisionTimer::with_frame_capacity(16);
        for ms in [16, 17, 16, 40, 17] {
            timer.record_frame(Duration::from_millis(ms));
        }
        let stats = timer.frame_stats(Some(Duration::from_micros(16_667)));
        assert_eq!(stats.dropped_frames, 1);
        assert_eq!(stats.min_frame_time_ns, 16_000_000.0);
        assert_eq!(stats.max_frame_time_ns, 40_000_000.0);
        assert!(stats.jitter_ns > 0.0);

        timer.clear_frames();
        assert_eq!(timer.frame_count(), 0);
        assert_eq!(timer.frame_stats(None), FrameStats::default());
    }
}
