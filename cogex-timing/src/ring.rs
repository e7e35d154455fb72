use std::collections::VecDeque;
use std::time::Duration;

/// Fixed-capacity sample buffer. Once full, every push evicts the oldest
/// sample, so the contents are always the most recent `capacity` values in
/// insertion order.
#[derive(Debug, Clone)]
pub struct SampleRing<T = f64> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> SampleRing<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.samples.iter()
    }
}

impl SampleRing<f64> {
    /// Arithmetic mean, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

impl SampleRing<Duration> {
    pub fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent_samples_in_order() {
        let mut ring = SampleRing::new(4);
        for i in 0..10 {
            ring.push(i as f64);
        }
        assert_eq!(ring.len(), 4);
        let kept: Vec<f64> = ring.iter().copied().collect();
        assert_eq!(kept, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn clear_empties_and_mean_is_none() {
        let mut ring = SampleRing::new(6000);
        ring.push(1.0);
        ring.push(3.0);
        assert_eq!(ring.mean(), Some(2.0));
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.mean(), None);
        assert_eq!(ring.capacity(), 6000);
    }

    #[test]
    fn below_capacity_nothing_is_evicted() {
        let mut ring = SampleRing::new(6000);
        for _ in 0..480 {
            ring.push(0.5);
        }
        assert_eq!(ring.len(), 480);
        assert_eq!(ring.mean(), Some(0.5));
    }

    #[test]
    fn duration_mean() {
        let mut ring = SampleRing::new(3);
        ring.push(Duration::from_millis(10));
        ring.push(Duration::from_millis(20));
        assert_eq!(ring.mean(), Some(Duration::from_millis(15)));
    }
}
