//! Fixed-capacity ring of timestamped positions.

use nalgebra::Point2;

/// Number of samples a track keeps. Speed compares the previous sample with
/// the current one, so two is the minimum that yields motion.
pub const HISTORY_CAPACITY: usize = 2;

/// One observation of a track: centroid in pixels and timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point2<f32>,
    pub timestamp: f64,
}

impl Sample {
    #[inline]
    pub fn new(position: Point2<f32>, timestamp: f64) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

/// Array-backed ring buffer holding at most `N` samples.
///
/// Pushing into a full ring overwrites the oldest sample. Iteration order is
/// oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionHistory<const N: usize = HISTORY_CAPACITY> {
    slots: [Option<Sample>; N],
    // index the next push writes to
    head: usize,
    len: usize,
}

impl<const N: usize> Default for PositionHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PositionHistory<N> {
    const NON_EMPTY: () = assert!(N > 0, "history capacity must be at least 1");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            slots: [None; N],
            head: 0,
            len: 0,
        }
    }

    /// Appends a sample and returns the one it evicted, if the ring was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = self.slots[self.head].replace(sample);
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Most recent sample.
    #[inline]
    pub fn latest(&self) -> Option<&Sample> {
        self.nth_back(0)
    }

    /// Sample pushed just before the latest one.
    #[inline]
    pub fn previous(&self) -> Option<&Sample> {
        self.nth_back(1)
    }

    /// `n`-th sample counting back from the newest (0 is the newest).
    pub fn nth_back(&self, n: usize) -> Option<&Sample> {
        if n >= self.len {
            return None;
        }
        let idx = (self.head + N - 1 - n) % N;
        self.slots[idx].as_ref()
    }

    /// Iterates from the oldest to the newest sample.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        (0..self.len).rev().filter_map(move |n| self.nth_back(n))
    }

    pub fn clear(&mut self) {
        self.slots = [None; N];
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, t: f64) -> Sample {
        Sample::new(Point2::new(x, 0.0), t)
    }

    #[test]
    fn test_empty_history() {
        let history: PositionHistory = PositionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
        assert!(history.latest().is_none());
        assert!(history.previous().is_none());
        assert_eq!(history.iter().count(), 0);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history: PositionHistory = PositionHistory::new();
        assert_eq!(history.push(sample(1.0, 1.0)), None);
        assert_eq!(history.push(sample(2.0, 2.0)), None);
        assert!(history.is_full());

        let evicted = history.push(sample(3.0, 3.0));
        assert_eq!(evicted, Some(sample(1.0, 1.0)));
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), Some(&sample(3.0, 3.0)));
        assert_eq!(history.previous(), Some(&sample(2.0, 2.0)));
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut history: PositionHistory = PositionHistory::new();
        for i in 0..50 {
            history.push(sample(i as f32, i as f64));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
    }

    #[test]
    fn test_iter_is_oldest_first() {
        let mut history: PositionHistory<3> = PositionHistory::new();
        for i in 0..5 {
            history.push(sample(i as f32, i as f64));
        }
        let xs: Vec<f32> = history.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_single_slot_history() {
        let mut history: PositionHistory<1> = PositionHistory::new();
        history.push(sample(1.0, 1.0));
        history.push(sample(2.0, 2.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest(), Some(&sample(2.0, 2.0)));
        assert!(history.previous().is_none());
    }

    #[test]
    fn test_clear() {
        let mut history: PositionHistory = PositionHistory::new();
        history.push(sample(1.0, 1.0));
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
