//! Cumulative per-folder progress tracking

/// Running counter of pages completed out of pages total, reporting
/// each crossed decile exactly once.
#[derive(Debug)]
pub struct ProgressTracker {
    total: u32,
    done: u32,
    last_decile: u32,
}

impl ProgressTracker {
    /// Track progress over `total` pages
    pub fn new(total: u32) -> Self {
        Self {
            total,
            done: 0,
            last_decile: 0,
        }
    }

    /// Record `pages` more completed pages and return the decile
    /// percentages (10, 20, ... 100) crossed by this advance.
    pub fn advance(&mut self, pages: u32) -> Vec<u32> {
        if self.total == 0 {
            return Vec::new();
        }

        self.done = (self.done + pages).min(self.total);
        let percent = self.done as u64 * 100 / self.total as u64;
        let decile = (percent / 10) as u32;

        let crossed = (self.last_decile + 1..=decile).map(|d| d * 10).collect();
        self.last_decile = decile;
        crossed
    }

    /// Percentage of pages completed so far
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            100
        } else {
            (self.done as u64 * 100 / self.total as u64) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deciles_crossed_once_each() {
        let mut tracker = ProgressTracker::new(10);
        let mut crossed = Vec::new();
        for _ in 0..10 {
            crossed.extend(tracker.advance(1));
        }
        assert_eq!(crossed, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn test_large_advance_reports_every_skipped_decile() {
        let mut tracker = ProgressTracker::new(4);
        assert_eq!(tracker.advance(2), vec![10, 20, 30, 40, 50]);
        assert_eq!(tracker.advance(2), vec![60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_sub_decile_advances_report_nothing() {
        let mut tracker = ProgressTracker::new(100);
        assert_eq!(tracker.advance(9), Vec::<u32>::new());
        assert_eq!(tracker.advance(1), vec![10]);
        // Re-crossing a decile never repeats it.
        assert_eq!(tracker.advance(5), Vec::<u32>::new());
    }

    #[test]
    fn test_empty_folder_reports_nothing() {
        let mut tracker = ProgressTracker::new(0);
        assert_eq!(tracker.advance(1), Vec::<u32>::new());
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let mut tracker = ProgressTracker::new(3);
        assert_eq!(tracker.advance(5), vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(tracker.percent(), 100);
    }
}
