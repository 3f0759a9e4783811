use super::navigation::Direction;

/// Minimum horizontal travel, in points, for a drag to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// Turns a horizontal touch drag into a navigation direction.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
    end_x: Option<f32>,
    has_swiped_once: bool,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
        self.end_x = None;
    }

    pub fn move_to(&mut self, x: f32) {
        if self.start_x.is_some() {
            self.end_x = Some(x);
        }
    }

    /// Abandon the current gesture without interpreting it.
    pub fn reset(&mut self) {
        self.start_x = None;
        self.end_x = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start_x.is_some()
    }

    /// Finish the gesture. A left swipe (positive displacement) means
    /// forward, a right swipe means backward. Trackers reset regardless.
    pub fn finish(&mut self) -> Option<Direction> {
        let start = self.start_x.take();
        let end = self.end_x.take();
        let displacement = start? - end?;

        let direction = if displacement > SWIPE_THRESHOLD {
            Direction::Forward
        } else if displacement < -SWIPE_THRESHOLD {
            Direction::Backward
        } else {
            return None;
        };
        self.has_swiped_once = true;
        Some(direction)
    }

    pub fn has_swiped_once(&self) -> bool {
        self.has_swiped_once
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(from: f32, to: f32) -> Option<Direction> {
        let mut tracker = SwipeTracker::new();
        tracker.begin(from);
        tracker.move_to(to);
        tracker.finish()
    }

    #[test]
    fn test_left_swipe_goes_forward() {
        assert_eq!(swipe(300.0, 100.0), Some(Direction::Forward));
    }

    #[test]
    fn test_right_swipe_goes_backward() {
        assert_eq!(swipe(100.0, 300.0), Some(Direction::Backward));
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(swipe(200.0, 151.0), None);
        assert_eq!(swipe(200.0, 150.0), None);
        assert_eq!(swipe(200.0, 149.0), Some(Direction::Forward));
        assert_eq!(swipe(151.0, 200.0), None);
        assert_eq!(swipe(149.0, 200.0), Some(Direction::Backward));
    }

    #[test]
    fn test_tap_without_move_is_ignored() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(120.0);
        assert_eq!(tracker.finish(), None);
        assert!(!tracker.has_swiped_once());
    }

    #[test]
    fn test_trackers_reset_after_finish() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(300.0);
        tracker.move_to(290.0);
        assert_eq!(tracker.finish(), None);
        assert!(!tracker.is_tracking());

        // A stray move without a new begin must not resurrect the old start.
        tracker.move_to(0.0);
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_uses_last_move_position() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(300.0);
        tracker.move_to(100.0);
        tracker.move_to(280.0);
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_first_swipe_sets_hint_flag() {
        let mut tracker = SwipeTracker::new();
        tracker.begin(10.0);
        tracker.move_to(20.0);
        tracker.finish();
        assert!(!tracker.has_swiped_once());

        tracker.begin(300.0);
        tracker.move_to(0.0);
        tracker.finish();
        assert!(tracker.has_swiped_once());
    }
}
