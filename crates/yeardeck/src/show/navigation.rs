use std::time::{Duration, Instant};

/// Delay between requesting a move and the index actually changing.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(500);

/// Duration of the entrance animation once a slide has settled.
pub const ENTRANCE_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingMove {
    to: usize,
    started: Instant,
    commit_at: Instant,
}

/// Current slide plus at most one in-flight transition.
///
/// A move is requested with [`advance`](Self::advance) or
/// [`retreat`](Self::retreat) and committed by [`tick`](Self::tick) once
/// the transition delay has elapsed.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: usize,
    slide_count: usize,
    direction: Direction,
    delay: Duration,
    pending: Option<PendingMove>,
    settled_at: Option<Instant>,
}

impl Navigator {
    pub fn new(slide_count: usize) -> Self {
        Self::with_delay(slide_count, TRANSITION_DELAY)
    }

    pub fn with_delay(slide_count: usize, delay: Duration) -> Self {
        Self {
            current: 0,
            slide_count,
            direction: Direction::Forward,
            delay,
            pending: None,
            settled_at: None,
        }
    }

    /// Start on `index`, clamped to the deck.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.current = index.min(self.last_index());
        self
    }

    /// Treat the starting slide as having just entered at `now`, so it
    /// plays the same from-right entrance as any later slide.
    pub fn entered_at(mut self, now: Instant) -> Self {
        self.settled_at = Some(now);
        self
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn last_index(&self) -> usize {
        self.slide_count.saturating_sub(1)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.last_index()
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Request a move to the next slide. Returns whether it was accepted.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.is_transitioning() || self.is_last() {
            return false;
        }
        self.begin(self.current + 1, Direction::Forward, now);
        true
    }

    /// Request a move to the previous slide. Returns whether it was accepted.
    pub fn retreat(&mut self, now: Instant) -> bool {
        if self.is_transitioning() || self.is_first() {
            return false;
        }
        self.begin(self.current - 1, Direction::Backward, now);
        true
    }

    fn begin(&mut self, to: usize, direction: Direction, now: Instant) {
        log::debug!(
            "navigation: {:?} {} -> {} requested",
            direction,
            self.current,
            to
        );
        self.direction = direction;
        self.pending = Some(PendingMove {
            to,
            started: now,
            commit_at: now + self.delay,
        });
    }

    /// Commit the pending move once its delay has elapsed.
    /// Returns the newly settled index, if any.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        let pending = self.pending?;
        if now < pending.commit_at {
            return None;
        }
        self.pending = None;
        self.current = pending.to;
        self.settled_at = Some(now);
        log::debug!("navigation: settled on slide {}", self.current);
        Some(self.current)
    }

    /// When the pending move will commit.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.commit_at)
    }

    /// 0.0..=1.0 through the current transition, `None` at rest.
    pub fn transition_progress(&self, now: Instant) -> Option<f32> {
        let pending = self.pending?;
        Some(fraction(now.saturating_duration_since(pending.started), self.delay))
    }

    /// 0.0..=1.0 through the entrance animation of the settled slide.
    /// A navigator that was never given an entry time is treated as fully entered.
    pub fn entrance_progress(&self, now: Instant) -> f32 {
        match self.settled_at {
            Some(at) => fraction(now.saturating_duration_since(at), ENTRANCE_DURATION),
            None => 1.0,
        }
    }

    /// Time since the current slide settled, `None` if it never did.
    pub fn settled_elapsed(&self, now: Instant) -> Option<Duration> {
        self.settled_at.map(|at| now.saturating_duration_since(at))
    }

    /// Drop any in-flight transition without committing it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            log::debug!("navigation: pending transition cancelled");
        }
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_advance_commits_after_delay() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(9);
        assert!(nav.advance(t0));
        assert!(nav.is_transitioning());
        assert_eq!(nav.current_index(), 0);

        assert_eq!(nav.tick(t0 + 499 * MS), None);
        assert_eq!(nav.current_index(), 0);

        assert_eq!(nav.tick(t0 + 500 * MS), Some(1));
        assert_eq!(nav.current_index(), 1);
        assert!(!nav.is_transitioning());
        assert_eq!(nav.direction(), Direction::Forward);
    }

    #[test]
    fn test_retreat_commits_backward() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(9).starting_at(4);
        assert!(nav.retreat(t0));
        assert_eq!(nav.direction(), Direction::Backward);
        assert_eq!(nav.tick(t0 + TRANSITION_DELAY), Some(3));
        assert_eq!(nav.current_index(), 3);
    }

    #[test]
    fn test_advance_at_last_index_is_ignored() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(9).starting_at(8);
        assert!(!nav.advance(t0));
        assert!(!nav.is_transitioning());
        assert_eq!(nav.tick(t0 + TRANSITION_DELAY), None);
        assert_eq!(nav.current_index(), 8);
    }

    #[test]
    fn test_retreat_at_first_index_is_ignored() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(9);
        assert!(!nav.retreat(t0));
        assert!(!nav.is_transitioning());
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_reentrant_moves_are_ignored() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(9).starting_at(3);
        assert!(nav.advance(t0));
        assert!(!nav.advance(t0 + 100 * MS));
        assert!(!nav.retreat(t0 + 200 * MS));
        assert_eq!(nav.direction(), Direction::Forward);
        assert_eq!(nav.tick(t0 + TRANSITION_DELAY), Some(4));
        assert_eq!(nav.tick(t0 + 2 * TRANSITION_DELAY), None);
        assert_eq!(nav.current_index(), 4);
    }

    #[test]
    fn test_every_settled_move_changes_index_by_one() {
        let mut now = Instant::now();
        let mut nav = Navigator::new(5);
        for expected in 1..5 {
            assert!(nav.advance(now));
            now += TRANSITION_DELAY;
            assert_eq!(nav.tick(now), Some(expected));
        }
        for expected in (0..4).rev() {
            assert!(nav.retreat(now));
            now += TRANSITION_DELAY;
            assert_eq!(nav.tick(now), Some(expected));
        }
    }

    #[test]
    fn test_starting_index_is_clamped() {
        let nav = Navigator::new(3).starting_at(12);
        assert_eq!(nav.current_index(), 2);
        assert!(nav.is_last());
    }

    #[test]
    fn test_single_slide_deck_cannot_move() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(1);
        assert!(!nav.advance(t0));
        assert!(!nav.retreat(t0));
    }

    #[test]
    fn test_transition_progress_runs_zero_to_one() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(4);
        assert_eq!(nav.transition_progress(t0), None);
        nav.advance(t0);
        assert_eq!(nav.transition_progress(t0), Some(0.0));
        let half = nav.transition_progress(t0 + 250 * MS).unwrap();
        assert!((half - 0.5).abs() < 1e-3);
        assert_eq!(nav.transition_progress(t0 + 900 * MS), Some(1.0));
    }

    #[test]
    fn test_entrance_progress_after_settle() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(4);
        assert_eq!(nav.entrance_progress(t0), 1.0);
        nav.advance(t0);
        let settled = t0 + TRANSITION_DELAY;
        nav.tick(settled);
        assert_eq!(nav.entrance_progress(settled), 0.0);
        assert_eq!(nav.entrance_progress(settled + ENTRANCE_DURATION), 1.0);
        assert_eq!(
            nav.settled_elapsed(settled + Duration::from_millis(300)),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn test_initial_slide_has_no_settle_time() {
        let nav = Navigator::new(4);
        assert_eq!(nav.settled_elapsed(Instant::now()), None);
    }

    #[test]
    fn test_initial_slide_enters_from_the_right() {
        let t0 = Instant::now();
        let nav = Navigator::new(4).entered_at(t0);
        assert!(!nav.is_transitioning());
        assert_eq!(nav.direction(), Direction::Forward);
        assert_eq!(nav.entrance_progress(t0), 0.0);
        assert_eq!(nav.entrance_progress(t0 + ENTRANCE_DURATION), 1.0);
        assert_eq!(nav.settled_elapsed(t0), Some(Duration::ZERO));
    }

    #[test]
    fn test_cancel_drops_pending_move() {
        let t0 = Instant::now();
        let mut nav = Navigator::new(4);
        nav.advance(t0);
        assert_eq!(nav.next_deadline(), Some(t0 + TRANSITION_DELAY));
        nav.cancel();
        assert_eq!(nav.next_deadline(), None);
        assert_eq!(nav.tick(t0 + TRANSITION_DELAY), None);
        assert_eq!(nav.current_index(), 0);
        assert!(nav.advance(t0 + TRANSITION_DELAY));
    }
}
