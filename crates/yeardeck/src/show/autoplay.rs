use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Armed {
    slide: usize,
    fires_at: Instant,
}

/// Single-shot auto-advance timer, re-armed for every settled slide.
///
/// At most one timer is armed at a time; arming always replaces the
/// previous one.
#[derive(Debug, Clone)]
pub struct Autoplay {
    interval: Duration,
    paused: bool,
    armed: Option<Armed>,
}

impl Autoplay {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            paused: false,
            armed: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Replace any armed timer with a fresh one for `slide`.
    /// Nothing is armed while paused or on the last slide.
    pub fn rearm(&mut self, now: Instant, slide: usize, last_index: usize) {
        self.armed = None;
        if self.paused || slide >= last_index {
            return;
        }
        self.armed = Some(Armed {
            slide,
            fires_at: now + self.interval,
        });
        log::trace!(
            "autoplay: armed for slide {} in {:?}",
            slide,
            self.interval
        );
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.armed = None;
        log::debug!("autoplay: paused");
    }

    /// Resume and immediately re-arm against the current slide.
    pub fn resume(&mut self, now: Instant, slide: usize, last_index: usize) {
        self.paused = false;
        log::debug!("autoplay: resumed");
        self.rearm(now, slide, last_index);
    }

    /// Returns the new paused state.
    pub fn toggle(&mut self, now: Instant, slide: usize, last_index: usize) -> bool {
        if self.paused {
            self.resume(now, slide, last_index);
        } else {
            self.pause();
        }
        self.paused
    }

    /// Returns `true` exactly once when the armed timer elapses.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.armed {
            Some(armed) if now >= armed.fires_at => {
                self.armed = None;
                log::debug!("autoplay: fired on slide {}", armed.slide);
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.map(|a| a.fires_at)
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
