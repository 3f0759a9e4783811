use std::time::{Duration, Instant};

use crate::media::audio::MusicPlayer;

use super::autoplay::{Autoplay, DEFAULT_INTERVAL};
use super::gesture::SwipeTracker;
use super::navigation::{Direction, Navigator};
use super::playback::PlaybackState;

#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub autoplay_interval: Duration,
    pub start_paused: bool,
    pub start_slide: usize,
    pub intro_enabled: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            autoplay_interval: DEFAULT_INTERVAL,
            start_paused: false,
            start_slide: 0,
            intro_enabled: true,
        }
    }
}

/// Owns every piece of slideshow state and the timers that drive it.
///
/// The UI calls [`tick`](Self::tick) every frame and redraws whenever
/// [`take_dirty`](Self::take_dirty) reports a change.
pub struct SlideshowController {
    nav: Navigator,
    autoplay: Autoplay,
    swipe: SwipeTracker,
    playback: PlaybackState,
    music: Box<dyn MusicPlayer>,
    dirty: bool,
    disposed: bool,
}

impl SlideshowController {
    pub fn new(
        slide_count: usize,
        options: ShowOptions,
        music: Box<dyn MusicPlayer>,
        now: Instant,
    ) -> Self {
        let nav = Navigator::new(slide_count)
            .starting_at(options.start_slide)
            .entered_at(now);
        let mut autoplay = Autoplay::new(options.autoplay_interval);
        let mut playback = PlaybackState::new(options.intro_enabled);
        if options.start_paused {
            autoplay.pause();
            playback.autoplay_paused = true;
        }

        let mut controller = Self {
            nav,
            autoplay,
            swipe: SwipeTracker::new(),
            playback,
            music,
            dirty: true,
            disposed: false,
        };
        controller.rearm_autoplay(now);
        controller
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn autoplay_interval(&self) -> Duration {
        self.autoplay.interval()
    }

    pub fn music_available(&self) -> bool {
        self.music.is_available()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Returns whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn next(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let accepted = self.nav.advance(now);
        self.dirty |= accepted;
        accepted
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let accepted = self.nav.retreat(now);
        self.dirty |= accepted;
        accepted
    }

    /// Returns the new paused state.
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        if self.disposed {
            return self.playback.autoplay_paused;
        }
        if self.autoplay.is_paused() {
            self.autoplay.resume(now, self.nav.current_index(), self.nav.last_index());
            self.playback.autoplay_paused = false;
            // Resuming under the intro must not start the clock yet.
            self.rearm_autoplay(now);
        } else {
            self.autoplay.pause();
            self.playback.autoplay_paused = true;
        }
        self.dirty = true;
        self.playback.autoplay_paused
    }

    /// Returns whether music is playing afterwards. Player failures are
    /// logged and leave the music off.
    pub fn toggle_music(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        if self.playback.music_playing {
            if let Err(e) = self.music.pause() {
                log::warn!("{e:#}");
            }
            self.playback.music_playing = false;
        } else {
            match self.music.play() {
                Ok(()) => self.playback.music_playing = true,
                Err(e) => log::warn!("Background music unavailable: {e:#}"),
            }
        }
        self.dirty = true;
        self.playback.music_playing
    }

    pub fn dismiss_intro(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if self.playback.dismiss_intro() {
            log::debug!("intro dismissed");
            self.rearm_autoplay(now);
            self.dirty = true;
        }
    }

    /// Classify the viewport. Returns `true` if the device class changed.
    pub fn resize(&mut self, width: f32, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let intro_before = self.playback.intro;
        let changed = self.playback.classify(width);
        if changed {
            log::debug!("viewport {width} classified as {:?}", self.playback.device);
            // A device change mid-gesture abandons the gesture.
            self.swipe.reset();
        }
        if self.playback.intro != intro_before {
            self.rearm_autoplay(now);
        }
        self.dirty |= changed || self.playback.intro != intro_before;
        changed
    }

    pub fn pointer_down(&mut self, x: f32) {
        if self.playback.device.is_mobile() && !self.playback.intro_visible() {
            self.swipe.begin(x);
        }
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.swipe.move_to(x);
    }

    /// Interpret the finished gesture and navigate accordingly.
    pub fn pointer_up(&mut self, now: Instant) -> Option<Direction> {
        let direction = self.swipe.finish()?;
        if !self.playback.has_swiped_once {
            self.playback.has_swiped_once = self.swipe.has_swiped_once();
            self.dirty = true;
        }
        let moved = match direction {
            Direction::Forward => self.next(now),
            Direction::Backward => self.previous(now),
        };
        log::debug!("swipe {direction:?} (accepted: {moved})");
        Some(direction)
    }

    /// Advance timers. Returns `true` if visible state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = false;

        if self.nav.tick(now).is_some() {
            self.rearm_autoplay(now);
            changed = true;
        }

        if self.autoplay.tick(now) {
            changed |= self.nav.advance(now);
        }

        if self.playback.music_playing && !self.music.is_playing() {
            log::warn!("Background music stopped unexpectedly");
            self.playback.music_playing = false;
            changed = true;
        }

        self.dirty |= changed;
        changed
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.nav.next_deadline(), self.autoplay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel every outstanding timer and stop the music.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.nav.cancel();
        self.autoplay.cancel();
        if self.playback.music_playing {
            if let Err(e) = self.music.pause() {
                log::warn!("{e:#}");
            }
            self.playback.music_playing = false;
        }
        self.disposed = true;
        log::debug!("slideshow disposed");
    }

    fn rearm_autoplay(&mut self, now: Instant) {
        if self.playback.intro_visible() {
            self.autoplay.cancel();
        } else {
            self.autoplay
                .rearm(now, self.nav.current_index(), self.nav.last_index());
        }
    }
}

impl Drop for SlideshowController {
    fn drop(&mut self) {
        self.dispose();
    }
}
