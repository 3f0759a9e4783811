/// Viewports at or below this width are treated as mobile.
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn from_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Self::Mobile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroState {
    /// No viewport has been classified yet.
    Pending,
    Visible,
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub music_playing: bool,
    pub autoplay_paused: bool,
    pub device: DeviceClass,
    pub intro: IntroState,
    pub has_swiped_once: bool,
}

impl PlaybackState {
    pub fn new(intro_enabled: bool) -> Self {
        Self {
            music_playing: false,
            autoplay_paused: false,
            device: DeviceClass::Desktop,
            intro: if intro_enabled {
                IntroState::Pending
            } else {
                IntroState::Dismissed
            },
            has_swiped_once: false,
        }
    }

    pub fn intro_visible(&self) -> bool {
        self.intro == IntroState::Visible
    }

    /// Record a viewport width. Returns `true` if the device class changed.
    /// The intro is decided by the first classification only.
    pub fn classify(&mut self, width: f32) -> bool {
        let device = DeviceClass::from_width(width);
        if self.intro == IntroState::Pending {
            self.intro = if device.is_mobile() {
                IntroState::Visible
            } else {
                IntroState::Dismissed
            };
        }
        let changed = device != self.device;
        self.device = device;
        changed
    }

    /// Returns `true` if the intro was visible.
    pub fn dismiss_intro(&mut self) -> bool {
        let was_visible = self.intro_visible();
        self.intro = IntroState::Dismissed;
        was_visible
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(true)
    }
}
