use eframe::egui;
use std::time::{Duration, Instant};

use crate::deck::Deck;
use crate::media::{self, images::ImageCache};
use crate::render::effects::{ParticleConfig, ParticleField, Snowfall};
use crate::render::transition::SlidePose;
use crate::render::{self, SlideFrame};
use crate::show::{DeviceClass, ShowOptions, SlideshowController};
use crate::theme::Theme;

const TOAST_DURATION: f32 = 1.5;
const SNOW_FADE: f32 = 0.8;

/// How the presentation window is launched.
pub struct RunOptions {
    pub windowed: bool,
    pub show: ShowOptions,
    pub theme: Theme,
    pub player: Option<String>,
    pub player_args: Option<Vec<String>>,
}

struct PresentationApp {
    deck: Deck,
    theme: Theme,
    controller: SlideshowController,
    images: ImageCache,
    particles: ParticleField,
    snow: Snowfall,
    snow_opacity: f32,
    device: DeviceClass,
    /// Probing the player spawns a process, so it is done once.
    music_available: bool,
    show_hud: bool,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    started: Instant,
    intro_started: Option<Instant>,
    /// Panel rect from the last frame, used before the viewport reports a size.
    last_rect: egui::Rect,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - fade_start) / (TOAST_DURATION - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

/// Clicks gathered while painting, applied once the frame is laid out.
#[derive(Default)]
struct ButtonClicks {
    previous: bool,
    next: bool,
    pause: bool,
    music: bool,
}

impl PresentationApp {
    fn new(deck: Deck, options: RunOptions, now: Instant) -> Self {
        let music = media::music_for(
            &deck,
            options.player.as_deref(),
            options.player_args.as_deref(),
        );
        let controller = SlideshowController::new(deck.len(), options.show, music, now);
        let music_available = controller.music_available();
        if !music_available {
            log::info!("background music disabled: no track or player available");
        }
        let device = controller.playback().device;
        let theme = options.theme;
        let images = ImageCache::new(deck.base_path.clone());

        Self {
            particles: ParticleField::new(ParticleConfig::for_device(
                device,
                theme.particle_color,
            )),
            snow: Snowfall::new(),
            snow_opacity: 0.0,
            deck,
            theme,
            controller,
            images,
            device,
            music_available,
            show_hud: false,
            toast: None,
            last_esc: None,
            started: now,
            intro_started: None,
            last_rect: egui::Rect::NOTHING,
        }
    }

    fn rebuild_particles(&mut self) {
        self.particles = ParticleField::new(ParticleConfig::for_device(
            self.device,
            self.theme.particle_color,
        ));
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.rebuild_particles();
    }

    fn toggle_pause(&mut self, now: Instant) {
        let paused = self.controller.toggle_pause(now);
        self.toast = Some(Toast::new(if paused {
            "Autoplay paused"
        } else {
            "Autoplay resumed"
        }));
    }

    fn toggle_music(&mut self) {
        if !self.music_available {
            self.toast = Some(Toast::new("No music available"));
            return;
        }
        let was_playing = self.controller.playback().music_playing;
        let playing = self.controller.toggle_music();
        if !was_playing && !playing {
            self.toast = Some(Toast::new("Music could not be started"));
        }
    }

    fn viewport_width(&self, ctx: &egui::Context) -> Option<f32> {
        ctx.input(|i| i.viewport().inner_rect.map(|r| r.width()))
            .or_else(|| self.last_rect.is_positive().then(|| self.last_rect.width()))
    }

    fn handle_keys(
        &mut self,
        ctx: &egui::Context,
        now: Instant,
        viewport_cmds: &mut Vec<egui::ViewportCommand>,
    ) {
        let intro_visible = self.controller.playback().intro_visible();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            if i.key_pressed(egui::Key::Escape) {
                if let Some(last) = self.last_esc {
                    if last.elapsed().as_secs_f32() < 1.0 {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_esc = Some(Instant::now());
                self.toast = Some(Toast::new("Press Esc again to exit"));
                return;
            }

            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            if i.key_pressed(egui::Key::D) {
                self.toggle_theme();
                return;
            }

            if i.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
                return;
            }

            if i.key_pressed(egui::Key::M) {
                self.toggle_music();
                return;
            }

            if intro_visible {
                if i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space) {
                    self.controller.dismiss_intro(now);
                }
                return;
            }

            if i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::N) {
                self.controller.next(now);
            }
            if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::P) {
                self.controller.previous(now);
            }
            if i.key_pressed(egui::Key::Space) || i.key_pressed(egui::Key::K) {
                self.toggle_pause(now);
            }
        });
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, now: Instant) {
        let (pressed, down, released, clicked, pointer_pos) = ctx.input(|i| {
            (
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_down(egui::PointerButton::Primary),
                i.pointer.button_released(egui::PointerButton::Primary),
                i.pointer.primary_clicked(),
                i.pointer.hover_pos(),
            )
        });

        if self.controller.playback().intro_visible() {
            if clicked {
                self.controller.dismiss_intro(now);
            }
            return;
        }

        if pressed {
            if let Some(pos) = pointer_pos {
                self.controller.pointer_down(pos.x);
            }
        } else if down {
            if let Some(pos) = pointer_pos {
                self.controller.pointer_move(pos.x);
            }
        }
        if released {
            self.controller.pointer_up(now);
        }
    }

    fn slide_frame(&self, now: Instant) -> SlideFrame {
        let nav = self.controller.navigator();
        let pose = SlidePose::from_state(nav.is_transitioning(), nav.direction());
        match nav.transition_progress(now) {
            // The leaving slide keeps its list fully shown.
            Some(t) => SlideFrame {
                pose,
                phase: t,
                shown_for: f32::MAX,
            },
            None => {
                let shown_for = nav
                    .settled_elapsed(now)
                    .unwrap_or_else(|| now.saturating_duration_since(self.started))
                    .as_secs_f32();
                SlideFrame {
                    pose,
                    phase: nav.entrance_progress(now),
                    shown_for,
                }
            }
        }
    }

    fn draw_presentation(
        &self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        now: Instant,
        scale: f32,
    ) -> ButtonClicks {
        let nav = self.controller.navigator();
        let playback = self.controller.playback();

        render::draw_logo_strip(ui, &self.deck, &self.theme, &self.images, rect, scale);

        if let Some(slide) = self.deck.slides.get(nav.current_index()) {
            render::render_slide(ui, slide, &self.theme, rect, self.slide_frame(now), scale);
        }

        render::draw_progress_bar(
            ui,
            &self.theme,
            rect,
            render::progress_fraction(nav.current_index(), nav.slide_count()),
            scale,
        );

        if playback.device.is_mobile() && !playback.has_swiped_once {
            let t = now.saturating_duration_since(self.started).as_secs_f32();
            render::draw_swipe_hint(ui, &self.theme, rect, t, scale);
        }

        self.draw_buttons(ui, rect, scale)
    }

    fn draw_buttons(&self, ui: &mut egui::Ui, rect: egui::Rect, scale: f32) -> ButtonClicks {
        let nav = self.controller.navigator();
        let playback = self.controller.playback();
        let size = (64.0 * scale).max(36.0);
        let margin = 32.0 * scale;
        let font = (size * 0.5).max(16.0);
        let fill = Theme::with_opacity(self.theme.card_background, 0.8);

        let button = |label: &str| {
            egui::Button::new(
                egui::RichText::new(label)
                    .size(font)
                    .color(self.theme.foreground),
            )
            .fill(fill)
            .corner_radius(size / 2.0)
        };

        let mut clicks = ButtonClicks::default();
        let mid_y = rect.center().y;

        if !nav.is_first() {
            let r = egui::Rect::from_center_size(
                egui::pos2(rect.left() + margin + size / 2.0, mid_y),
                egui::vec2(size, size),
            );
            clicks.previous = ui.put(r, button("\u{2039}")).clicked();
        }
        if !nav.is_last() {
            let r = egui::Rect::from_center_size(
                egui::pos2(rect.right() - margin - size / 2.0, mid_y),
                egui::vec2(size, size),
            );
            clicks.next = ui.put(r, button("\u{203a}")).clicked();
        }

        let bottom_y = rect.bottom() - margin - size / 2.0;
        let pause_label = if playback.autoplay_paused {
            "\u{25b6}"
        } else {
            "\u{23f8}"
        };
        let pause_rect = egui::Rect::from_center_size(
            egui::pos2(rect.right() - margin - size / 2.0, bottom_y),
            egui::vec2(size, size),
        );
        clicks.pause = ui.put(pause_rect, button(pause_label)).clicked();

        if self.music_available {
            let music_label = if playback.music_playing {
                "\u{1f507}"
            } else {
                "\u{1f3b5}"
            };
            let music_rect = pause_rect.translate(egui::vec2(-(size + 16.0 * scale), 0.0));
            clicks.music = ui.put(music_rect, button(music_label)).clicked();
        }

        clicks
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(toast) = &self.toast else { return };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let toast_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let toast_bg = Theme::with_opacity(self.theme.card_background, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional((20.0 * scale).max(14.0)),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0 * scale - galley.rect.height(),
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, toast_color);
        ui.ctx().request_repaint();
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = ctx.input(|i| i.stable_dt).min(0.1);

        if let Some(width) = self.viewport_width(ctx) {
            self.controller.resize(width, now);
            let device = self.controller.playback().device;
            if device != self.device {
                self.device = device;
                self.rebuild_particles();
            }
        }

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        self.handle_keys(ctx, now, &mut viewport_cmds);
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        self.handle_pointer(ctx, now);
        self.controller.tick(now);

        if self.controller.playback().intro_visible() && self.intro_started.is_none() {
            self.intro_started = Some(now);
        }

        self.particles.step(dt);
        let snow_target = if self.controller.playback().music_playing {
            1.0
        } else {
            0.0
        };
        self.snow_opacity += (snow_target - self.snow_opacity).clamp(-dt / SNOW_FADE, dt / SNOW_FADE);
        if self.snow_opacity > 0.0 {
            self.snow.step(dt);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let mut clicks = ButtonClicks::default();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(self.theme.background_bottom)
                    .inner_margin(0.0),
            )
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.last_rect = rect;
                let scale = render::compute_scale(rect, self.device);

                render::draw_background(ui, &self.theme, rect);
                self.particles.paint(ui.painter(), rect, scale);

                if self.controller.playback().intro_visible() {
                    let elapsed = self
                        .intro_started
                        .map(|t| now.saturating_duration_since(t).as_secs_f32())
                        .unwrap_or(0.0);
                    render::intro::draw_intro(
                        ui,
                        &self.deck,
                        &self.theme,
                        &self.images,
                        rect,
                        elapsed,
                        scale,
                    );
                } else {
                    clicks = self.draw_presentation(ui, rect, now, scale);
                }

                if self.snow_opacity > 0.0 {
                    self.snow
                        .paint(ui.painter(), rect, scale, self.snow_opacity);
                }

                self.draw_toast(ui, rect, scale);

                if self.show_hud {
                    draw_hud(ui, &self.theme, rect, scale);
                }
            });

        if clicks.previous {
            self.controller.previous(now);
        }
        if clicks.next {
            self.controller.next(now);
        }
        if clicks.pause {
            self.toggle_pause(now);
        }
        if clicks.music {
            self.toggle_music();
        }

        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
        // The particle field is always moving.
        if self.controller.take_dirty() || !self.particles.is_empty() {
            ctx.request_repaint();
        }
    }
}

fn draw_hud(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    let shortcuts = [
        ("N / \u{2192}", "Next slide"),
        ("P / \u{2190}", "Previous slide"),
        ("Swipe", "Navigate (narrow windows)"),
        ("Space / K", "Pause / resume autoplay"),
        ("M", "Toggle music"),
        ("D", "Toggle theme"),
        ("F", "Toggle fullscreen"),
        ("H", "Toggle this HUD"),
        ("Esc \u{00d7}2 / Q", "Quit"),
    ];

    let scale = scale.max(0.5);
    let bg = Theme::with_opacity(theme.card_background, 0.95);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let hud_height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let hud_width = 420.0 * scale;

    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(hud_width, hud_height));
    ui.painter().rect_filled(hud_rect, 12.0 * scale, bg);

    let title_galley = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        Theme::with_opacity(theme.heading_color, 0.9),
    );
    let title_pos = egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding);
    ui.painter().galley(title_pos, title_galley, text_color);

    let mut y = hud_rect.top() + padding + 40.0 * scale;
    for (key, desc) in &shortcuts {
        let key_galley = ui.painter().layout_no_wrap(
            key.to_string(),
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        ui.painter()
            .galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding + 170.0 * scale, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

pub fn run(deck: Deck, options: RunOptions) -> anyhow::Result<()> {
    if deck.is_empty() {
        anyhow::bail!("Deck for {} has no slides", deck.client.company_name);
    }

    let title = deck.title();
    log::info!(
        "presenting {} ({} slides, autoplay every {}s)",
        title,
        deck.len(),
        options.show.autoplay_interval.as_secs()
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(deck, options, Instant::now())))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Seconds flag to an autoplay interval, falling back to `default`.
pub fn autoplay_interval(secs: Option<u64>, default: Duration) -> Duration {
    secs.map(Duration::from_secs).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_starts_opaque() {
        let toast = Toast::new("hello");
        assert_eq!(toast.opacity(), 1.0);
        assert!(!toast.is_expired());
    }

    #[test]
    fn test_autoplay_flag_overrides_default() {
        let default = Duration::from_secs(10);
        assert_eq!(autoplay_interval(None, default), default);
        assert_eq!(autoplay_interval(Some(4), default), Duration::from_secs(4));
    }

    #[test]
    fn test_app_builds_for_builtin_deck() {
        let deck = Deck::builtin().unwrap();
        let options = RunOptions {
            windowed: true,
            show: ShowOptions::default(),
            theme: Theme::winter(),
            // A player that cannot exist keeps the test hermetic.
            player: Some("yeardeck-missing-player".to_string()),
            player_args: None,
        };
        let app = PresentationApp::new(deck, options, Instant::now());
        assert!(!app.music_available);
        assert_eq!(app.device, DeviceClass::Desktop);
        assert_eq!(app.particles.len(), 50);
    }
}
