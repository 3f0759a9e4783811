use eframe::egui;

use crate::deck::Deck;
use crate::media::images::ImageCache;
use crate::theme::Theme;

pub const INTRO_FPS: f32 = 8.0;

/// Frame to show `elapsed` seconds into the intro. Holds on the last frame.
pub fn intro_frame_index(elapsed: f32, frame_count: usize, fps: f32) -> Option<usize> {
    if frame_count == 0 {
        return None;
    }
    let frame = (elapsed.max(0.0) * fps) as usize;
    Some(frame.min(frame_count - 1))
}

/// Full-screen intro shown once on mobile before the first slide.
pub fn draw_intro(
    ui: &egui::Ui,
    deck: &Deck,
    theme: &Theme,
    images: &ImageCache,
    rect: egui::Rect,
    elapsed: f32,
    scale: f32,
) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, theme.background_top);

    let frames = &deck.client.media.intro_frames;
    let frame = intro_frame_index(elapsed, frames.len(), INTRO_FPS)
        .and_then(|i| images.get_or_load(ui.ctx(), &frames[i]));

    if let Some(texture) = frame {
        let size = texture.size_vec2();
        let fit = (rect.width() / size.x).min(rect.height() / size.y);
        let image_rect = egui::Rect::from_center_size(rect.center(), size * fit);
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    } else {
        let fade = (elapsed / 1.2).clamp(0.0, 1.0);
        let title_color = Theme::with_opacity(theme.heading_color, fade);
        let galley = painter.layout(
            format!(
                "{}\n+\n{}",
                deck.client.vendor_name, deck.client.company_name
            ),
            egui::FontId::proportional(theme.title_size * scale),
            title_color,
            rect.width() * 0.9,
        );
        let pos = egui::pos2(
            rect.center().x - galley.size().x / 2.0,
            rect.center().y - galley.size().y / 2.0 - 40.0 * scale,
        );
        painter.galley(pos, galley, title_color);
    }

    // Pulsing call to action
    let pulse = 0.55 + 0.45 * (elapsed * 3.0).sin().abs();
    let hint_color = Theme::with_opacity(theme.foreground, pulse);
    let hint = painter.layout_no_wrap(
        "Tap to begin".to_string(),
        egui::FontId::proportional(theme.subtitle_size * scale),
        hint_color,
    );
    let pos = egui::pos2(
        rect.center().x - hint.size().x / 2.0,
        rect.bottom() - hint.size().y - 60.0 * scale,
    );
    painter.galley(pos, hint, hint_color);
    ui.ctx().request_repaint();
}
