pub mod charts;
pub mod effects;
pub mod intro;
pub mod transition;

use eframe::egui::{self, Pos2};

use crate::deck::{ChartData, Deck, SlideRecord};
use crate::media::images::ImageCache;
use crate::show::DeviceClass;
use crate::theme::Theme;

use transition::SlidePose;

/// Delay between the entrance of consecutive list items, in seconds.
pub const LIST_ITEM_STAGGER: f32 = 0.1;
/// Fade-in time of a single list item, in seconds.
pub const LIST_ITEM_FADE: f32 = 0.4;

const CHART_HEIGHT: f32 = 360.0;
const TEAM_CHART_REVEAL: f32 = 1.2;

/// Animation inputs for drawing one slide.
#[derive(Debug, Clone, Copy)]
pub struct SlideFrame {
    pub pose: SlidePose,
    /// Raw 0..=1 progress of the transition or entrance for `pose`.
    pub phase: f32,
    /// Seconds since the slide started entering.
    pub shown_for: f32,
}

impl SlideFrame {
    /// A slide fully at rest, as exported or after its animations end.
    pub fn at_rest() -> Self {
        Self {
            pose: SlidePose::FromRight,
            phase: 1.0,
            shown_for: f32::MAX,
        }
    }
}

/// Width of the progress bar as a fraction of the screen.
pub fn progress_fraction(index: usize, slide_count: usize) -> f32 {
    if slide_count == 0 {
        return 0.0;
    }
    ((index + 1) as f32 / slide_count as f32).min(1.0)
}

/// Opacity of list item `index` `elapsed` seconds after the slide entered.
pub fn list_item_opacity(index: usize, elapsed: f32) -> f32 {
    let start = index as f32 * LIST_ITEM_STAGGER;
    ((elapsed - start) / LIST_ITEM_FADE).clamp(0.0, 1.0)
}

/// Reference-resolution scale. Mobile viewports lay out against a
/// narrower reference so text stays readable.
pub fn compute_scale(rect: egui::Rect, device: DeviceClass) -> f32 {
    match device {
        DeviceClass::Desktop => (rect.width() / 1920.0).min(rect.height() / 1080.0),
        DeviceClass::Mobile => (rect.width() / 900.0).min(rect.height() / 1080.0),
    }
}

/// Render a single slide: header, staggered list, chart and footer.
pub fn render_slide(
    ui: &egui::Ui,
    slide: &SlideRecord,
    theme: &Theme,
    rect: egui::Rect,
    frame: SlideFrame,
    scale: f32,
) {
    let placement = frame.pose.placement(frame.phase);
    let opacity = placement.opacity;
    if opacity <= 0.001 {
        return;
    }
    let rect = rect.translate(egui::vec2(placement.offset * rect.width(), 0.0));
    let painter = ui.painter();

    let padding = 80.0 * scale;
    let content_width = (rect.width() - padding * 2.0).min(1500.0 * scale);

    let title_color = Theme::with_opacity(theme.heading_color, opacity);
    let subtitle_color = Theme::with_opacity(theme.foreground, 0.85 * opacity);
    let list_color = Theme::with_opacity(theme.foreground, opacity);
    let accent = Theme::with_opacity(theme.accent, opacity);

    let title = painter.layout(
        slide.title.clone(),
        egui::FontId::proportional(theme.title_size * scale),
        title_color,
        content_width,
    );
    let subtitle = (!slide.subtitle.is_empty()).then(|| {
        painter.layout(
            slide.subtitle.clone(),
            egui::FontId::proportional(theme.subtitle_size * scale),
            subtitle_color,
            content_width,
        )
    });

    let list_font = egui::FontId::proportional(theme.list_size * scale);
    let items: Vec<_> = slide
        .list
        .iter()
        .flatten()
        .map(|item| {
            painter.layout(
                item.clone(),
                list_font.clone(),
                list_color,
                content_width - 60.0 * scale,
            )
        })
        .collect();
    let item_gap = 18.0 * scale;

    let footer = slide.footer.as_ref().map(|f| {
        painter.layout(
            f.clone(),
            egui::FontId::proportional(theme.footer_size * scale),
            subtitle_color,
            content_width,
        )
    });

    let chart_height = if slide.chart.is_some() {
        CHART_HEIGHT * scale
    } else {
        0.0
    };
    let section_gap = 48.0 * scale;

    // Measure, then center the whole block vertically
    let mut total = title.size().y;
    if let Some(g) = &subtitle {
        total += 24.0 * scale + g.size().y;
    }
    if !items.is_empty() {
        total += section_gap
            + items.iter().map(|g| g.size().y).sum::<f32>()
            + item_gap * (items.len() as f32 - 1.0);
    }
    if chart_height > 0.0 {
        total += section_gap + chart_height;
    }
    if let Some(g) = &footer {
        total += section_gap + g.size().y;
    }

    let top_reserved = 140.0 * scale;
    let mut y = (rect.center().y - total / 2.0).max(rect.top() + top_reserved);

    let center_x = rect.center().x;
    let title_h = title.size().y;
    painter.galley(
        Pos2::new(center_x - title.size().x / 2.0, y),
        title,
        title_color,
    );
    y += title_h;

    if let Some(g) = subtitle {
        y += 24.0 * scale;
        let h = g.size().y;
        painter.galley(
            Pos2::new(center_x - g.size().x / 2.0, y),
            g,
            subtitle_color,
        );
        y += h;
    }

    if !items.is_empty() {
        y += section_gap;
        let bullet_w = 40.0 * scale;
        let block_w = items.iter().map(|g| g.size().x).fold(0.0, f32::max) + bullet_w;
        let left = center_x - block_w / 2.0;
        for (i, g) in items.into_iter().enumerate() {
            let item_opacity = list_item_opacity(i, frame.shown_for);
            let lift = (1.0 - item_opacity) * 20.0 * scale;
            let h = g.size().y;
            let a = item_opacity * opacity;
            painter.circle_filled(
                Pos2::new(left + 10.0 * scale, y + h / 2.0 + lift),
                6.0 * scale,
                Theme::with_opacity(accent, item_opacity),
            );
            painter.galley(
                Pos2::new(left + bullet_w, y + lift),
                g,
                Theme::with_opacity(theme.foreground, a),
            );
            y += h + item_gap;
        }
        y -= item_gap;
    }

    if let Some(chart) = &slide.chart {
        y += section_gap;
        let chart_rect = egui::Rect::from_min_size(
            Pos2::new(center_x - content_width / 2.0, y),
            egui::vec2(content_width, chart_height),
        );
        match chart {
            ChartData::TeamGrowth(growth) => {
                let reveal = frame.shown_for / TEAM_CHART_REVEAL;
                charts::draw_team_growth(ui, growth, theme, chart_rect, opacity, reveal, scale);
            }
            ChartData::UserGrowth(growth) => {
                charts::draw_user_growth(ui, growth, theme, chart_rect, opacity, scale);
            }
        }
        y += chart_height;
    }

    if let Some(g) = footer {
        y += section_gap;
        painter.galley(
            Pos2::new(center_x - g.size().x / 2.0, y),
            g,
            subtitle_color,
        );
    }
}

/// Vertical gradient behind everything.
pub fn draw_background(ui: &egui::Ui, theme: &Theme, rect: egui::Rect) {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), theme.background_top);
    mesh.colored_vertex(rect.right_top(), theme.background_top);
    mesh.colored_vertex(rect.left_bottom(), theme.background_bottom);
    mesh.colored_vertex(rect.right_bottom(), theme.background_bottom);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

pub fn draw_progress_bar(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, fraction: f32, scale: f32) {
    let height = (6.0 * scale).max(3.0);
    let track = egui::Rect::from_min_size(rect.left_top(), egui::vec2(rect.width(), height));
    ui.painter()
        .rect_filled(track, 0.0, Theme::with_opacity(theme.foreground, 0.15));
    let fill = egui::Rect::from_min_size(
        rect.left_top(),
        egui::vec2(rect.width() * fraction.clamp(0.0, 1.0), height),
    );
    ui.painter().rect_filled(fill, 0.0, theme.accent);
}

/// Vendor and client logos joined by a plus sign. Missing logos fall back
/// to the company name.
pub fn draw_logo_strip(
    ui: &egui::Ui,
    deck: &Deck,
    theme: &Theme,
    images: &ImageCache,
    rect: egui::Rect,
    scale: f32,
) {
    let painter = ui.painter();
    let height = 56.0 * scale;
    let gap = 24.0 * scale;
    let color = Theme::with_opacity(theme.heading_color, 0.9);
    let font = egui::FontId::proportional(theme.subtitle_size * 0.8 * scale);

    enum Mark {
        Logo(egui::TextureHandle, egui::Vec2),
        Text(std::sync::Arc<egui::Galley>),
    }

    let mark = |path: Option<&String>, name: &str| -> Mark {
        if let Some(texture) = path.and_then(|p| images.get_or_load(ui.ctx(), p)) {
            let size = texture.size_vec2();
            let w = size.x * height / size.y.max(1.0);
            return Mark::Logo(texture, egui::vec2(w, height));
        }
        Mark::Text(painter.layout_no_wrap(name.to_string(), font.clone(), color))
    };
    let width_of = |m: &Mark| match m {
        Mark::Logo(_, size) => size.x,
        Mark::Text(g) => g.size().x,
    };

    let media = &deck.client.media;
    let vendor = mark(media.vendor_logo.as_ref(), &deck.client.vendor_name);
    let client = mark(media.client_logo.as_ref(), &deck.client.company_name);
    let plus = painter.layout_no_wrap("+".to_string(), font.clone(), color);

    let total = width_of(&vendor) + plus.size().x + width_of(&client) + gap * 2.0;
    let mut x = rect.center().x - total / 2.0;
    let mid_y = rect.top() + 40.0 * scale + height / 2.0;

    for (i, m) in [vendor, client].into_iter().enumerate() {
        let w = width_of(&m);
        match m {
            Mark::Logo(texture, size) => {
                let r = egui::Rect::from_min_size(Pos2::new(x, mid_y - size.y / 2.0), size);
                painter.image(
                    texture.id(),
                    r,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            Mark::Text(g) => {
                let h = g.size().y;
                painter.galley(Pos2::new(x, mid_y - h / 2.0), g, color);
            }
        }
        x += w + gap;
        if i == 0 {
            let h = plus.size().y;
            let pw = plus.size().x;
            painter.galley(Pos2::new(x, mid_y - h / 2.0), plus.clone(), color);
            x += pw + gap;
        }
    }
}

/// One-time hint shown on mobile until the first swipe.
pub fn draw_swipe_hint(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, time: f32, scale: f32) {
    let pulse = 0.4 + 0.3 * (time * 2.5).sin().abs();
    let color = Theme::with_opacity(theme.foreground, pulse);
    let galley = ui.painter().layout_no_wrap(
        "\u{2190} Swipe to navigate \u{2192}".to_string(),
        egui::FontId::proportional(theme.footer_size * scale),
        color,
    );
    let pos = Pos2::new(
        rect.center().x - galley.size().x / 2.0,
        rect.bottom() - galley.size().y - 140.0 * scale,
    );
    ui.painter().galley(pos, galley, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_matches_position() {
        assert!((progress_fraction(0, 9) - 1.0 / 9.0).abs() < 1e-6);
        assert!((progress_fraction(0, 9) * 100.0 - 11.1).abs() < 0.05);
        assert_eq!(progress_fraction(8, 9), 1.0);
        assert_eq!(progress_fraction(4, 10), 0.5);
        assert_eq!(progress_fraction(0, 0), 0.0);
    }

    #[test]
    fn test_progress_for_every_index() {
        let count = 10;
        for i in 0..count {
            let expected = (i + 1) as f32 / count as f32;
            assert_eq!(progress_fraction(i, count), expected);
        }
    }

    #[test]
    fn test_list_items_are_staggered() {
        assert_eq!(list_item_opacity(0, 0.0), 0.0);
        assert_eq!(list_item_opacity(0, LIST_ITEM_FADE), 1.0);
        // The third item has not started 0.15s in.
        assert_eq!(list_item_opacity(2, 0.15), 0.0);
        assert!(list_item_opacity(2, 0.3) > 0.0);
        assert_eq!(list_item_opacity(6, f32::MAX), 1.0);
    }

    #[test]
    fn test_mobile_scale_is_larger_for_narrow_screens() {
        let rect = egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 800.0));
        assert!(compute_scale(rect, DeviceClass::Mobile) > compute_scale(rect, DeviceClass::Desktop));
    }

    fn render_all(deck: &Deck, theme: &Theme) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = ui.max_rect();
                for slide in &deck.slides {
                    render_slide(ui, slide, theme, rect, SlideFrame::at_rest(), 0.5);
                }
            });
        });
    }

    #[test]
    fn test_slides_render_without_panicking() {
        render_all(&Deck::builtin().unwrap(), &Theme::winter());
    }

    #[test]
    fn test_user_growth_slide_renders() {
        let yaml = include_str!("../../../../decks/northwind-2025.yaml");
        let deck = Deck::parse(yaml, std::path::Path::new(".")).unwrap();
        assert!(
            deck.slides
                .iter()
                .any(|s| s.kind == crate::deck::SlideKind::UserGrowth)
        );
        render_all(&deck, &Theme::winter());
        render_all(&deck, &Theme::light());
    }
}
