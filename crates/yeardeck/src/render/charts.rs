use eframe::egui::{self, Pos2, Stroke};

use crate::deck::{TeamGrowth, UserGrowth};
use crate::theme::Theme;

const CURVE_SAMPLES: usize = 48;

/// Sample a smooth two-point growth curve from `from` to `to`.
/// Returns `(x, value)` pairs with `x` running over 0..=1.
pub fn growth_curve(from: f32, to: f32, samples: usize) -> Vec<(f32, f32)> {
    let samples = samples.max(2);
    (0..samples)
        .map(|i| {
            let x = i as f32 / (samples - 1) as f32;
            let s = x * x * (3.0 - 2.0 * x);
            (x, from + (to - from) * s)
        })
        .collect()
}

/// Relative change in percent, `None` when there is no baseline.
pub fn percent_change(before: u64, after: u64) -> Option<f64> {
    if before == 0 {
        return None;
    }
    Some((after as f64 - before as f64) / before as f64 * 100.0)
}

/// `1234567` -> `"1,234,567"`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Team size curve with labelled start and end points. `reveal` (0..=1)
/// draws the curve progressively.
pub fn draw_team_growth(
    ui: &egui::Ui,
    growth: &TeamGrowth,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    reveal: f32,
    scale: f32,
) {
    let painter = ui.painter();
    let axis_color = Theme::with_opacity(theme.foreground, 0.35 * opacity);
    let curve_color = Theme::with_opacity(theme.accent, opacity);
    let label_color = Theme::with_opacity(theme.foreground, opacity);

    let plot = rect.shrink2(egui::vec2(60.0 * scale, 40.0 * scale));
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(2.0 * scale, axis_color),
    );
    painter.line_segment(
        [plot.left_bottom(), plot.left_top()],
        Stroke::new(2.0 * scale, axis_color),
    );

    let from = growth.initial as f32;
    let to = growth.current as f32;
    let max = from.max(to).max(1.0);
    let to_screen = |x: f32, v: f32| -> Pos2 {
        egui::pos2(
            plot.left() + x * plot.width(),
            plot.bottom() - (v / max) * plot.height() * 0.9,
        )
    };

    let reveal = reveal.clamp(0.0, 1.0);
    let points: Vec<Pos2> = growth_curve(from, to, CURVE_SAMPLES)
        .into_iter()
        .filter(|(x, _)| *x <= reveal)
        .map(|(x, v)| to_screen(x, v))
        .collect();
    if points.len() >= 2 {
        painter.add(egui::Shape::line(
            points,
            Stroke::new(5.0 * scale, curve_color),
        ));
    }

    let font = egui::FontId::proportional(theme.list_size * 0.8 * scale);
    let endpoints = [(0.0, from, "Start"), (1.0, to, "Today")];
    for (x, v, caption) in endpoints {
        if x > reveal {
            continue;
        }
        let p = to_screen(x, v);
        painter.circle_filled(p, 10.0 * scale, curve_color);
        let galley = painter.layout_no_wrap(
            format!("{caption}: {}", v as u32),
            font.clone(),
            label_color,
        );
        let label_x = if x == 0.0 {
            p.x + 16.0 * scale
        } else {
            p.x - galley.size().x - 16.0 * scale
        };
        painter.galley(
            egui::pos2(label_x, p.y - galley.size().y - 12.0 * scale),
            galley,
            label_color,
        );
    }
}

/// Before/after stat cards joined by an arrow, with the relative change.
pub fn draw_user_growth(
    ui: &egui::Ui,
    growth: &UserGrowth,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    scale: f32,
) {
    let painter = ui.painter();
    let card_bg = Theme::with_opacity(theme.card_background, opacity);
    let value_color = Theme::with_opacity(theme.heading_color, opacity);
    let caption_color = Theme::with_opacity(theme.foreground, 0.75 * opacity);
    let accent = Theme::with_opacity(theme.accent, opacity);

    let gap = 120.0 * scale;
    let card_w = ((rect.width() - gap) / 2.0).min(420.0 * scale);
    let card_h = (rect.height() * 0.8).min(260.0 * scale);
    let total_w = card_w * 2.0 + gap;
    let left = rect.center().x - total_w / 2.0;
    let top = rect.center().y - card_h / 2.0;

    let cards = [
        ("Before", growth.before, left),
        ("After", growth.after, left + card_w + gap),
    ];
    for (caption, value, x) in cards {
        let card = egui::Rect::from_min_size(egui::pos2(x, top), egui::vec2(card_w, card_h));
        painter.rect_filled(card, 16.0 * scale, card_bg);

        let value_galley = painter.layout_no_wrap(
            format_count(value),
            egui::FontId::proportional(theme.title_size * 0.9 * scale),
            value_color,
        );
        let caption_galley = painter.layout_no_wrap(
            caption.to_string(),
            egui::FontId::proportional(theme.list_size * 0.8 * scale),
            caption_color,
        );
        let block_h = value_galley.size().y + caption_galley.size().y + 8.0 * scale;
        let mut y = card.center().y - block_h / 2.0;
        let vx = card.center().x - value_galley.size().x / 2.0;
        let vh = value_galley.size().y;
        painter.galley(egui::pos2(vx, y), value_galley, value_color);
        y += vh + 8.0 * scale;
        let cx = card.center().x - caption_galley.size().x / 2.0;
        painter.galley(egui::pos2(cx, y), caption_galley, caption_color);
    }

    // Arrow between the cards
    let ay = top + card_h / 2.0;
    let from = egui::pos2(left + card_w + 20.0 * scale, ay);
    let to = egui::pos2(left + card_w + gap - 20.0 * scale, ay);
    let head = 16.0 * scale;
    painter.line_segment(
        [from, to - egui::vec2(head * 0.7, 0.0)],
        Stroke::new(5.0 * scale, accent),
    );
    painter.add(egui::Shape::convex_polygon(
        vec![
            to,
            to + egui::vec2(-head, head * 0.6),
            to + egui::vec2(-head, -head * 0.6),
        ],
        accent,
        Stroke::NONE,
    ));

    if let Some(change) = percent_change(growth.before, growth.after) {
        let badge = painter.layout_no_wrap(
            format!("{change:+.0}%"),
            egui::FontId::proportional(theme.list_size * scale),
            accent,
        );
        let pos = egui::pos2(
            rect.center().x - badge.size().x / 2.0,
            top + card_h + 24.0 * scale,
        );
        painter.galley(pos, badge, accent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_hits_both_endpoints() {
        let curve = growth_curve(6.0, 20.0, 10);
        assert_eq!(curve.len(), 10);
        assert_eq!(curve[0], (0.0, 6.0));
        assert_eq!(curve[9], (1.0, 20.0));
    }

    #[test]
    fn test_curve_is_monotonic_for_growth() {
        let curve = growth_curve(6.0, 20.0, CURVE_SAMPLES);
        assert!(curve.windows(2).all(|w| w[1].1 >= w[0].1));
    }

    #[test]
    fn test_curve_needs_two_samples() {
        assert_eq!(growth_curve(1.0, 2.0, 0).len(), 2);
    }

    #[test]
    fn test_percent_change_values() {
        assert_eq!(percent_change(40, 310).map(|p| p.round()), Some(675.0));
        assert_eq!(percent_change(746, 246).map(|p| p.round()), Some(-67.0));
        assert_eq!(percent_change(0, 10), None);
    }

    #[test]
    fn test_count_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
