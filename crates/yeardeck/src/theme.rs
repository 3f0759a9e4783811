use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background_top: Color32,
    pub background_bottom: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub card_background: Color32,
    pub particle_color: Color32,
    pub title_size: f32,
    pub subtitle_size: f32,
    pub list_size: f32,
    pub footer_size: f32,
}

impl Theme {
    /// Deep night-blue background with white particles and snow.
    pub fn winter() -> Self {
        Self {
            name: "winter".to_string(),
            background_top: Color32::from_rgb(0x0B, 0x1D, 0x3A),
            background_bottom: Color32::from_rgb(0x1B, 0x3B, 0x6F),
            foreground: Color32::from_rgb(0xE3, 0xEA, 0xF5),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0xE6, 0x39, 0x46),
            card_background: Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0x1F),
            particle_color: Color32::WHITE,
            title_size: 88.0,
            subtitle_size: 40.0,
            list_size: 34.0,
            footer_size: 30.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background_top: Color32::from_rgb(0xF7, 0xF9, 0xFC),
            background_bottom: Color32::from_rgb(0xDD, 0xE6, 0xF3),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0xC0, 0x1F, 0x2F),
            card_background: Color32::from_rgba_unmultiplied(0x16, 0x21, 0x3E, 0x14),
            particle_color: Color32::from_rgb(0x5A, 0x6F, 0x90),
            title_size: 88.0,
            subtitle_size: 40.0,
            list_size: 34.0,
            footer_size: 30.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::winter(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "light" {
            Self::winter()
        } else {
            Self::light()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let alpha = (a as f32 * opacity.clamp(0.0, 1.0)) as u8;
        Color32::from_rgba_unmultiplied(r, g, b, alpha)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::winter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_names_fall_back_to_winter() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("winter").name, "winter");
        assert_eq!(Theme::from_name("neon").name, "winter");
    }

    #[test]
    fn test_toggle_round_trips() {
        let theme = Theme::winter();
        assert_eq!(theme.toggled().name, "light");
        assert_eq!(theme.toggled().toggled().name, "winter");
    }

    #[test]
    fn test_opacity_scales_existing_alpha() {
        let c = Theme::with_opacity(Color32::WHITE, 0.5);
        assert_eq!(c.a(), 127);
        let c = Theme::with_opacity(Color32::from_rgba_unmultiplied(10, 20, 30, 100), 0.5);
        assert_eq!(c.a(), 50);
    }
}
