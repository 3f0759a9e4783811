use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::config::Config;
use crate::deck::Deck;
use crate::media::images::ImageCache;
use crate::render::effects::{ParticleConfig, ParticleField};
use crate::render::{self, SlideFrame};
use crate::show::DeviceClass;
use crate::theme::Theme;

/// Fixed seed so repeated exports produce identical backgrounds.
const PARTICLE_SEED: u64 = 2025;

struct ExportApp {
    deck: Deck,
    theme: Theme,
    images: ImageCache,
    particles: ParticleField,
    output_dir: PathBuf,
    current_slide: usize,
    screenshot_requested: bool,
    done: bool,
}

impl ExportApp {
    fn new(deck: Deck, theme: Theme, output_dir: PathBuf) -> Self {
        let images = ImageCache::new(deck.base_path.clone());
        let particles = ParticleField::seeded(
            ParticleConfig::for_device(DeviceClass::Desktop, theme.particle_color),
            PARTICLE_SEED,
        );
        Self {
            deck,
            theme,
            images,
            particles,
            output_dir,
            current_slide: 0,
            screenshot_requested: false,
            done: false,
        }
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Check for screenshot result from previous frame
        let mut got_screenshot = false;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    let filename = slide_filename(self.current_slide);
                    let path = self.output_dir.join(&filename);
                    match save_color_image(image, &path) {
                        Ok(()) => eprintln!("  Saved {filename}"),
                        Err(e) => log::error!("{e:#}"),
                    }
                    got_screenshot = true;
                }
            }
        });

        if got_screenshot {
            self.screenshot_requested = false;
            self.current_slide += 1;
            if self.current_slide >= self.deck.len() {
                self.done = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(self.theme.background_bottom)
                    .inner_margin(0.0),
            )
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let scale = render::compute_scale(rect, DeviceClass::Desktop);

                render::draw_background(ui, &self.theme, rect);
                self.particles.paint(ui.painter(), rect, scale);
                render::draw_logo_strip(ui, &self.deck, &self.theme, &self.images, rect, scale);

                let idx = self.current_slide;
                if let Some(slide) = self.deck.slides.get(idx) {
                    render::render_slide(ui, slide, &self.theme, rect, SlideFrame::at_rest(), scale);
                }
                render::draw_progress_bar(
                    ui,
                    &self.theme,
                    rect,
                    render::progress_fraction(idx, self.deck.len()),
                    scale,
                );
            });

        // Request screenshot after rendering (will arrive next frame)
        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

/// `0` -> `"slide-01.png"`
fn slide_filename(index: usize) -> String {
    format!("slide-{:02}.png", index + 1)
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to save {}", path.display()))
}

pub fn run(deck_path: PathBuf, output_dir: PathBuf, width: u32, height: u32) -> Result<()> {
    let deck = Deck::load(&deck_path)?;
    if deck.is_empty() {
        anyhow::bail!("No slides found in {}", deck_path.display());
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let config = Config::load_or_default();
    let theme = deck
        .client
        .settings
        .theme
        .as_deref()
        .or(config.theme())
        .map(Theme::from_name)
        .unwrap_or_default();

    eprintln!(
        "Exporting {} slides to {} ({}x{})",
        deck.len(),
        output_dir.display(),
        width,
        height,
    );

    let title = format!("{} export", deck.title());
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let output_dir_clone = output_dir.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(ExportApp::new(deck, theme, output_dir_clone)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    eprintln!("Export complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames_are_one_indexed_and_padded() {
        assert_eq!(slide_filename(0), "slide-01.png");
        assert_eq!(slide_filename(9), "slide-10.png");
    }

    #[test]
    fn test_saves_png() {
        let dir = std::env::temp_dir().join(format!("yeardeck-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("slide-01.png");
        let image = egui::ColorImage::from_rgba_unmultiplied([4, 3], &[255, 0, 0, 255].repeat(12));
        save_color_image(&image, &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 3));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
