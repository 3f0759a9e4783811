use anyhow::{Context, Result};
use eframe::egui;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lazily loaded logo and intro-frame textures, keyed by deck-relative path.
/// Failed loads are remembered so they are reported only once.
pub struct ImageCache {
    base_path: PathBuf,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            textures: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_path.join(p)
        }
    }

    pub fn get_or_load(&self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.textures.borrow().get(path) {
            return entry.clone();
        }

        let loaded = match load_color_image(&self.resolve(path)) {
            Ok(image) => Some(ctx.load_texture(path, image, egui::TextureOptions::LINEAR)),
            Err(e) => {
                log::warn!("{e:#}");
                None
            }
        };
        self.textures
            .borrow_mut()
            .insert(path.to_string(), loaded.clone());
        loaded
    }
}

pub fn load_color_image(path: &Path) -> Result<egui::ColorImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        image.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_png_from_disk() {
        let dir = std::env::temp_dir().join(format!("yeardeck-images-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("logo.png");
        let pixels = vec![255u8; 4 * 3 * 2];
        image::save_buffer(&path, &pixels, 3, 2, image::ColorType::Rgba8).unwrap();

        let image = load_color_image(&path).unwrap();
        assert_eq!(image.size, [3, 2]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let err = load_color_image(Path::new("/nonexistent/logo.png")).unwrap_err();
        assert!(err.to_string().contains("logo.png"));
    }

    #[test]
    fn test_missing_texture_is_cached_as_none() {
        let ctx = egui::Context::default();
        let cache = ImageCache::new(PathBuf::from("/nonexistent"));
        assert!(cache.get_or_load(&ctx, "logo.png").is_none());
        assert!(cache.textures.borrow().contains_key("logo.png"));
        assert_eq!(
            cache.resolve("logo.png"),
            PathBuf::from("/nonexistent/logo.png")
        );
    }
}
