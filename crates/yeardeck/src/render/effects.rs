use eframe::egui::{self, Color32, Stroke};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::show::DeviceClass;
use crate::theme::Theme;

pub const DESKTOP_PARTICLES: usize = 50;
pub const MOBILE_PARTICLES: usize = 25;
const SNOWFLAKES: usize = 120;

/// Where new particles appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitter {
    Bottom,
    Anywhere,
}

/// Settings for the cobweb particle background.
#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub count: usize,
    pub color: Color32,
    pub connect_color: Color32,
    pub emitter: Emitter,
    /// Radius multiplier range.
    pub size_range: (f32, f32),
    /// Maximum distance, in points, at which two particles are joined.
    pub connect_distance: f32,
}

impl ParticleConfig {
    pub fn for_device(device: DeviceClass, color: Color32) -> Self {
        Self {
            count: match device {
                DeviceClass::Desktop => DESKTOP_PARTICLES,
                DeviceClass::Mobile => MOBILE_PARTICLES,
            },
            color,
            connect_color: color,
            emitter: Emitter::Bottom,
            size_range: (0.5, 1.0),
            connect_distance: 140.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    /// Normalized position, 0..=1 on both axes.
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    size: f32,
}

/// Drifting dots joined by faint lines when they come close.
pub struct ParticleField {
    config: ParticleConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, mut rng: StdRng) -> Self {
        let particles = (0..config.count)
            .map(|_| {
                // Scatter the initial population so the screen is not empty.
                let mut p = spawn(&mut rng, &config);
                p.y = rng.random_range(0.0..1.0);
                p
            })
            .collect();
        Self {
            config,
            particles,
            rng,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance by `dt` seconds, respawning particles that drift out.
    pub fn step(&mut self, dt: f32) {
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            if p.y < -0.05 || p.x < -0.05 || p.x > 1.05 || p.y > 1.05 {
                self.particles[i] = spawn(&mut self.rng, &self.config);
            }
        }
    }

    /// Pairs of particles close enough to be joined, with a 0..=1 strength.
    pub fn links(&self, size: egui::Vec2) -> Vec<(usize, usize, f32)> {
        let max = self.config.connect_distance;
        let mut links = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let a = self.particles[i];
                let b = self.particles[j];
                let dx = (a.x - b.x) * size.x;
                let dy = (a.y - b.y) * size.y;
                let d = (dx * dx + dy * dy).sqrt();
                if d < max {
                    links.push((i, j, 1.0 - d / max));
                }
            }
        }
        links
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32) {
        let to_screen = |p: &Particle| {
            egui::pos2(
                rect.left() + p.x * rect.width(),
                rect.top() + p.y * rect.height(),
            )
        };

        for (i, j, strength) in self.links(rect.size()) {
            let color = Theme::with_opacity(self.config.connect_color, 0.35 * strength);
            painter.line_segment(
                [to_screen(&self.particles[i]), to_screen(&self.particles[j])],
                Stroke::new(1.0 * scale.max(0.5), color),
            );
        }

        let dot = Theme::with_opacity(self.config.color, 0.8);
        for p in &self.particles {
            painter.circle_filled(to_screen(p), 4.0 * p.size * scale.max(0.5), dot);
        }
    }
}

fn spawn(rng: &mut StdRng, config: &ParticleConfig) -> Particle {
    let (min_size, max_size) = config.size_range;
    let size = if max_size > min_size {
        rng.random_range(min_size..max_size)
    } else {
        min_size
    };
    let (x, y) = match config.emitter {
        Emitter::Bottom => (rng.random_range(0.0..1.0), 1.0),
        Emitter::Anywhere => (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
    };
    Particle {
        x,
        y,
        vx: rng.random_range(-0.02..0.02),
        vy: -rng.random_range(0.01f32..0.05),
        size,
    }
}

#[derive(Debug, Clone, Copy)]
struct Flake {
    x: f32,
    y: f32,
    radius: f32,
    speed: f32,
    phase: f32,
}

/// Falling snow overlay, shown while the music plays.
pub struct Snowfall {
    flakes: Vec<Flake>,
    rng: StdRng,
    time: f32,
}

impl Snowfall {
    pub fn new() -> Self {
        Self::with_rng(SNOWFLAKES, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::with_rng(count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(count: usize, mut rng: StdRng) -> Self {
        let flakes = (0..count)
            .map(|_| {
                let mut f = new_flake(&mut rng);
                f.y = rng.random_range(0.0..1.0);
                f
            })
            .collect();
        Self {
            flakes,
            rng,
            time: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn step(&mut self, dt: f32) {
        self.time += dt;
        let time = self.time;
        for i in 0..self.flakes.len() {
            let f = &mut self.flakes[i];
            f.y += f.speed * dt;
            f.x += (time * 1.3 + f.phase).sin() * 0.01 * dt;
            if f.y > 1.02 {
                let mut fresh = new_flake(&mut self.rng);
                fresh.y = -0.02;
                self.flakes[i] = fresh;
            }
        }
    }

    pub fn paint(&self, painter: &egui::Painter, rect: egui::Rect, scale: f32, opacity: f32) {
        let color = Theme::with_opacity(Color32::WHITE, 0.85 * opacity);
        for f in &self.flakes {
            let pos = egui::pos2(
                rect.left() + f.x.rem_euclid(1.0) * rect.width(),
                rect.top() + f.y * rect.height(),
            );
            painter.circle_filled(pos, f.radius * scale.max(0.5), color);
        }
    }
}

impl Default for Snowfall {
    fn default() -> Self {
        Self::new()
    }
}

fn new_flake(rng: &mut StdRng) -> Flake {
    Flake {
        x: rng.random_range(0.0..1.0),
        y: 0.0,
        radius: rng.random_range(1.5..5.0),
        speed: rng.random_range(0.04..0.12),
        phase: rng.random_range(0.0..std::f32::consts::TAU),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_count_follows_device_class() {
        let desktop = ParticleConfig::for_device(DeviceClass::Desktop, Color32::WHITE);
        let mobile = ParticleConfig::for_device(DeviceClass::Mobile, Color32::WHITE);
        assert_eq!(ParticleField::seeded(desktop, 1).len(), 50);
        assert_eq!(ParticleField::seeded(mobile, 1).len(), 25);
    }

    #[test]
    fn test_particles_stay_in_bounds() {
        let config = ParticleConfig::for_device(DeviceClass::Desktop, Color32::WHITE);
        let mut field = ParticleField::seeded(config, 7);
        for _ in 0..2_000 {
            field.step(0.1);
        }
        assert_eq!(field.len(), 50);
        for p in &field.particles {
            assert!((-0.05..=1.05).contains(&p.x));
            assert!((-0.05..=1.05).contains(&p.y));
            assert!((0.5..=1.0).contains(&p.size));
        }
    }

    #[test]
    fn test_respawned_particles_emit_from_bottom() {
        let config = ParticleConfig::for_device(DeviceClass::Mobile, Color32::WHITE);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let p = spawn(&mut rng, &config);
            assert_eq!(p.y, 1.0);
            assert!(p.vy < 0.0);
        }
    }

    #[test]
    fn test_links_only_join_close_particles() {
        let mut config = ParticleConfig::for_device(DeviceClass::Desktop, Color32::WHITE);
        config.count = 0;
        let mut field = ParticleField::seeded(config, 1);
        let p = |x: f32, y: f32| Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 1.0,
        };
        field.particles = vec![p(0.0, 0.0), p(0.05, 0.0), p(0.9, 0.9)];
        let links = field.links(egui::vec2(1000.0, 1000.0));
        assert_eq!(links.len(), 1);
        let (i, j, strength) = links[0];
        assert_eq!((i, j), (0, 1));
        assert!(strength > 0.0 && strength < 1.0);
    }

    #[test]
    fn test_seeded_fields_are_deterministic() {
        let config = ParticleConfig::for_device(DeviceClass::Desktop, Color32::WHITE);
        let mut a = ParticleField::seeded(config.clone(), 42);
        let mut b = ParticleField::seeded(config, 42);
        a.step(0.5);
        b.step(0.5);
        let size = egui::vec2(1920.0, 1080.0);
        assert_eq!(a.links(size).len(), b.links(size).len());
    }

    #[test]
    fn test_snow_wraps_to_the_top() {
        let mut snow = Snowfall::seeded(30, 9);
        for _ in 0..1_000 {
            snow.step(0.1);
        }
        assert_eq!(snow.len(), 30);
        assert!(snow.flakes.iter().all(|f| f.y <= 1.02 + 0.12 * 0.1));
    }
}
