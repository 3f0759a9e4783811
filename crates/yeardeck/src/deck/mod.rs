pub mod template;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BUILTIN_DECK: &str = include_str!("../../../../decks/envalior-2025.yaml");

/// Literal per-client values a deck is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDeckConfig {
    pub company_name: String,
    pub vendor_name: String,
    pub year: i32,

    #[serde(default)]
    pub story: String,

    pub deliverables: DeliverablesConfig,
    pub domains: DomainsConfig,

    #[serde(default)]
    pub impact: Vec<String>,

    pub savings: SavingsConfig,
    pub team: TeamGrowth,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_growth: Option<UserGrowth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_tagline: Option<String>,

    #[serde(default)]
    pub technologies: Vec<String>,

    #[serde(default)]
    pub key_achievements: Vec<String>,

    /// Explicit slide order. Falls back to [`template::default_order`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<SlideKind>>,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub settings: DeckSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliverablesConfig {
    pub total: u32,
    #[serde(default)]
    pub breakdown: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainsConfig {
    pub total: u32,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsConfig {
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub source: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGrowth {
    pub initial: u32,
    pub current: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGrowth {
    pub label: String,
    pub before: u64,
    pub after: u64,
}

/// Media assets, relative to the deck file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_logo: Option<String>,

    /// Frames of the mobile intro animation, played in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intro_frames: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_paused: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideKind {
    Welcome,
    Story,
    Deliverables,
    Domains,
    Impact,
    Savings,
    Team,
    UserGrowth,
    Tech,
    Achievements,
    Thanks,
}

impl SlideKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Story => "story",
            Self::Deliverables => "deliverables",
            Self::Domains => "domains",
            Self::Impact => "impact",
            Self::Savings => "savings",
            Self::Team => "team",
            Self::UserGrowth => "userGrowth",
            Self::Tech => "tech",
            Self::Achievements => "achievements",
            Self::Thanks => "thanks",
        }
    }
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Visualization attached to the slide kinds that carry one.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    TeamGrowth(TeamGrowth),
    UserGrowth(UserGrowth),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideRecord {
    pub kind: SlideKind,
    pub title: String,
    pub subtitle: String,
    pub list: Option<Vec<String>>,
    pub footer: Option<String>,
    pub chart: Option<ChartData>,
}

/// The fixed, ordered slide sequence for one client.
#[derive(Debug, Clone)]
pub struct Deck {
    pub client: ClientDeckConfig,
    pub slides: Vec<SlideRecord>,
    /// Directory media paths are resolved against.
    pub base_path: PathBuf,
}

impl Deck {
    pub fn from_config(client: ClientDeckConfig, base_path: PathBuf) -> Result<Self> {
        let slides = template::build_slides(&client)?;
        Ok(Self {
            client,
            slides,
            base_path,
        })
    }

    pub fn parse(yaml: &str, base_path: &Path) -> Result<Self> {
        let client: ClientDeckConfig =
            serde_yaml::from_str(yaml).context("Invalid deck definition")?;
        Self::from_config(client, base_path.to_path_buf())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("Deck not found: {}", path.display())
            } else {
                anyhow::anyhow!("Failed to read {}: {e}", path.display())
            }
        })?;
        let base_path = path.parent().unwrap_or(Path::new("."));
        Self::parse(&contents, base_path)
            .with_context(|| format!("Failed to load deck {}", path.display()))
    }

    /// The deck compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_DECK, Path::new("."))
    }

    /// Load `path` if given, otherwise the built-in deck.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn title(&self) -> String {
        format!(
            "{} \u{00d7} {} \u{2014} {}",
            self.client.vendor_name, self.client.company_name, self.client.year
        )
    }

    /// Resolve a media path from the deck against its base directory.
    pub fn media_path(&self, relative: &str) -> PathBuf {
        let p = Path::new(relative);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_path.join(p)
        }
    }

    pub fn music_path(&self) -> Option<PathBuf> {
        self.client.media.music.as_deref().map(|m| self.media_path(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_parses() {
        let deck = Deck::builtin().unwrap();
        assert_eq!(deck.client.company_name, "Envalior");
        assert_eq!(deck.len(), 10);
        assert_eq!(deck.slides[0].kind, SlideKind::Welcome);
        assert_eq!(deck.slides[9].kind, SlideKind::Thanks);
    }

    #[test]
    fn test_northwind_deck_parses() {
        let content = include_str!("../../../../decks/northwind-2025.yaml");
        let deck = Deck::parse(content, Path::new(".")).unwrap();
        assert_eq!(deck.len(), 10);
        assert_eq!(deck.client.settings.autoplay_secs, Some(4));
        assert!(deck.slides.iter().any(|s| s.kind == SlideKind::UserGrowth));
        assert!(!deck.slides.iter().any(|s| s.kind == SlideKind::Tech));
    }

    #[test]
    fn test_slide_kind_yaml_names() {
        let kinds: Vec<SlideKind> = serde_yaml::from_str("[welcome, userGrowth, thanks]").unwrap();
        assert_eq!(
            kinds,
            vec![SlideKind::Welcome, SlideKind::UserGrowth, SlideKind::Thanks]
        );
        assert_eq!(SlideKind::UserGrowth.to_string(), "userGrowth");
    }

    #[test]
    fn test_unknown_slide_kind_rejected() {
        let content = BUILTIN_DECK.to_string() + "\nslides: [welcome, bloopers]\n";
        assert!(Deck::parse(&content, Path::new(".")).is_err());
    }

    #[test]
    fn test_media_paths_resolve_against_deck_dir() {
        let deck = Deck::parse(BUILTIN_DECK, Path::new("/decks")).unwrap();
        assert_eq!(
            deck.music_path(),
            Some(PathBuf::from("/decks/christmas-music.mp3"))
        );
        assert_eq!(
            deck.media_path("/abs/logo.png"),
            PathBuf::from("/abs/logo.png")
        );
    }

    #[test]
    fn test_missing_deck_file() {
        let err = Deck::load(Path::new("/nonexistent/deck.yaml")).unwrap_err();
        assert!(err.to_string().contains("Deck not found"));
    }

    #[test]
    fn test_deck_title() {
        let deck = Deck::builtin().unwrap();
        assert_eq!(deck.title(), "Ofi Services \u{00d7} Envalior \u{2014} 2025");
    }
}
