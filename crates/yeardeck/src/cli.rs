use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::deck::Deck;
use crate::show::ShowOptions;
use crate::show::autoplay::DEFAULT_INTERVAL;
use crate::theme::Theme;

#[derive(Parser)]
#[command(name = "yeardeck")]
#[command(author, version, about)]
#[command(long_about = "A year-in-review slideshow for presenting yearly results to a client.\n\n\
    Describe the client's year in a YAML deck and present it full screen.\n\n\
    Examples:\n  \
    yeardeck                          Present the built-in sample deck\n  \
    yeardeck client.yaml --windowed   Present a deck in a window\n  \
    yeardeck client.yaml --paused     Start with autoplay paused\n  \
    yeardeck outline client.yaml      Print the slide sequence\n  \
    yeardeck init client.yaml         Create a new deck interactively")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present (defaults to the built-in sample deck)
    pub deck: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Seconds between automatic slide advances
    #[arg(long, value_name = "SECS", global = false)]
    pub autoplay: Option<u64>,

    /// Start with autoplay paused
    #[arg(long, global = false)]
    pub paused: bool,

    /// Start with autoplay running, even if the deck or config says paused
    #[arg(long, global = false, conflicts_with = "paused")]
    pub play: bool,

    /// Color theme (winter or light)
    #[arg(long, global = false)]
    pub theme: Option<String>,

    /// Skip the intro shown on narrow windows
    #[arg(long, global = false)]
    pub no_intro: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the slide sequence of a deck
    Outline {
        /// Deck file (defaults to the built-in sample deck)
        deck: Option<PathBuf>,
    },

    /// Export slides as PNG images
    Export {
        /// Deck file to export
        deck: PathBuf,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Create a new deck file interactively
    Init {
        /// Where to write the deck
        #[arg(default_value = "deck.yaml")]
        path: PathBuf,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.autoplay_secs, audio.player)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Outline { deck }) => crate::commands::outline::run(deck.as_deref()),
            Some(Commands::Export {
                deck,
                output_dir,
                width,
                height,
            }) => crate::commands::export::run(deck, output_dir, width, height),
            Some(Commands::Init { path }) => crate::commands::init::run(&path),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                let deck = Deck::load_or_builtin(self.deck.as_deref())?;
                let config = Config::load_or_default();
                let options = crate::app::RunOptions {
                    windowed: self.windowed,
                    show: self.show_options(&deck, &config),
                    theme: self.theme(&deck, &config),
                    player: config.player().map(str::to_string),
                    player_args: config.player_args().map(<[String]>::to_vec),
                };
                crate::app::run(deck, options)
            }
        }
    }

    /// CLI flags win over deck settings, which win over the user config.
    fn show_options(&self, deck: &Deck, config: &Config) -> ShowOptions {
        let secs = self
            .autoplay
            .or(deck.client.settings.autoplay_secs)
            .or(config.autoplay_secs());
        ShowOptions {
            autoplay_interval: crate::app::autoplay_interval(secs, DEFAULT_INTERVAL),
            start_paused: self
                .paused_flag()
                .or(deck.client.settings.start_paused)
                .or(config.start_paused())
                .unwrap_or(false),
            start_slide: self.slide.map(|s| s.saturating_sub(1)).unwrap_or(0),
            intro_enabled: !self.no_intro,
        }
    }

    fn paused_flag(&self) -> Option<bool> {
        match (self.paused, self.play) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    fn theme(&self, deck: &Deck, config: &Config) -> Theme {
        let name = self
            .theme
            .as_deref()
            .or(deck.client.settings.theme.as_deref())
            .or(config.theme());
        name.map(Theme::from_name).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_deck_and_config() {
        let deck = Deck::builtin().unwrap();
        let mut config = Config::default();
        config.set("defaults.autoplay_secs", "20").unwrap();
        config.set("defaults.theme", "light").unwrap();

        let cli = Cli::parse_from(["yeardeck", "--autoplay", "3", "--slide", "4", "--theme", "winter"]);
        let options = cli.show_options(&deck, &config);
        assert_eq!(options.autoplay_interval, Duration::from_secs(3));
        assert_eq!(options.start_slide, 3);
        assert_eq!(cli.theme(&deck, &config).name, "winter");
    }

    #[test]
    fn test_config_fills_in_missing_flags() {
        let deck = Deck::builtin().unwrap();
        let mut config = Config::default();
        config.set("defaults.autoplay_secs", "20").unwrap();
        config.set("defaults.start_paused", "true").unwrap();
        config.set("defaults.theme", "light").unwrap();

        let cli = Cli::parse_from(["yeardeck"]);
        let options = cli.show_options(&deck, &config);
        assert_eq!(options.autoplay_interval, Duration::from_secs(20));
        assert!(options.start_paused);
        assert_eq!(options.start_slide, 0);
        assert_eq!(cli.theme(&deck, &config).name, "light");
    }

    #[test]
    fn test_deck_settings_beat_config() {
        let yaml = include_str!("../../../decks/northwind-2025.yaml");
        let deck = Deck::parse(yaml, std::path::Path::new(".")).unwrap();
        let mut config = Config::default();
        config.set("defaults.autoplay_secs", "20").unwrap();
        let options = Cli::parse_from(["yeardeck"]).show_options(&deck, &config);
        assert_eq!(options.autoplay_interval, Duration::from_secs(4));
    }

    #[test]
    fn test_play_flag_overrides_paused_settings() {
        let yaml = include_str!("../../../decks/northwind-2025.yaml");
        let mut deck = Deck::parse(yaml, std::path::Path::new(".")).unwrap();
        let mut config = Config::default();
        config.set("defaults.start_paused", "true").unwrap();

        let options = Cli::parse_from(["yeardeck", "--play"]).show_options(&deck, &config);
        assert!(!options.start_paused);

        deck.client.settings.start_paused = Some(false);
        let options = Cli::parse_from(["yeardeck"]).show_options(&deck, &config);
        assert!(!options.start_paused);

        deck.client.settings.start_paused = Some(true);
        config.set("defaults.start_paused", "false").unwrap();
        let options = Cli::parse_from(["yeardeck"]).show_options(&deck, &config);
        assert!(options.start_paused);
        let options = Cli::parse_from(["yeardeck", "--play"]).show_options(&deck, &config);
        assert!(!options.start_paused);

        assert!(Cli::try_parse_from(["yeardeck", "--paused", "--play"]).is_err());
    }

    #[test]
    fn test_defaults_without_any_settings() {
        let deck = Deck::builtin().unwrap();
        let options = Cli::parse_from(["yeardeck"]).show_options(&deck, &Config::default());
        assert_eq!(options.autoplay_interval, DEFAULT_INTERVAL);
        assert!(!options.start_paused);
        assert!(options.intro_enabled);
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::parse_from(["yeardeck", "export", "deck.yaml", "-o", "out"]);
        assert!(matches!(cli.command, Some(Commands::Export { .. })));
        let cli = Cli::parse_from(["yeardeck", "outline"]);
        assert!(matches!(cli.command, Some(Commands::Outline { deck: None })));
    }
}
