use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::media::audio::{DEFAULT_PLAYER, DEFAULT_PLAYER_ARGS};
use crate::show::autoplay::DEFAULT_INTERVAL;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!(
                "{} {} = {}",
                "Set".green(),
                key.bold(),
                value.cyan()
            );
            println!("{}", format!("Saved to {}", path.display()).dimmed());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let default_args = DEFAULT_PLAYER_ARGS.join(" ");
    let rows = [
        ("defaults.theme", config.theme().map(str::to_string), "winter".to_string()),
        (
            "defaults.autoplay_secs",
            config.autoplay_secs().map(|s| s.to_string()),
            DEFAULT_INTERVAL.as_secs().to_string(),
        ),
        (
            "defaults.start_paused",
            config
                .defaults
                .as_ref()
                .and_then(|d| d.start_paused)
                .map(|p| p.to_string()),
            "false".to_string(),
        ),
        ("audio.player", config.player().map(str::to_string), DEFAULT_PLAYER.to_string()),
        ("audio.args", config.player_args().map(|a| a.join(" ")), default_args),
    ];

    for (key, value, default) in rows {
        match value {
            Some(v) => println!("  {:<24} {}", key, v.cyan()),
            None => println!("  {:<24} {}", key, format!("{default} (default)").dimmed()),
        }
    }
    Ok(())
}
