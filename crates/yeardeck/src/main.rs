mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod media;
mod render;
mod show;
mod theme;

use clap::Parser;
use colored::Colorize;

const LOG_ENV: &str = "YEARDECK_LOG";

fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    if quiet {
        return log::LevelFilter::Error;
    }
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose, quiet))
        .parse_env(LOG_ENV)
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_maps_to_levels() {
        assert_eq!(log_level(0, false), log::LevelFilter::Warn);
        assert_eq!(log_level(1, false), log::LevelFilter::Debug);
        assert_eq!(log_level(2, false), log::LevelFilter::Trace);
        assert_eq!(log_level(2, true), log::LevelFilter::Error);
    }
}
