pub mod completion;
pub mod config;
pub mod export;
pub mod init;
pub mod outline;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "yeardeck".bold(),
        env!("CARGO_PKG_VERSION").cyan()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
