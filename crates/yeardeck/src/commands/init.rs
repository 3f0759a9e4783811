use anyhow::{Context, Result};
use colored::Colorize;
use inquire::{Confirm, CustomType, Text};
use std::path::Path;

use crate::deck::{
    ClientDeckConfig, DeckSettings, DeliverablesConfig, Deck, DomainsConfig, MediaConfig,
    SavingsConfig, TeamGrowth,
};

/// Answers collected by the interactive prompts.
#[derive(Debug, Clone)]
pub struct Answers {
    pub company_name: String,
    pub vendor_name: String,
    pub year: i32,
    pub deliverables: u32,
    pub domains: u32,
    pub savings: u64,
    pub currency: String,
    pub team_initial: u32,
    pub team_current: u32,
}

/// A complete deck with placeholder text the user is expected to edit.
pub fn starter_config(answers: &Answers) -> ClientDeckConfig {
    ClientDeckConfig {
        company_name: answers.company_name.clone(),
        vendor_name: answers.vendor_name.clone(),
        year: answers.year,
        story: format!("How {} and {} started working together", answers.vendor_name, answers.company_name),
        deliverables: DeliverablesConfig {
            total: answers.deliverables,
            breakdown: "Apps \u{2022} Agents \u{2022} Starter Kits".to_string(),
        },
        domains: DomainsConfig {
            total: answers.domains,
            summary: String::new(),
            items: Vec::new(),
        },
        impact: vec!["Describe a measurable result".to_string()],
        savings: SavingsConfig {
            amount: answers.savings,
            currency: answers.currency.clone(),
            source: String::new(),
        },
        team: TeamGrowth {
            initial: answers.team_initial,
            current: answers.team_current,
        },
        user_growth: None,
        tech_tagline: None,
        technologies: Vec::new(),
        key_achievements: vec!["Describe a milestone".to_string()],
        slides: None,
        media: MediaConfig::default(),
        settings: DeckSettings::default(),
    }
}

/// Serialize and validate a deck before it is written.
pub fn render_yaml(config: &ClientDeckConfig, base_path: &Path) -> Result<String> {
    Deck::from_config(config.clone(), base_path.to_path_buf())?;
    let yaml = serde_yaml::to_string(config)?;
    Ok(format!(
        "# Year-in-review deck: {} x {}\n{yaml}",
        config.vendor_name, config.company_name
    ))
}

fn prompt() -> Result<Answers> {
    let company_name = Text::new("Client company name:").prompt()?;
    let vendor_name = Text::new("Your company name:").prompt()?;
    let year = CustomType::<i32>::new("Year under review:")
        .with_default(2025)
        .prompt()?;
    let deliverables = CustomType::<u32>::new("Number of deliverables:")
        .with_default(0)
        .prompt()?;
    let domains = CustomType::<u32>::new("Number of domains transformed:")
        .with_default(0)
        .prompt()?;
    let savings = CustomType::<u64>::new("Cost savings realized:")
        .with_default(0)
        .prompt()?;
    let currency = Text::new("Currency:").with_default("EUR").prompt()?;
    let team_initial = CustomType::<u32>::new("Team size at the start of the year:")
        .with_default(1)
        .prompt()?;
    let team_current = CustomType::<u32>::new("Team size today:")
        .with_default(team_initial)
        .prompt()?;

    Ok(Answers {
        company_name,
        vendor_name,
        year,
        deliverables,
        domains,
        savings,
        currency,
        team_initial,
        team_current,
    })
}

pub fn run(path: &Path) -> Result<()> {
    if path.exists() {
        let overwrite = Confirm::new(&format!("{} exists. Overwrite?", path.display()))
            .with_default(false)
            .prompt()?;
        if !overwrite {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let answers = prompt()?;
    let config = starter_config(&answers);
    let base_path = path.parent().unwrap_or(Path::new("."));
    let yaml = render_yaml(&config, base_path)?;

    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Created".green(), path.display());
    println!(
        "{}",
        format!("Edit the placeholders, then run `yeardeck {}`", path.display()).dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> Answers {
        Answers {
            company_name: "Contoso".to_string(),
            vendor_name: "Ofi Services".to_string(),
            year: 2026,
            deliverables: 4,
            domains: 2,
            savings: 48_000,
            currency: "USD".to_string(),
            team_initial: 2,
            team_current: 5,
        }
    }

    #[test]
    fn test_starter_deck_is_valid() {
        let yaml = render_yaml(&starter_config(&answers()), Path::new(".")).unwrap();
        let deck = Deck::parse(&yaml, Path::new(".")).unwrap();
        assert_eq!(deck.client.company_name, "Contoso");
        assert_eq!(deck.slides[2].title, "4 Deliverables");
        assert_eq!(deck.slides[5].title, "USD 48K Realized");
        assert_eq!(deck.slides[6].title, "2 to 5 Team Members");
        assert_eq!(
            deck.slides.last().map(|s| s.subtitle.as_str()),
            Some("Here's to an even more successful 2027!")
        );
    }

    #[test]
    fn test_blank_company_is_rejected() {
        let mut a = answers();
        a.company_name = "  ".to_string();
        assert!(render_yaml(&starter_config(&a), Path::new(".")).is_err());
    }
}
