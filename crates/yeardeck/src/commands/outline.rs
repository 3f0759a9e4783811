use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::deck::{ChartData, Deck, SlideRecord};

pub fn run(path: Option<&Path>) -> Result<()> {
    let deck = Deck::load_or_builtin(path)?;
    println!("{}", deck.title().bold());
    println!(
        "{}",
        format!("{} slides", deck.len()).dimmed()
    );
    println!();

    for (i, slide) in deck.slides.iter().enumerate() {
        println!(
            "{:>4}  {:<13} {}",
            format!("{:02}", i + 1).cyan(),
            slide.kind.name().yellow(),
            slide.title.bold()
        );
        for line in detail_lines(slide) {
            println!("      {:<13} {}", "", line.dimmed());
        }
    }
    Ok(())
}

/// Secondary lines printed under a slide's title.
fn detail_lines(slide: &SlideRecord) -> Vec<String> {
    let mut lines = Vec::new();
    if !slide.subtitle.is_empty() {
        lines.push(slide.subtitle.clone());
    }
    if let Some(list) = &slide.list {
        lines.extend(list.iter().map(|item| format!("\u{2022} {item}")));
    }
    match &slide.chart {
        Some(ChartData::TeamGrowth(team)) => {
            lines.push(format!("[chart] team {} \u{2192} {}", team.initial, team.current));
        }
        Some(ChartData::UserGrowth(users)) => {
            lines.push(format!(
                "[chart] {} {} \u{2192} {}",
                users.label, users.before, users.after
            ));
        }
        None => {}
    }
    if let Some(footer) = &slide.footer {
        lines.push(footer.clone());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SlideKind;

    #[test]
    fn test_team_slide_lists_chart() {
        let deck = Deck::builtin().unwrap();
        let team = deck
            .slides
            .iter()
            .find(|s| s.kind == SlideKind::Team)
            .unwrap();
        let lines = detail_lines(team);
        assert!(lines.iter().any(|l| l == "[chart] team 6 \u{2192} 20"));
    }

    #[test]
    fn test_thanks_slide_lists_footer() {
        let deck = Deck::builtin().unwrap();
        let thanks = deck.slides.last().unwrap();
        let lines = detail_lines(thanks);
        assert_eq!(
            lines.last().map(String::as_str),
            Some("With warm wishes from the Ofi Services team")
        );
    }
}
