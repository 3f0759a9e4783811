use std::collections::HashSet;

use anyhow::Result;

use super::{ChartData, ClientDeckConfig, SlideKind, SlideRecord};

/// Slide order used when a deck does not list its slides explicitly.
pub fn default_order(client: &ClientDeckConfig) -> Vec<SlideKind> {
    let mut order = vec![
        SlideKind::Welcome,
        SlideKind::Story,
        SlideKind::Deliverables,
        SlideKind::Domains,
        SlideKind::Impact,
        SlideKind::Savings,
        SlideKind::Team,
    ];
    if client.user_growth.is_some() {
        order.push(SlideKind::UserGrowth);
    }
    order.extend([SlideKind::Tech, SlideKind::Achievements, SlideKind::Thanks]);
    order
}

/// Build the full slide sequence for a client.
pub fn build_slides(client: &ClientDeckConfig) -> Result<Vec<SlideRecord>> {
    if client.company_name.trim().is_empty() {
        anyhow::bail!("Deck is missing a company_name");
    }

    let order = client
        .slides
        .clone()
        .unwrap_or_else(|| default_order(client));
    if order.is_empty() {
        anyhow::bail!("Deck has no slides");
    }

    let mut seen = HashSet::new();
    let mut slides = Vec::with_capacity(order.len());
    for kind in order {
        if !seen.insert(kind) {
            anyhow::bail!("Slide '{kind}' appears more than once");
        }
        slides.push(build_slide(kind, client)?);
    }
    Ok(slides)
}

pub fn build_slide(kind: SlideKind, client: &ClientDeckConfig) -> Result<SlideRecord> {
    let mut slide = SlideRecord {
        kind,
        title: String::new(),
        subtitle: String::new(),
        list: None,
        footer: None,
        chart: None,
    };

    match kind {
        SlideKind::Welcome => {
            slide.title = format!("\u{1F384} Our {} Journey", client.year);
            slide.subtitle = format!(
                "{}, celebrating a year of transformation together!",
                client.company_name
            );
        }
        SlideKind::Story => {
            slide.title = "\u{1F499} Our Love Story".to_string();
            slide.subtitle = client.story.clone();
        }
        SlideKind::Deliverables => {
            slide.title = format!("{} Deliverables", client.deliverables.total);
            slide.subtitle = client.deliverables.breakdown.clone();
        }
        SlideKind::Domains => {
            slide.title = format!("{} Domains Transformed", client.domains.total);
            slide.subtitle = client.domains.summary.clone();
            slide.list = non_empty(&client.domains.items);
        }
        SlideKind::Impact => {
            slide.title = "\u{1F4C8} Business Impact".to_string();
            slide.subtitle = "Real results that drive value".to_string();
            slide.list = non_empty(&client.impact);
        }
        SlideKind::Savings => {
            slide.title = format!(
                "{} Realized",
                format_amount(client.savings.amount, &client.savings.currency)
            );
            slide.subtitle = client.savings.source.clone();
        }
        SlideKind::Team => {
            slide.title = format!(
                "{} to {} Team Members",
                client.team.initial, client.team.current
            );
            slide.subtitle = "Growing together to serve you better".to_string();
            slide.chart = Some(ChartData::TeamGrowth(client.team));
        }
        SlideKind::UserGrowth => {
            let Some(growth) = &client.user_growth else {
                anyhow::bail!("Slide 'userGrowth' requires a user_growth section");
            };
            slide.title = "\u{1F4CA} User Growth".to_string();
            slide.subtitle = growth.label.clone();
            slide.chart = Some(ChartData::UserGrowth(growth.clone()));
        }
        SlideKind::Tech => {
            slide.title = "Technologies Deployed".to_string();
            slide.subtitle = client
                .tech_tagline
                .clone()
                .unwrap_or_else(|| "The platform behind every result".to_string());
            slide.list = non_empty(&client.technologies);
        }
        SlideKind::Achievements => {
            slide.title = "\u{1F31F} Key Milestones".to_string();
            slide.subtitle = "What we built together".to_string();
            slide.list = non_empty(&client.key_achievements);
        }
        SlideKind::Thanks => {
            slide.title = "Thank You! \u{1F385}".to_string();
            slide.subtitle = format!(
                "Here's to an even more successful {}!",
                client.year + 1
            );
            slide.footer = Some(format!(
                "With warm wishes from the {} team",
                client.vendor_name
            ));
        }
    }

    Ok(slide)
}

/// `175000, "EUR"` -> `"EUR 175K"`. Amounts under a thousand are shown as-is.
pub fn format_amount(amount: u64, currency: &str) -> String {
    if amount >= 1000 {
        let thousands = (amount as f64 / 1000.0).round() as u64;
        format!("{currency} {thousands}K")
    } else {
        format!("{currency} {amount}")
    }
}

fn non_empty(items: &[String]) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items.to_vec())
    }
}
