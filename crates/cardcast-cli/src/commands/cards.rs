//! Cards command implementation

use anyhow::Result;
use cardcast_core::{Category, Config};

pub fn cmd_cards(config: &Config) -> Result<()> {
    println!();
    println!("💳 Card Catalog");
    match &config.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: built-in defaults"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    let mut header = format!("   {:12} │ {:>7}", "Card", "Fee");
    for category in Category::ALL {
        header.push_str(&format!(" │ {:>5}", abbreviate(category)));
    }
    println!("{}", header);

    for (card_id, card) in config.catalog.iter() {
        let mut line = format!("   {:12} │ {:>7.2}", card_id, card.annual_fee());
        for category in Category::ALL {
            line.push_str(&format!(" │ {:>4.1}%", card.rate(category) * 100.0));
        }
        println!("{}", line);
    }

    println!();
    println!("   {} cards", config.catalog.len());
    Ok(())
}

/// Short column label for a category
fn abbreviate(category: Category) -> &'static str {
    match category {
        Category::Groceries => "groc",
        Category::Dining => "dine",
        Category::Travel => "trvl",
        Category::Gas => "gas",
        Category::Online => "onln",
        Category::Bills => "bill",
        Category::Entertainment => "ent",
        Category::Others => "oth",
    }
}
