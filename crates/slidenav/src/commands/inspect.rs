use std::path::Path;

use anyhow::Result;

use crate::cli::SessionArgs;
use crate::config::Config;
use crate::deck::Deck;
use crate::view;

pub fn run(file: &Path, args: &SessionArgs) -> Result<()> {
    let deck = Deck::load(file)?;
    let config = Config::load_or_default();
    let (_, nav) = super::open_presentation(deck, &config, args);
    let json = serde_json::to_string_pretty(&view::navigation_view(&nav))?;
    println!("{json}");
    Ok(())
}
