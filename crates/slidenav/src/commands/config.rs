use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
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
    println!("  {:<22} {}", "defaults.theme", config.theme());
    println!(
        "  {:<22} {}",
        "defaults.start_mode",
        config
            .defaults
            .as_ref()
            .and_then(|d| d.start_mode.as_deref())
            .unwrap_or("first")
    );
    println!("  {:<22} {}", "defaults.hover", config.hover());
    println!("  {:<22} {}", "defaults.print", config.print());
    if let Some(l10n) = &config.l10n {
        let yaml = serde_yaml::to_string(l10n)?;
        for line in yaml.lines() {
            println!("  l10n.{line}");
        }
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green(),
        path.display().to_string().dimmed()
    );
    Ok(())
}
