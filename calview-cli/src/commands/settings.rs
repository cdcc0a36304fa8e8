use std::path::Path;

use anyhow::Result;
use calview_core::CalendarSettings;
use owo_colors::OwoColorize;

pub fn run(path: &Path) -> Result<()> {
    let settings = CalendarSettings::load(path)?;

    println!("{}", "Paths".bold());
    println!("  Settings:   {}", path.display());
    if !path.exists() {
        println!("  {}", "(file not found, showing defaults)".dimmed());
    }
    println!();
    println!("{}", "Settings".bold());
    print!("{}", toml::to_string_pretty(&settings)?);

    Ok(())
}
