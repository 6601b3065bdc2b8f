//! Persona listing command

use anyhow::{Context, Result};
use coach_core::personas::default_personas_path;
use coach_core::PersonaLibrary;

use super::truncate;

/// List all personas and where they were loaded from
pub fn cmd_personas() -> Result<()> {
    let library = PersonaLibrary::load().context("Failed to load personas")?;
    let default_id = library.default_persona().id.clone();

    println!("Available Personas:\n");

    println!("{:<22} {:<22}  {}", "ID", "NAME", "STYLE");
    println!("{}", "-".repeat(80));

    for persona in library.personas() {
        let marker = if persona.id == default_id { "*" } else { " " };
        println!(
            "{}{:<21} {:<22}  {}",
            marker,
            persona.id,
            persona.name,
            truncate(&persona.style(), 34)
        );
    }

    println!();
    println!("* default");
    match library.override_path() {
        Some(path) => println!("Source: {}", path.display()),
        None => println!(
            "Source: built-in (override at {})",
            default_personas_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not available)".to_string())
        ),
    }

    Ok(())
}
