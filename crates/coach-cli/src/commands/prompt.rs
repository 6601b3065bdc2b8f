//! Report prompt rendering command

use std::path::Path;

use anyhow::{Context, Result};
use coach_core::{PersonaLibrary, ReportContext, ReportPrompt};

use super::{build_goal, run_analysis};
use crate::cli::{DatasetArgs, GoalArgs};

/// Analyze a dataset and print the rendered report prompt
pub fn cmd_prompt(
    config_path: Option<&Path>,
    data: &DatasetArgs,
    goal_args: &GoalArgs,
    persona: Option<&str>,
) -> Result<()> {
    let goal = build_goal(goal_args)?;
    let summary = run_analysis(config_path, data, &goal)?;

    let library = PersonaLibrary::load().context("Failed to load personas")?;
    let persona = match persona {
        Some(key) => library.get(key)?,
        None => library.default_persona(),
    };

    let prompt = ReportPrompt::embedded().context("Failed to load report prompt")?;
    let (system, user) = ReportContext::new(&summary, &goal, persona).render(&prompt);

    println!("Prompt: {} (v{})", prompt.metadata.id, prompt.metadata.version);
    println!("Persona: {}", persona.name);
    println!();
    println!("--- System ---");
    println!("{}", system);
    println!();
    println!("--- User ---");
    println!("{}", user);

    Ok(())
}
