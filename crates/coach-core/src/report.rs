//! Report prompt assembler
//!
//! Renders an [`AnalysisSummary`], the user's [`GoalConfig`] and a
//! [`Persona`] into the prompt handed to the report-writing model. The
//! numbers are formatted here so the model only has to narrate them; no
//! model is called from this crate.
//!
//! The template is embedded from `prompts/coach_report.md`: YAML frontmatter,
//! then `# System` and `# User` sections with `{{var}}` placeholders and
//! `{{#if var}}...{{/if}}` blocks that are dropped when `var` is empty.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{AnalysisSummary, BaselineMethod, GoalConfig};
use crate::personas::Persona;

/// Embedded report prompt (compiled into binary)
const COACH_REPORT: &str = include_str!("../../../prompts/coach_report.md");

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// The coach report template, split into its `# System` and `# User` sections
#[derive(Debug, Clone)]
pub struct ReportPrompt {
    pub metadata: PromptMetadata,
    system: String,
    user: String,
}

impl ReportPrompt {
    /// The embedded coach report prompt
    pub fn embedded() -> Result<Self> {
        Self::parse(COACH_REPORT)
    }

    /// Parse a prompt file; both sections are required
    pub fn parse(content: &str) -> Result<Self> {
        let (frontmatter, body) = split_frontmatter(content)?;
        let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
            .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

        let mut system = None;
        let mut user = None;
        for (heading, text) in sections(body) {
            match heading {
                "System" => system = Some(text),
                "User" => user = Some(text),
                other => {
                    return Err(Error::InvalidData(format!(
                        "Unknown prompt section '# {}'",
                        other
                    )))
                }
            }
        }

        let missing = |name: &str| Error::InvalidData(format!("Prompt has no '# {}' section", name));
        Ok(Self {
            metadata,
            system: system.ok_or_else(|| missing("System"))?,
            user: user.ok_or_else(|| missing("User"))?,
        })
    }

    pub fn system_section(&self) -> &str {
        &self.system
    }

    pub fn user_section(&self) -> &str {
        &self.user
    }

    pub fn render_system(&self, vars: &HashMap<&str, String>) -> String {
        fill(&self.system, vars)
    }

    pub fn render_user(&self, vars: &HashMap<&str, String>) -> String {
        fill(&self.user, vars)
    }
}

/// Everything the report prompt needs
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub summary: &'a AnalysisSummary,
    pub goal: &'a GoalConfig,
    pub persona: &'a Persona,
}

impl<'a> ReportContext<'a> {
    pub fn new(summary: &'a AnalysisSummary, goal: &'a GoalConfig, persona: &'a Persona) -> Self {
        Self {
            summary,
            goal,
            persona,
        }
    }

    /// Convert the context to template variables for prompt rendering
    ///
    /// Every variable is present; list variables are empty strings when there
    /// is nothing to list, which drops their `{{#if}}` blocks.
    pub fn to_template_vars(&self) -> HashMap<&'static str, String> {
        let s = self.summary;
        let mut vars = HashMap::new();

        vars.insert("persona_name", self.persona.name.clone());
        vars.insert("persona_style", self.persona.style());

        vars.insert("transaction_count", s.transaction_count.to_string());
        vars.insert("average_monthly_spend", money(s.average_monthly_spend));
        vars.insert("baseline_method", s.baseline.to_string());
        vars.insert("baseline_note", baseline_note(&s.baseline));
        vars.insert(
            "most_expensive_month",
            s.most_expensive_month()
                .map(|m| format!("{} (${})", m.label(), money(m.total)))
                .unwrap_or_default(),
        );
        vars.insert(
            "top_categories",
            bullet_list(
                s.top_categories
                    .iter()
                    .map(|c| format!("{}: ${}", c.category, money(c.total))),
                "(no spending in this period)",
            ),
        );

        vars.insert("goal_amount", money(self.goal.target_amount));
        vars.insert("goal_months", self.goal.horizon_months.to_string());
        vars.insert("monthly_income", money(self.goal.monthly_income));
        vars.insert("required_monthly_savings", money(s.required_monthly_savings));
        vars.insert("monthly_savings", money(s.monthly_savings));
        vars.insert("savings_rate", format!("{:.1}", s.savings_rate_pct));
        vars.insert("savings_gap", money(s.savings_gap));
        vars.insert("months_to_goal", s.months_to_goal.to_string());
        vars.insert("verdict", if s.on_track { "Yes" } else { "No" }.to_string());

        vars.insert(
            "recurring_charges",
            bullet_list(
                s.recurring_charges.iter().map(|r| {
                    format!(
                        "{}: ${} x {} (${} total)",
                        r.category,
                        money(r.amount),
                        r.occurrences,
                        money(r.total())
                    )
                }),
                "",
            ),
        );
        vars.insert(
            "gray_charges",
            bullet_list(
                s.gray_charges
                    .iter()
                    .map(|g| format!("{}: ${} x {}", g.category, money(g.amount), g.occurrences)),
                "",
            ),
        );
        vars.insert(
            "large_charges",
            bullet_list(
                s.large_charges.iter().map(|t| match t.date {
                    Some(date) => format!("{} {}: ${}", date, t.category, money(t.amount)),
                    None => format!("{}: ${}", t.category, money(t.amount)),
                }),
                "",
            ),
        );

        vars
    }

    /// Render (system, user) prompt texts
    pub fn render(&self, prompt: &ReportPrompt) -> (String, String) {
        let vars = self.to_template_vars();
        (prompt.render_system(&vars), prompt.render_user(&vars))
    }
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn bullet_list(items: impl Iterator<Item = String>, empty: &str) -> String {
    let lines: Vec<String> = items.map(|item| format!("  - {}", item)).collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

fn baseline_note(method: &BaselineMethod) -> String {
    match method {
        BaselineMethod::WindowEstimate { window_days } => format!(
            "no dates were available, so this is the total spread over {} days, not a true monthly average",
            window_days
        ),
        BaselineMethod::CalendarMonths { months: 0 } => {
            "no transactions fell inside the analysis window".to_string()
        }
        BaselineMethod::CalendarMonths { months: 1 } => {
            "only one calendar month of data, so this is not a stable multi-month average".to_string()
        }
        BaselineMethod::CalendarMonths { .. } => String::new(),
    }
}

/// Split `---` delimited YAML frontmatter from the template body
fn split_frontmatter(content: &str) -> Result<(&str, &str)> {
    let rest = content.trim_start().strip_prefix("---").ok_or_else(|| {
        Error::InvalidData("Prompt must start with YAML frontmatter (---)".into())
    })?;
    rest.split_once("\n---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })
}

/// `# Heading` lines open a section; text before the first heading is ignored
fn sections(body: &str) -> Vec<(&str, String)> {
    let mut out: Vec<(&str, String)> = Vec::new();
    for line in body.lines() {
        if let Some(heading) = line.strip_prefix("# ") {
            out.push((heading.trim(), String::new()));
        } else if let Some((_, text)) = out.last_mut() {
            text.push_str(line);
            text.push('\n');
        }
    }
    for (_, text) in &mut out {
        *text = text.trim().to_string();
    }
    out
}

const IF_OPEN: &str = "{{#if ";
const IF_CLOSE: &str = "{{/if}}";

/// Fill a template section
///
/// `{{#if var}}` blocks are decided on the template text alone, then
/// placeholders are substituted in one left-to-right pass. Substituted values
/// (category labels come straight from user data) are never re-read as
/// template syntax. Blocks do not nest.
fn fill(template: &str, vars: &HashMap<&str, String>) -> String {
    substitute(&resolve_blocks(template, vars), vars)
}

fn is_set(vars: &HashMap<&str, String>, name: &str) -> bool {
    vars.get(name).is_some_and(|value| !value.is_empty())
}

/// Keep the body of each `{{#if var}}...{{/if}}` block when `var` is non-empty
fn resolve_blocks(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(IF_OPEN) {
        out.push_str(&rest[..open]);
        let block = &rest[open..];
        let parsed = block[IF_OPEN.len()..].split_once("}}").and_then(|(name, tail)| {
            tail.split_once(IF_CLOSE)
                .map(|(body, after)| (name, body, after))
        });

        // An unterminated block is left as literal text
        let Some((name, body, after)) = parsed else {
            out.push_str(block);
            return out;
        };
        if is_set(vars, name.trim()) {
            out.push_str(body);
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Replace `{{var}}` placeholders; unknown names are kept verbatim
fn substitute(text: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let Some((name, tail)) = rest[open + 2..].split_once("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        match vars.get(name.trim()) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..open + name.len() + 4]),
        }
        rest = tail;
    }

    out.push_str(rest);
    out
}
