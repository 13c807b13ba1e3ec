//! Registry command handler.
//!
//! Shows the normalized registry for a context and lints the registry file.

use anyhow::Result;
use multimime_core::{ExtensionMimeSet, MimeContext, lint_registry};

use crate::bootstrap::CliContext;
use crate::registry_commands::RegistryCommand;

/// Execute a registry subcommand.
pub fn execute(ctx: &CliContext, command: RegistryCommand) -> Result<bool> {
    match command {
        RegistryCommand::Show { actor, json } => show(ctx, actor, json),
        RegistryCommand::Lint => lint(ctx),
    }
}

fn show(ctx: &CliContext, actor: Option<String>, json: bool) -> Result<bool> {
    let registry = ctx.mimes.additional_mimes(&MimeContext::from_actor(actor));
    println!("{}", render(&registry, json)?);
    Ok(true)
}

/// Format a registry as one line per extension or pretty JSON.
pub fn render(registry: &ExtensionMimeSet, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(registry)?);
    }

    if registry.is_empty() {
        return Ok("No additional MIME types registered.".to_string());
    }

    let lines: Vec<String> = registry
        .iter()
        .map(|(extension, mimes)| match mimes.split_first() {
            None => format!("{extension}: (empty)"),
            Some((primary, [])) => format!("{extension}: {primary}"),
            Some((primary, rest)) => format!("{extension}: {primary} (also {})", rest.join(", ")),
        })
        .collect();
    Ok(lines.join("\n"))
}

fn lint(ctx: &CliContext) -> Result<bool> {
    let config = ctx.load_registry()?;
    let warnings = lint_registry(&config);

    if warnings.is_empty() {
        println!("✓ Registry looks good.");
        return Ok(true);
    }

    for warning in &warnings {
        println!("⚠ {warning}");
    }
    println!();
    println!("{} warning(s)", warnings.len());
    Ok(false)
}
