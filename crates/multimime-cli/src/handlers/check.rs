//! Check command handler.
//!
//! Runs one file through the upload filter and prints the verdict.

use std::path::PathBuf;

use anyhow::Result;
use multimime_core::{MimeContext, MimeTable, UploadRequest, UploadVerdict};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Arguments for the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub file: PathBuf,
    pub name: Option<String>,
    pub sniffed: Option<String>,
    pub actor: Option<String>,
    pub allow: Vec<(String, String)>,
    pub json: bool,
}

/// Execute the check command.
///
/// Returns `Ok(false)` when the upload is rejected.
pub async fn execute(ctx: &CliContext, args: CheckArgs) -> Result<bool> {
    let filename = match args.name {
        Some(name) => name,
        None => args
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| CliError::Arguments(format!("no filename in {}", args.file.display())))?,
    };

    let contents = tokio::fs::read(&args.file)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", args.file.display())))?;

    let allowlist = (!args.allow.is_empty()).then(|| args.allow.into_iter().collect::<MimeTable>());

    let request = UploadRequest::new(filename, contents)
        .with_sniffed_type(args.sniffed)
        .with_context(MimeContext::from_actor(args.actor))
        .with_caller_allowlist(allowlist);

    let verdict = ctx.filter().evaluate(&ctx.host_table, &request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", describe(&request.filename, &verdict));
    }

    Ok(verdict.is_accepted())
}

/// One-line description of a verdict.
pub fn describe(filename: &str, verdict: &UploadVerdict) -> String {
    match verdict {
        UploadVerdict::AcceptedPrimary {
            extension,
            mime_type,
        } => format!("✓ {filename}: accepted as .{extension} ({mime_type})"),
        UploadVerdict::AcceptedVariant(result) => format!(
            "✓ {filename}: accepted as .{} ({}, registered variant)",
            result.extension.as_deref().unwrap_or("?"),
            result.mime_type.as_deref().unwrap_or("?"),
        ),
        UploadVerdict::Rejected {
            extension,
            sniffed_type,
        } => {
            let ext = extension
                .as_deref()
                .map_or_else(|| "no extension".to_string(), |e| format!(".{e}"));
            match sniffed_type {
                Some(sniffed) => format!("✗ {filename}: {sniffed} is not allowed for {ext}"),
                None => format!("✗ {filename}: {ext} is not allowed"),
            }
        }
    }
}
