//! Table command handler.

use anyhow::Result;
use multimime_core::MimeTable;

use crate::bootstrap::CliContext;

/// Print the upload allow-list with primary MIME types applied.
pub fn execute(ctx: &CliContext, json: bool) -> Result<bool> {
    println!("{}", render(&upload_table(ctx), json)?);
    Ok(true)
}

/// The host table with the registry's primary types projected onto it.
pub fn upload_table(ctx: &CliContext) -> MimeTable {
    ctx.filter().upload_mimes(ctx.host_table.clone())
}

/// Format a table as aligned text or pretty JSON.
pub fn render(table: &MimeTable, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(table)?);
    }

    let width = table.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    Ok(table
        .iter()
        .map(|(key, mime)| format!("{key:<width$}  {mime}"))
        .collect::<Vec<_>>()
        .join("\n"))
}
