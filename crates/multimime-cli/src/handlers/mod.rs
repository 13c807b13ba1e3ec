//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<bool>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call the core through the context
//!   3. Format output for the terminal
//!
//! The returned flag is `false` when the command ran but its check did not
//! pass (rejected upload, lint warnings).

pub mod check;
pub mod registry;
pub mod table;
