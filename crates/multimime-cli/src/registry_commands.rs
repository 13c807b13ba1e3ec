//! Registry subcommands.

use clap::Subcommand;

/// Registry inspection commands.
#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// Print the normalized registry for a context
    Show {
        /// Actor whose overlays are applied
        #[arg(short, long)]
        actor: Option<String>,
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report likely mistakes in the registry file
    Lint,
}
