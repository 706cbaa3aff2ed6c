use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::derive::{self, DeriveOptions};
use crate::commands::migrate::{self, MigrateOptions};
use crate::commands::status::{self, StatusOptions};
use crate::commands::subjects::{self, SubjectsOptions};
use crate::commands::verify::{self, VerifyOptions};
use crate::commands::{CommandReport, SourceOptions};

#[derive(Parser)]
#[command(
    name = "offline-migrate",
    version,
    about = "Re-key player data from online-mode to offline-mode UUIDs"
)]
struct Cli {
    /// Print the command report as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Default)]
struct SourceArgs {
    /// Config file (defaults to OFFLINE_MIGRATE_CONFIG, then the user config dir)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Take the subject table from a server usercache.json instead of the config
    #[arg(long)]
    usercache: Option<PathBuf>,
}

impl From<SourceArgs> for SourceOptions {
    fn from(args: SourceArgs) -> Self {
        Self {
            config: args.config,
            usercache: args.usercache,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Copy every subject's files to its offline UUID and re-own them
    Migrate {
        #[command(flatten)]
        source: SourceArgs,
        /// Show what would be copied without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Do not append to the JSONL audit log
        #[arg(long)]
        no_audit: bool,
        /// Exit non-zero if any expected file is missing
        #[arg(long)]
        strict: bool,
    },
    /// Same as `migrate --dry-run`
    Plan {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the offline UUID for each name
    Derive {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Check migrated files against their sources, owner and mode
    Verify {
        #[command(flatten)]
        source: SourceArgs,
        /// Exit non-zero on warnings as well as mismatches
        #[arg(long)]
        strict: bool,
    },
    /// Show the resolved configuration and directories
    Status {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the subject table with derived UUIDs
    Subjects {
        #[command(flatten)]
        source: SourceArgs,
        /// Render as a `[[subjects]]` TOML block for the config file
        #[arg(long)]
        toml: bool,
    },
}

fn render(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    for line in &report.details {
        println!("{line}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    Ok(())
}

/// Runs the parsed command and returns the process exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let report = match cli.command {
        Command::Migrate {
            source,
            dry_run,
            no_audit,
            strict,
        } => migrate::run(&MigrateOptions {
            source: source.into(),
            dry_run,
            no_audit,
            strict,
        })?,
        Command::Plan { source } => migrate::run(&MigrateOptions {
            source: source.into(),
            dry_run: true,
            ..MigrateOptions::default()
        })?,
        Command::Derive { names } => derive::run(&DeriveOptions { names })?,
        Command::Verify { source, strict } => verify::run(&VerifyOptions {
            source: source.into(),
            strict,
        })?,
        Command::Status { source } => status::run(&StatusOptions {
            source: source.into(),
        })?,
        Command::Subjects { source, toml } => subjects::run(&SubjectsOptions {
            source: source.into(),
            toml,
        })?,
    };

    render(&report, cli.json)?;
    Ok(if report.ok { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
