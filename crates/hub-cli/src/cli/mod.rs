use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Raw,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub portal_url: Option<String>,
}

/// Top-level CLI parser for the `hubctx` binary.
#[derive(Debug, Parser)]
#[command(name = "hubctx", version, about = "Inspect and persist hub identity contexts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Organization URL for anonymous contexts (overrides config)
    #[arg(long, global = true)]
    pub portal_url: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            portal_url: self.portal_url.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a context and print its snapshot summary
    Inspect(InspectArgs),
    /// Build a context and print its serialized token
    Serialize(SerializeArgs),
    /// Print the JSON inside a serialized token
    Decode(DecodeArgs),
}

/// Where the context comes from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Session JSON file to sign in with
    #[arg(long, conflicts_with = "token")]
    pub session: Option<PathBuf>,

    /// Serialized context token to restore
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct SerializeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the token to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Token to decode; reads stdin when omitted
    pub token: Option<String>,
}
