use std::path::PathBuf;

use clap::{Parser, Subcommand};

use typestring::limits::CONFIG_FILE;

#[derive(Parser)]
#[command(name = "typestring")]
#[command(about = "Render type descriptor documents as canonical type strings")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Limits configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the type string of each rendered entry of a document
    Render(RenderArgs),
    /// Validate a document without rendering it
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// Descriptor document path
    pub file: PathBuf,

    /// Render only these keys (repeatable)
    #[arg(short = 't', long = "type")]
    pub types: Vec<String>,

    /// Also print the underlying type of named entries
    #[arg(long)]
    pub underlying: bool,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Descriptor document path
    pub file: PathBuf,
}
