use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tagsmith_types::{ObjectId, ObjectType};

#[derive(Parser)]
#[command(
    name = "tagsmith",
    about = "Validate tag records and admit them into a content-addressed store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store directory [default: $TAGSMITH_DIR or .tagsmith]
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Configuration file [default: <store>/config.toml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// One-off configuration override, e.g. fsck.extraHeaderEntry=ignore
    #[arg(short = 'c', global = true, value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a tag record read from stdin and store it
    CreateTag(CreateTagArgs),
    /// Compute an object ID, optionally storing the object
    HashObject(HashObjectArgs),
    /// Print a stored object's content, type or size
    CatObject(CatObjectArgs),
    /// Register or delete a replacement used during verification
    Replace(ReplaceArgs),
}

#[derive(Args)]
pub struct CreateTagArgs {
    /// Treat fsck warnings as errors (default)
    #[arg(long, overrides_with = "no_strict")]
    pub strict: bool,
    /// Report fsck warnings without failing
    #[arg(long, overrides_with = "strict")]
    pub no_strict: bool,
}

impl CreateTagArgs {
    pub fn is_strict(&self) -> bool {
        !self.no_strict
    }
}

#[derive(Args)]
pub struct HashObjectArgs {
    #[arg(short = 't', long = "type", default_value = "blob")]
    pub kind: ObjectType,
    /// Write the object into the store
    #[arg(short = 'w')]
    pub write: bool,
    /// Read from this file instead of stdin
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct CatObjectArgs {
    /// Print the object's type
    #[arg(short = 't', conflicts_with = "size")]
    pub show_type: bool,
    /// Print the object's size
    #[arg(short = 's')]
    pub size: bool,
    pub id: ObjectId,
}

#[derive(Args)]
pub struct ReplaceArgs {
    /// Delete the replacement registered for <ORIGINAL>
    #[arg(short = 'd', long, conflicts_with_all = ["replacement", "force"])]
    pub delete: bool,
    /// Skip the existence and type checks
    #[arg(short, long)]
    pub force: bool,
    pub original: ObjectId,
    #[arg(required_unless_present = "delete")]
    pub replacement: Option<ObjectId>,
}
