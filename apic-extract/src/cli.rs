use std::path::PathBuf;

use apic_extract::selection::SelectionSpec;
use clap::{ArgAction, Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "apic-extract")]
#[command(about = "Inspect, extract and status-mark objects in APIC tenant JSON exports")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Settings file overriding the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Files larger than this many bytes are decoded straight from disk.
    #[arg(long, global = true)]
    pub stream_threshold: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show object counts for one export.
    Describe(DescribeArgs),
    /// List the tenant's direct children with their positions.
    List(ListArgs),
    /// Show the object hierarchy as an indented tree.
    Inspect(InspectArgs),
    /// Show which objects a selection matches.
    Find(FindArgs),
    /// Extract selected objects into a standalone export.
    Extract(ExtractArgs),
    /// Set or clear the status attribute on selected objects.
    SetStatus(SetStatusArgs),
    /// Run the extract and status jobs listed in a TOML plan.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Position among the tenant's children; may be repeated.
    #[arg(short = 'c', long = "position")]
    pub position: Vec<usize>,
    /// Comma-separated positions, e.g. 1,3,5.
    #[arg(short = 'm', long, value_delimiter = ',')]
    pub positions: Vec<usize>,
    /// Object path such as 0.5.2; may be repeated.
    #[arg(long = "path")]
    pub path: Vec<String>,
    /// Class name to select or to narrow positions by.
    #[arg(long)]
    pub class: Option<String>,
    /// Comma-separated values of the name attribute.
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,
    /// Count positions over every depth, not only the tenant's children.
    #[arg(long)]
    pub deep: bool,
}

impl SelectionArgs {
    pub fn to_spec(&self) -> SelectionSpec {
        let mut positions = self.position.clone();
        positions.extend(&self.positions);
        SelectionSpec {
            positions,
            paths: self.path.clone(),
            class: self.class.clone(),
            names: self.names.clone(),
            deep: self.deep,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DescribeArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    pub file: PathBuf,
    /// Print every child instead of the preview.
    #[arg(long)]
    pub all: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Levels of children to show below each top-level object.
    #[arg(long)]
    pub depth: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct FindArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub selection: SelectionArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Mark the extracted objects with this status; the source is left alone.
    #[arg(long)]
    pub set_status: Option<String>,
    /// Write the export here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SetStatusArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// created, modified, deleted or modified,created.
    #[arg(long, required_unless_present = "clear", conflicts_with = "clear")]
    pub status: Option<String>,
    /// Remove the status attribute instead of setting it.
    #[arg(long)]
    pub clear: bool,
    #[arg(short, long, required_unless_present = "in_place", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,
    /// Overwrite the source file.
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    pub plan: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
