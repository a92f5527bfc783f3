use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the jsm binary.
#[derive(Parser, Debug)]
#[command(
    name = "jsm",
    version,
    about = "Build, validate and print mode-aware JavaScript global type surfaces"
)]
pub struct CliArgs {
    // ==================== Command-line Only Options ====================
    /// List the embedded declaration sets and stop.
    #[arg(long = "list-sets", alias = "listSets")]
    pub list_sets: bool,

    /// Print the resolved configuration instead of building.
    #[arg(long = "show-config", alias = "showConfig")]
    pub show_config: bool,

    /// Print the capability profile of the selected mode and stop.
    #[arg(long)]
    pub profile: bool,

    /// Path to jsmconfig.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    // ==================== Surface ====================
    /// Mode the surface is built for (overrides the config file).
    #[arg(short = 'm', long)]
    pub mode: Option<String>,

    /// Declaration sets to install: catalog ids or paths to .d.ts files.
    #[arg(long, value_delimiter = ',')]
    pub sets: Option<Vec<String>>,

    /// Directories scanned for additional .d.ts sets.
    #[arg(long = "set-root", value_name = "DIR")]
    pub set_roots: Vec<PathBuf>,

    /// Names excluded in addition to the mode's own exclusion list.
    #[arg(long = "exclude", value_delimiter = ',', value_name = "NAME")]
    pub exclusions: Vec<String>,

    /// Skip the index type consistency audit.
    #[arg(long = "no-index-audit", alias = "noIndexAudit")]
    pub no_index_audit: bool,

    // ==================== Output ====================
    /// What to print for a valid surface.
    #[arg(long, value_enum, ignore_case = true)]
    pub emit: Option<Emit>,

    /// Write the emitted surface to a file instead of stdout.
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Enable color in diagnostics and indentation in JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Emit {
    /// Declaration text.
    Dts,
    Json,
}
