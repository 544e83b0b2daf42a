//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::OrphanMode;

/// Card catalog relationship graph: connectivity, orphans and tree layout
#[derive(Parser, Debug)]
#[command(name = "cardmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Catalog file (default: `catalog` from config)
    #[arg(short = 'f', long, global = true, env = "CARDMAP_CATALOG", value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List cards, optionally filtered
    Cards {
        /// Only cards connected to this card id
        #[arg(long, conflicts_with = "orphans")]
        connected: Option<String>,
        /// Only orphans of this kind
        #[arg(long, value_enum)]
        orphans: Option<OrphanArg>,
        /// Print the selection as catalog TOML
        #[arg(long)]
        toml: bool,
    },

    /// Ids weakly connected to a card
    Connected {
        /// Root card id
        id: String,
    },

    /// Cards missing their expected link
    Orphans {
        /// Orphan kind
        #[arg(value_enum)]
        mode: OrphanArg,
    },

    /// Compute the relationship tree layout
    Layout {
        /// Root card id
        id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = LayoutFormat::Text)]
        format: LayoutFormat,
    },

    /// Show the relationship tree
    Tree {
        /// Root card id
        id: String,
    },

    /// Follow links downstream from a card
    Trail {
        /// Start card id
        id: String,
    },

    /// Report dangling links, cycles and unregistered layers
    Check,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of one next to the catalog
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

/// Orphan kind as given on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrphanArg {
    /// Endpoint-layer cards nothing links to
    Endpoints,
    /// Throughpoint-layer cards that link nowhere
    Throughpoints,
}

impl From<OrphanArg> for OrphanMode {
    fn from(arg: OrphanArg) -> Self {
        match arg {
            OrphanArg::Endpoints => OrphanMode::Endpoints,
            OrphanArg::Throughpoints => OrphanMode::Throughpoints,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutFormat {
    /// Placements and curves as plain lines
    Text,
    /// Layout report as TOML
    Toml,
    /// Standalone SVG drawing
    Svg,
}
