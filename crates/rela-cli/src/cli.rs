//! CLI argument parsing and command definitions.
//!
//! Global flags (config file, verbosity) come first; graph queries live
//! under `rela graph` and take the snapshot to query and an output format.

use clap::{Parser, Subcommand, ValueEnum};
use rela_graph::Direction;

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "rela", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "RELA_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query a graph snapshot.
    Graph(GraphCommand),

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Output rendering for graph queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// Graph commands
// ============================================================================

/// Graph query command with its shared options.
#[derive(Parser, Debug)]
pub struct GraphCommand {
    /// Snapshot file to load (defaults to `graph.snapshot_path`).
    #[arg(short, long, global = true)]
    pub snapshot: Option<String>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Graph subcommand to execute.
    #[command(subcommand)]
    pub command: GraphSubcommand,
}

/// Available graph subcommands.
#[derive(Subcommand, Debug)]
pub enum GraphSubcommand {
    /// Show graph statistics.
    Stats,

    /// List nodes one hop away.
    Neighbors {
        /// Node ID.
        id: String,

        /// Only follow edges of this relationship type.
        #[arg(short = 't', long)]
        relationship: Option<String>,

        /// Direction to follow: out, in, or both.
        #[arg(short, long, default_value = "both")]
        direction: Direction,
    },

    /// Find the shortest path between two nodes.
    Path {
        /// Source node ID.
        from: String,

        /// Target node ID.
        to: String,
    },

    /// Enumerate all simple paths between two nodes.
    Paths {
        /// Source node ID.
        from: String,

        /// Target node ID.
        to: String,

        /// Maximum path length in edges (defaults to `graph.max_path_depth`).
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Abort after this many milliseconds; 0 disables the deadline.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show the connected component containing a node.
    Component {
        /// Node ID.
        id: String,
    },

    /// Partition the graph into communities.
    Communities,

    /// Centrality for one node, or a ranking of all nodes.
    Centrality {
        /// Node ID; omit to rank every node.
        id: Option<String>,

        /// Number of nodes to show when ranking.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Suggest likely relationships for a node.
    Suggest {
        /// Node ID.
        id: String,

        /// Maximum number of suggestions (defaults to `suggest.limit`).
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum similarity, exclusive (defaults to `suggest.min_similarity`).
        #[arg(long)]
        min_similarity: Option<f64>,

        /// Skip nodes that are already neighbors.
        #[arg(long)]
        exclude_connected: bool,
    },
}

// ============================================================================
// Config commands
// ============================================================================

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to the resolved config path).
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
