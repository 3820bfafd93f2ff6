//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::report::Operation;
use crate::tree::TreeKind;

/// Step-by-step traces of search tree and graph algorithms
#[derive(Parser, Debug)]
#[command(name = "algotrace")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(long, global = true, env = "ALGOTRACE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Render the tree or matrix after every step
    #[arg(short, long, global = true)]
    pub snapshots: bool,

    /// Print a summary report after graph runs
    #[arg(short, long, global = true)]
    pub report: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a tree script, e.g. "insert 50 30 70; delete 30; inorder"
    Tree {
        /// Tree flavour (overrides config)
        #[arg(short, long, value_enum)]
        kind: Option<TreeKind>,
        /// Commands separated by ';': insert V.., search V, delete V, inorder, height, leaves, clear
        script: String,
    },

    /// Build a weighted undirected graph and run an algorithm on it
    Graph {
        /// Node ids, repeatable or comma separated
        #[arg(short, long = "node", value_delimiter = ',', allow_hyphen_values = true)]
        nodes: Vec<i64>,
        /// Edges as SOURCE-TARGET:WEIGHT, e.g. 1-2:5
        #[arg(short, long = "edge", allow_hyphen_values = true)]
        edges: Vec<String>,
        #[command(subcommand)]
        algorithm: GraphCommands,
    },

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

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum GraphCommands {
    /// Only trace the construction of the graph
    Build,
    /// Breadth-first traversal
    Bfs {
        #[arg(allow_negative_numbers = true)]
        start: i64,
    },
    /// Depth-first traversal
    Dfs {
        #[arg(allow_negative_numbers = true)]
        start: i64,
    },
    /// Shortest path between two nodes
    Dijkstra {
        #[arg(allow_negative_numbers = true)]
        start: i64,
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },
    /// All-pairs shortest distances
    Floyd,
    /// Minimum spanning tree
    Kruskal,
}

impl From<GraphCommands> for Operation {
    fn from(command: GraphCommands) -> Self {
        match command {
            GraphCommands::Build => Operation::Build,
            GraphCommands::Bfs { start } => Operation::Bfs { start },
            GraphCommands::Dfs { start } => Operation::Dfs { start },
            GraphCommands::Dijkstra { start, end } => Operation::Dijkstra { start, end },
            GraphCommands::Floyd => Operation::FloydWarshall,
            GraphCommands::Kruskal => Operation::Kruskal,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
