//! Command dispatch: loads settings, runs the engine, prints traces

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::application::{
    build_graph, parse_script, run_operation, run_script, EdgeSpecParser,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, GraphCommands};
use crate::cli::error::CliResult;
use crate::cli::{output, render};
use crate::config::{self, OutputFormat, OutputSettings, Settings};
use crate::report::Operation;
use crate::tree::{BalancePolicy, HeightBalanced, SearchTree, TreeKind, Unbalanced};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = effective_settings(cli)?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Commands::Tree { kind, script } => {
            _tree(kind.unwrap_or(settings.tree.kind), script, &settings.output)
        }
        Commands::Graph {
            nodes,
            edges,
            algorithm,
        } => _graph(nodes, edges, *algorithm, &settings.output),
        Commands::Config { command } => _config(command, cli, &settings),
        Commands::Completion { shell } => _completion(*shell),
    }
}

/// Config layers, then command line flags on top.
fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        settings.output.format = format;
    }
    settings.output.show_snapshots |= cli.snapshots;
    settings.output.report |= cli.report;
    Ok(settings)
}

/// Runs a tree script and formats the traces.
pub fn tree_output(kind: TreeKind, script: &str, settings: &OutputSettings) -> CliResult<String> {
    let commands = parse_script(script)?;
    match kind {
        TreeKind::Bst => run_tree::<Unbalanced>(&commands, settings),
        TreeKind::Avl => run_tree::<HeightBalanced>(&commands, settings),
    }
}

fn run_tree<P: BalancePolicy>(
    commands: &[crate::application::TreeCommand],
    settings: &OutputSettings,
) -> CliResult<String> {
    let mut tree = SearchTree::<P>::new();
    let traces = run_script(&mut tree, commands);
    info!(tree = P::NAME, commands = traces.len(), "script finished");
    Ok(match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "tree": P::NAME,
            "commands": traces,
        }))
        .map_err(crate::application::ApplicationError::from)?,
        OutputFormat::Text => render::tree_traces(P::NAME, &traces, settings),
    })
}

/// Builds the graph from the arguments, runs `algorithm` and formats the run.
pub fn graph_output(
    nodes: &[i64],
    edges: &[String],
    algorithm: GraphCommands,
    settings: &OutputSettings,
) -> CliResult<String> {
    let edges = EdgeSpecParser::new()?.parse_all(edges)?;
    let (graph, construction) = build_graph(nodes, &edges);
    let run = run_operation(&graph, construction, Operation::from(algorithm));
    info!(operation = %run.operation, steps = run.steps.len(), "graph run finished");
    Ok(match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(&run)
            .map_err(crate::application::ApplicationError::from)?,
        OutputFormat::Text => render::graph_run(&run, settings),
    })
}

#[instrument(skip(settings))]
fn _tree(kind: TreeKind, script: &str, settings: &OutputSettings) -> CliResult<()> {
    let text = tree_output(kind, script, settings)?;
    output::info(text.trim_end());
    Ok(())
}

#[instrument(skip(settings))]
fn _graph(
    nodes: &[i64],
    edges: &[String],
    algorithm: GraphCommands,
    settings: &OutputSettings,
) -> CliResult<()> {
    if nodes.is_empty() {
        output::warning("the graph has no nodes; use --node to add some");
    }
    let text = graph_output(nodes, edges, algorithm, settings)?;
    output::info(text.trim_end());
    Ok(())
}

#[instrument(skip(cli, settings))]
fn _config(command: &ConfigCommands, cli: &Cli, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration");
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::action("Global", &format!("{} ({})", path.display(), state));
                }
                None => output::warning("no home directory, global config unavailable"),
            }
            if let Some(path) = &cli.config {
                output::action("Explicit", &config::expand_path(path).display());
            }
        }
    }
    Ok(())
}

#[instrument]
fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
