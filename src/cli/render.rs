//! Text rendering of step traces

use std::fmt::Write;

use colored::Colorize;
use itertools::Itertools;

use crate::application::{CommandTrace, GraphRun};
use crate::config::OutputSettings;
use crate::domain::{GraphFrame, Step};
use crate::tree_traits::TreeNodeConvert;

fn step_line<F>(number: usize, step: &Step<F>, show_code_lines: bool) -> String {
    let counter = format!("{:>3}.", number).dimmed();
    match step.code_line.filter(|_| show_code_lines) {
        Some(line) => format!("{} {} {}", counter, format!("[L{:>2}]", line).blue(), step.explanation),
        None => format!("{} {}", counter, step.explanation),
    }
}

fn indent(block: &str, by: &str) -> String {
    block.lines().map(|l| format!("{}{}", by, l)).join("\n")
}

/// One section per script command, steps numbered per command.
pub fn tree_traces(tree_name: &str, traces: &[CommandTrace], settings: &OutputSettings) -> String {
    let mut out = String::new();
    for trace in traces {
        let _ = writeln!(out, "{}", format!("{} > {}", tree_name, trace.command).cyan().bold());
        for (i, step) in trace.steps.iter().enumerate() {
            let _ = writeln!(out, "{}", step_line(i + 1, step, settings.show_code_lines));
            if settings.show_snapshots {
                let _ = writeln!(out, "{}", indent(&step.frame.to_tree_string().to_string(), "      "));
            }
        }
        if let Some(final_tree) = trace.steps.last().map(|s| &s.frame.tree) {
            if !settings.show_snapshots {
                let _ = writeln!(out, "{}", indent(&final_tree.to_tree_string().to_string(), "    "));
            }
        }
    }
    out
}

/// Matrix with node ids as row and column headers; `cell` is starred.
pub fn matrix_table(frame: &GraphFrame) -> Option<String> {
    let matrix = frame.matrix.as_ref()?;
    let cell = frame.highlighted_cell;
    let mut out = String::new();
    let header = frame.nodes.iter().map(|n| format!("{:>5}", n.id)).join("");
    let _ = writeln!(out, "{:>5}{}", "", header);
    for (row, node) in frame.nodes.iter().enumerate() {
        let cells = (0..frame.nodes.len())
            .map(|col| {
                let value = matrix.get(row, col).to_string();
                match cell {
                    Some(c) if c.row == row && c.col == col => format!("{:>5}", format!("*{}", value)),
                    _ => format!("{:>5}", value),
                }
            })
            .join("");
        let _ = writeln!(out, "{:>5}{}", node.id, cells);
    }
    Some(out)
}

fn frame_details(frame: &GraphFrame) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(distances) = &frame.distances {
        lines.push(format!(
            "distances: {}",
            distances.iter().map(|(id, d)| format!("{}={}", id, d)).join(", ")
        ));
    }
    if !frame.visited.is_empty() {
        lines.push(format!("visited: {}", frame.visited.iter().join(", ")));
    }
    if !frame.queue.is_empty() {
        lines.push(format!("queue: {}", frame.queue.iter().join(", ")));
    }
    if !frame.traversal.is_empty() {
        lines.push(format!("order: {}", frame.traversal.iter().join(" → ")));
    }
    if !frame.mst_edges.is_empty() {
        lines.push(format!("mst: {}", frame.mst_edges.iter().join(", ")));
    }
    if !frame.highlighted_path.is_empty() {
        lines.push(format!("path: {}", frame.highlighted_path.iter().join(" → ")));
    }
    lines
}

/// Numbered graph steps, optionally followed by the summary report.
pub fn graph_run(run: &GraphRun, settings: &OutputSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", run.operation.to_string().cyan().bold());
    for (i, step) in run.steps.iter().enumerate() {
        let _ = writeln!(out, "{}", step_line(i + 1, step, settings.show_code_lines));
        if settings.show_snapshots {
            for line in frame_details(&step.frame) {
                let _ = writeln!(out, "      {}", line.dimmed());
            }
            if let Some(table) = matrix_table(&step.frame) {
                let _ = writeln!(out, "{}", indent(&table, "      "));
            }
        }
    }
    if settings.report {
        let _ = writeln!(out);
        let _ = write!(out, "{}", run.report);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{build_graph, parse_script, run_operation, run_script};
    use crate::report::Operation;
    use crate::tree::BinarySearchTree;

    fn plain() -> OutputSettings {
        colored::control::set_override(false);
        OutputSettings::default()
    }

    #[test]
    fn given_tree_traces_when_rendering_then_steps_are_numbered_with_lines() {
        let settings = plain();
        let mut tree = BinarySearchTree::new();
        let traces = run_script(&mut tree, &parse_script("insert 5").unwrap());
        let text = tree_traces("BST", &traces, &settings);
        assert!(text.contains("BST > insert 5"));
        assert!(text.contains("  1. [L 5] Starting insertion of value 5."));
    }

    #[test]
    fn given_code_lines_disabled_when_rendering_then_no_line_tags() {
        let settings = OutputSettings {
            show_code_lines: false,
            ..plain()
        };
        let mut tree = BinarySearchTree::new();
        let traces = run_script(&mut tree, &parse_script("insert 5").unwrap());
        assert!(!tree_traces("BST", &traces, &settings).contains("[L"));
    }

    #[test]
    fn given_frame_with_cell_when_rendering_matrix_then_cell_is_starred() {
        let _ = plain();
        let (graph, steps) = build_graph(
            &[1, 2],
            &[crate::application::EdgeSpec {
                source: 1,
                target: 2,
                weight: 7,
            }],
        );
        let with_cell = steps
            .iter()
            .find(|s| s.frame.highlighted_cell.is_some())
            .unwrap();
        let table = matrix_table(&with_cell.frame).unwrap();
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains('*'));

        let run = run_operation(&graph, steps, Operation::Kruskal);
        assert!(matrix_table(run.steps.last().map(|s| &s.frame).unwrap()).is_none());
    }

    #[test]
    fn given_report_enabled_when_rendering_graph_then_report_is_appended() {
        let settings = OutputSettings {
            report: true,
            ..plain()
        };
        let (graph, steps) = build_graph(&[1], &[]);
        let run = run_operation(&graph, steps, Operation::Bfs { start: 1 });
        let text = graph_run(&run, &settings);
        assert!(text.contains("Traversal order: 1"));
    }
}
