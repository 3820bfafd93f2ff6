//! Tree scripts: `;`-separated commands such as `insert 50 30 70; delete 30; inorder`

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{TreeFrame, TreeStep};
use crate::tree::{BalancePolicy, SearchTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    Insert(Vec<i64>),
    Search(i64),
    Delete(i64),
    InOrder,
    Height,
    Leaves,
    Clear,
}

impl fmt::Display for TreeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeCommand::Insert(values) => write!(f, "insert {}", values.iter().join(" ")),
            TreeCommand::Search(v) => write!(f, "search {}", v),
            TreeCommand::Delete(v) => write!(f, "delete {}", v),
            TreeCommand::InOrder => write!(f, "inorder"),
            TreeCommand::Height => write!(f, "height"),
            TreeCommand::Leaves => write!(f, "leaves"),
            TreeCommand::Clear => write!(f, "clear"),
        }
    }
}

impl FromStr for TreeCommand {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ApplicationError::InvalidScript {
            command: s.trim().to_string(),
            reason: reason.to_string(),
        };

        let mut words = s.split_whitespace();
        let verb = words.next().ok_or_else(|| invalid("empty command"))?;
        let args: Vec<i64> = words
            .map(|w| w.parse::<i64>())
            .collect::<Result<_, _>>()
            .map_err(|e| invalid(&format!("not an integer ({})", e)))?;

        let single = |args: &[i64]| match args {
            [v] => Ok(*v),
            _ => Err(invalid("expects exactly one value")),
        };
        let none = |args: &[i64], cmd: TreeCommand| {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(invalid("takes no arguments"))
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "insert" | "i" if args.is_empty() => Err(invalid("expects at least one value")),
            "insert" | "i" => Ok(TreeCommand::Insert(args)),
            "search" | "s" => single(&args).map(TreeCommand::Search),
            "delete" | "d" => single(&args).map(TreeCommand::Delete),
            "inorder" => none(&args, TreeCommand::InOrder),
            "height" => none(&args, TreeCommand::Height),
            "leaves" => none(&args, TreeCommand::Leaves),
            "clear" => none(&args, TreeCommand::Clear),
            _ => Err(invalid("unknown command")),
        }
    }
}

/// Parses a whole script. Empty segments are ignored.
pub fn parse_script(script: &str) -> ApplicationResult<Vec<TreeCommand>> {
    script
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// The steps one script command produced.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CommandTrace {
    pub command: String,
    pub steps: Vec<TreeStep>,
}

/// Runs every command against `tree`, in order.
#[instrument(level = "debug", skip(tree, commands), fields(tree = tree.name(), commands = commands.len()))]
pub fn run_script<P: BalancePolicy>(
    tree: &mut SearchTree<P>,
    commands: &[TreeCommand],
) -> Vec<CommandTrace> {
    commands
        .iter()
        .map(|command| {
            let steps = match command {
                TreeCommand::Insert(values) => tree.insert_many(values),
                TreeCommand::Search(v) => tree.search(*v),
                TreeCommand::Delete(v) => tree.delete(*v),
                TreeCommand::InOrder => tree.in_order_traversal(),
                TreeCommand::Height => tree.height_steps(),
                TreeCommand::Leaves => tree.leaf_count_steps(),
                TreeCommand::Clear => {
                    tree.clear();
                    vec![TreeStep::new("The tree has been cleared.", None, TreeFrame::default())]
                }
            };
            debug!(%command, steps = steps.len(), "command finished");
            CommandTrace {
                command: command.to_string(),
                steps,
            }
        })
        .collect()
}
