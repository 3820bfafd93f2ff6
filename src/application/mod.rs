//! Application layer: turns user input into engine calls
//!
//! Parses tree scripts and graph specs, runs them against the engine and
//! collects the resulting traces. No terminal output happens here.

pub mod error;
pub mod graph_spec;
pub mod script;

pub use error::{ApplicationError, ApplicationResult};
pub use graph_spec::{build_graph, run_operation, EdgeSpec, EdgeSpecParser, GraphRun};
pub use script::{parse_script, run_script, CommandTrace, TreeCommand};
