//! Instrumented search trees and graph algorithms.
//!
//! Every operation returns the ordered list of [`domain::Step`]s it took: an
//! explanation, a reference line number and a snapshot of the structure at
//! that moment. Frontends replay the steps; the engine never prints.

pub mod algorithms;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod graph;
pub mod report;
pub mod tree;
pub mod tree_traits;
pub mod util;
