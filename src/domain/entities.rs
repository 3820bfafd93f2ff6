//! Domain entities: graph nodes, edges and the adjacency matrix

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Graph vertex. Its identity doubles as its display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: i64,
}

impl GraphNode {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn value(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Undirected weighted edge between two node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: i64,
    pub target: i64,
    pub weight: u64,
}

impl GraphEdge {
    pub fn new(source: i64, target: i64, weight: u64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ↔ {}, w={})", self.source, self.target, self.weight)
    }
}

/// Path length in the adjacency matrix.
///
/// `Finite` values order before `Infinite`, so the derived `Ord` is the
/// shortest-path comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u64),
    Infinite,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0);

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Infinite => None,
        }
    }

    /// Edge weight if this cell denotes an edge (finite and non-zero).
    pub fn edge_weight(&self) -> Option<u64> {
        self.finite().filter(|w| *w > 0)
    }
}

/// Saturating path sum: a total past `u64::MAX` becomes `Infinite`, so such a
/// node reads as unreachable.
impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        match (self, rhs) {
            (Distance::Finite(a), Distance::Finite(b)) => a
                .checked_add(b)
                .map(Distance::Finite)
                .unwrap_or(Distance::Infinite),
            _ => Distance::Infinite,
        }
    }
}

/// An unknown distance is unbounded.
impl Default for Distance {
    fn default() -> Self {
        Distance::Infinite
    }
}

impl From<u64> for Distance {
    fn from(value: u64) -> Self {
        Distance::Finite(value)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Infinite => write!(f, "∞"),
        }
    }
}

/// A (row, col) position in the adjacency matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub row: usize,
    pub col: usize,
}

impl MatrixCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Square distance table indexed by node position.
///
/// Positions are assigned in node creation order and never compacted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<Distance>>,
}

impl AdjacencyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Self {
        Self { rows }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Distance>] {
        &self.rows
    }

    /// Distance stored at `(row, col)`; out-of-range cells read as `Infinite`.
    pub fn get(&self, row: usize, col: usize) -> Distance {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Distance::Infinite)
    }

    pub fn set(&mut self, row: usize, col: usize, distance: Distance) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = distance;
        }
    }

    pub fn set_symmetric(&mut self, a: usize, b: usize, distance: Distance) {
        self.set(a, b, distance);
        self.set(b, a, distance);
    }

    /// Adds one row and column: `Infinite` everywhere except the new diagonal.
    pub fn grow(&mut self) -> usize {
        let new_index = self.rows.len();
        for row in &mut self.rows {
            row.push(Distance::Infinite);
        }
        let mut new_row = vec![Distance::Infinite; new_index + 1];
        new_row[new_index] = Distance::ZERO;
        self.rows.push(new_row);
        new_index
    }

    /// Positions adjacent to `row` together with the connecting weight.
    pub fn neighbors(&self, row: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|r| r.iter().enumerate())
            .filter_map(|(col, d)| d.edge_weight().map(|w| (col, w)))
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|i| (0..self.size()).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|d| format!("{:>4}", d)).collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_finite_and_infinite_when_comparing_then_finite_is_smaller() {
        assert!(Distance::Finite(u64::MAX) < Distance::Infinite);
        assert!(Distance::Finite(2) < Distance::Finite(3));
    }

    #[test]
    fn given_infinite_operand_when_adding_then_result_is_infinite() {
        assert_eq!(Distance::Finite(3) + Distance::Infinite, Distance::Infinite);
        assert_eq!(Distance::Infinite + Distance::Finite(3), Distance::Infinite);
        assert_eq!(Distance::Finite(3) + Distance::Finite(4), Distance::Finite(7));
        assert_eq!(Distance::Finite(u64::MAX) + Distance::Finite(1), Distance::Infinite);
    }

    #[test]
    fn given_matrix_when_growing_then_preserves_entries_and_sets_diagonal() {
        let mut m = AdjacencyMatrix::new();
        m.grow();
        m.grow();
        m.set_symmetric(0, 1, Distance::Finite(5));
        m.grow();

        assert_eq!(m.size(), 3);
        assert_eq!(m.get(0, 1), Distance::Finite(5));
        assert_eq!(m.get(1, 0), Distance::Finite(5));
        assert_eq!(m.get(2, 2), Distance::ZERO);
        assert_eq!(m.get(0, 2), Distance::Infinite);
        assert_eq!(m.get(2, 1), Distance::Infinite);
        assert!(m.is_symmetric());
    }

    #[test]
    fn given_out_of_range_cell_when_reading_then_returns_infinite() {
        let m = AdjacencyMatrix::new();
        assert_eq!(m.get(4, 7), Distance::Infinite);
    }

    #[test]
    fn given_row_when_listing_neighbors_then_skips_diagonal_and_missing_edges() {
        let mut m = AdjacencyMatrix::new();
        for _ in 0..3 {
            m.grow();
        }
        m.set_symmetric(0, 2, Distance::Finite(4));
        let neighbors: Vec<_> = m.neighbors(0).collect();
        assert_eq!(neighbors, vec![(2, 4)]);
    }
}
