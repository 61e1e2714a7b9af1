//! Plain text dumps of the matrices, for `--show-matrices` and debugging.

use crate::floyd_warshall::PathTable;
use crate::graph::DungeonGraph;
use std::fmt::Write;

/// Edge weights; `+` where there is no edge.
pub fn weights(graph: &DungeonGraph) -> String {
    grid(graph.room_count(), '+', |src, dst| {
        graph.weight(src, dst).map(|w| w.to_string())
    })
}

/// Row = room holding the key, column = room it unlocks, cell = reduction;
/// `-` where there is no key effect.
pub fn keys(graph: &DungeonGraph) -> String {
    grid(graph.room_count(), '-', |holder, target| {
        graph
            .key_at(holder)
            .filter(|key| key.targets.contains(&target))
            .map(|key| key.reduction.to_string())
    })
}

pub fn distances(table: &PathTable) -> String {
    grid(table.room_count(), '+', |from, to| {
        Some(table.distance(from, to).to_string())
    })
}

fn grid(n: usize, filler: char, cell: impl Fn(usize, usize) -> Option<String>) -> String {
    let cells: Vec<Vec<Option<String>>> = (0..n)
        .map(|i| (0..n).map(|j| cell(i, j)).collect())
        .collect();

    let index_width = n.saturating_sub(1).to_string().len();
    let width = cells
        .iter()
        .flatten()
        .flatten()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(index_width);
    let empty = filler.to_string().repeat(width);

    let mut out = " ".repeat(index_width + 2);
    for j in 0..n {
        let _ = write!(out, "| {:<width$} ", j);
    }
    out.push_str("|\n");

    for (i, row) in cells.iter().enumerate() {
        let _ = write!(out, "{:<w$}", i, w = index_width + 2);
        for c in row {
            let _ = write!(out, "| {:<width$} ", c.as_deref().unwrap_or(&empty));
        }
        out.push_str("|\n");
    }
    out
}
