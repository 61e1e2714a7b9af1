use crate::graph::{DungeonGraph, Room, Weight, WeightChange};
use crate::observer::{NoopObserver, SolveObserver};
use serde::Serialize;
use std::fmt;
use std::ops::Add;
use tracing::debug;

/// Length of a shortest path. `Unreachable` orders after every finite value
/// and swallows anything added to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Distance {
    Finite(u64),
    Unreachable,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0);

    pub fn is_reachable(self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        match (self, rhs) {
            (Distance::Finite(a), Distance::Finite(b)) => Distance::Finite(a.saturating_add(b)),
            _ => Distance::Unreachable,
        }
    }
}

impl From<Weight> for Distance {
    fn from(weight: Weight) -> Self {
        Distance::Finite(u64::from(weight))
    }
}

impl From<Option<Weight>> for Distance {
    fn from(weight: Option<Weight>) -> Self {
        weight.map_or(Distance::Unreachable, Distance::from)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => write!(f, "∞"),
        }
    }
}

/// All-pairs shortest distances plus the first hop of each shortest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    dist: Vec<Vec<Distance>>,
    next: Vec<Vec<Option<Room>>>,
}

impl PathTable {
    pub fn compute(graph: &DungeonGraph) -> Self {
        Self::compute_with(graph, &mut NoopObserver)
    }

    pub fn compute_with<O: SolveObserver>(graph: &DungeonGraph, observer: &mut O) -> Self {
        let n = graph.room_count();
        let mut dist = vec![vec![Distance::Unreachable; n]; n];
        let mut next = vec![vec![None; n]; n];

        for i in 0..n {
            dist[i][i] = Distance::ZERO;
        }
        for (src, dst, weight) in graph.edges() {
            dist[src][dst] = Distance::from(weight);
            next[src][dst] = Some(dst);
        }

        for k in 0..n {
            for i in 0..n {
                let via = dist[i][k];
                if !via.is_reachable() {
                    continue;
                }
                for j in 0..n {
                    let candidate = via + dist[k][j];
                    if candidate < dist[i][j] {
                        dist[i][j] = candidate;
                        next[i][j] = next[i][k];
                        observer.edge_relaxed(i, j, k, candidate);
                    }
                }
            }
        }

        debug!(rooms = n, "shortest path table built");
        Self { dist, next }
    }

    pub fn room_count(&self) -> usize {
        self.dist.len()
    }

    pub fn distance(&self, from: Room, to: Room) -> Distance {
        self.dist
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(Distance::Unreachable)
    }

    pub fn next_hop(&self, from: Room, to: Room) -> Option<Room> {
        self.next.get(from).and_then(|row| row.get(to)).copied().flatten()
    }

    /// Rooms of a shortest `from -> to` path, both ends included.
    pub fn reconstruct_path(&self, from: Room, to: Room) -> Option<Vec<Room>> {
        let n = self.room_count();
        if from >= n || to >= n {
            return None;
        }

        let mut path = vec![from];
        let mut current = from;
        while current != to {
            current = self.next[current][to]?;
            path.push(current);
            if path.len() > n {
                // next hops are only ever built from simple paths
                return None;
            }
        }
        Some(path)
    }

    /// Brings the table up to date after the given edges got cheaper,
    /// without running the whole cubic pass again.
    pub fn apply_decreases<O: SolveObserver>(&mut self, changes: &[WeightChange], observer: &mut O) {
        let n = self.room_count();
        for change in changes {
            if change.after >= change.before {
                continue;
            }
            let (u, v) = (change.src, change.dst);
            let weight = Distance::from(change.after);

            for i in 0..n {
                let to_u = self.dist[i][u];
                if !to_u.is_reachable() {
                    continue;
                }
                for j in 0..n {
                    let candidate = to_u + weight + self.dist[v][j];
                    if candidate < self.dist[i][j] {
                        self.dist[i][j] = candidate;
                        self.next[i][j] = if i == u { Some(v) } else { self.next[i][u] };
                        observer.edge_relaxed(i, j, u, candidate);
                    }
                }
            }
        }
        debug!(changes = changes.len(), "shortest path table patched");
    }
}
