use crate::config::{RecomputeStrategy, SolverConfig};
use crate::floyd_warshall::PathTable;
use crate::graph::{DungeonGraph, KeyPickup, Room};
use crate::observer::{SolveObserver, TracingObserver};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unsolvable {
    #[error("room {blocker} is locked and no room holds a key for it")]
    NoKeyFor { blocker: Room },
    #[error("the key for room {blocker} lies in room {key_room}, which is already waiting on another key")]
    KeyCycle { blocker: Room, key_room: Room },
    #[error("gave up after {limit} iterations")]
    IterationLimit { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("room {room} is out of range (dungeon has {rooms} rooms)")]
    RoomOutOfRange { room: Room, rooms: usize },
    #[error("no path from room {from} to room {to}")]
    NoPathExists { from: Room, to: Room },
    #[error("dungeon cannot be solved: {0}")]
    Unsolvable(#[from] Unsolvable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Every room visited, start and end included.
    pub path: Vec<Room>,
    /// Rooms whose key was picked up, in pickup order.
    pub keys_grabbed: Vec<Room>,
    /// How many times the route had to turn away to fetch a key.
    pub detours: usize,
    pub legs: usize,
}

/// Walks `candidate` and returns the first room whose entry edge is locked
/// while no key for it has been grabbed and no room holding one appears in
/// `visited` or earlier in `candidate`.
pub fn find_blocker(graph: &DungeonGraph, visited: &[Room], candidate: &[Room]) -> Option<Room> {
    let first = *candidate.first()?;
    let mut walked = vec![first];

    for step in candidate.windows(2) {
        let (from, to) = (step[0], step[1]);
        if graph.is_locked(from, to) && !graph.has_used_key_for(to) {
            let has_key = graph
                .keys_unlocking(to)
                .iter()
                .any(|holder| visited.contains(holder) || walked.contains(holder));
            if !has_key {
                return Some(to);
            }
        }
        walked.push(to);
    }
    None
}

/// Finds a route through a dungeon, fetching keys for locked rooms on the
/// way. Holds the graph mutably since every key picked up changes weights.
pub struct Resolver<'g, O = TracingObserver> {
    graph: &'g mut DungeonGraph,
    config: SolverConfig,
    observer: O,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g mut DungeonGraph) -> Self {
        Self {
            graph,
            config: SolverConfig::default(),
            observer: TracingObserver,
        }
    }
}

impl<'g, O: SolveObserver> Resolver<'g, O> {
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer<P: SolveObserver>(self, observer: P) -> Resolver<'g, P> {
        Resolver {
            graph: self.graph,
            config: self.config,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn solve(&mut self, start: Room, end: Room) -> Result<Solution, SolveError> {
        let rooms = self.graph.room_count();
        for room in [start, end] {
            if room >= rooms {
                return Err(SolveError::RoomOutOfRange { room, rooms });
            }
        }

        let limit = self.config.iteration_limit(self.graph);
        let mut table = PathTable::compute_with(self.graph, &mut self.observer);
        let mut pending = vec![end];
        // key rooms asked for but not reached yet
        let mut pursued = BTreeSet::new();
        let mut current = start;
        let mut solution = Solution::default();
        let mut iterations = 0;

        while let Some(target) = pending.pop() {
            if iterations == limit {
                return Err(Unsolvable::IterationLimit { limit }.into());
            }
            iterations += 1;

            let candidate = table
                .reconstruct_path(current, target)
                .ok_or(SolveError::NoPathExists {
                    from: current,
                    to: target,
                })?;

            if let Some(blocker) = find_blocker(self.graph, &solution.path, &candidate) {
                // come back for the target once the key is in hand
                pending.push(target);
                let key_room = self.graph.keys_unlocking(blocker).into_iter().next();
                self.observer.blocker_found(current, blocker, key_room);

                let Some(key_room) = key_room else {
                    return Err(Unsolvable::NoKeyFor { blocker }.into());
                };
                if !pursued.insert(key_room) {
                    return Err(Unsolvable::KeyCycle { blocker, key_room }.into());
                }
                debug!(blocker, key_room, pending = ?pending, "detouring for key");
                pending.push(key_room);
                solution.detours += 1;
                continue;
            }

            let leg = if solution.path.last() == candidate.first() {
                &candidate[1..]
            } else {
                &candidate[..]
            };
            solution.path.extend_from_slice(leg);
            solution.legs += 1;
            self.observer.leg_appended(current, target, &candidate);

            current = target;
            pursued.remove(&current);
            if self.graph.key_at(current).is_none() {
                continue;
            }
            let pickup = self.graph.grab_key(current);
            self.observer.key_grabbed(current, &pickup);
            if let KeyPickup::Grabbed { changed, .. } = &pickup {
                solution.keys_grabbed.push(current);
                match self.config.recompute {
                    RecomputeStrategy::Full => {
                        table = PathTable::compute_with(self.graph, &mut self.observer)
                    }
                    RecomputeStrategy::Incremental => {
                        table.apply_decreases(changed, &mut self.observer)
                    }
                }
            }
        }

        info!(
            rooms = solution.path.len(),
            keys = solution.keys_grabbed.len(),
            detours = solution.detours,
            iterations,
            "dungeon solved"
        );
        Ok(solution)
    }
}

/// Solves with default settings and `tracing` output.
pub fn solve(graph: &mut DungeonGraph, start: Room, end: Room) -> Result<Solution, SolveError> {
    Resolver::new(graph).solve(start, end)
}
