pub mod config;
pub mod floyd_warshall;
pub mod graph;
pub mod loader;
pub mod observer;
pub mod render;
pub mod resolver;
pub mod route;

mod random_test;

pub use config::{RecomputeStrategy, SolverConfig};
pub use floyd_warshall::{Distance, PathTable};
pub use graph::{DungeonGraph, GraphError, Key, KeyPickup, Room, Weight};
pub use loader::{Dungeon, LoadError};
pub use resolver::{solve, Resolver, Solution, SolveError, Unsolvable};
pub use route::{replay_route, RouteError, RouteReplay};
