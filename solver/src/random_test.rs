#[cfg(test)]
mod random_tests {
    use crate::config::{RecomputeStrategy, SolverConfig};
    use crate::floyd_warshall::{Distance, PathTable};
    use crate::graph::{DungeonGraph, KeyPickup, Room};
    use crate::observer::NoopObserver;
    use crate::resolver::{Resolver, SolveError, Unsolvable};
    use crate::route::replay_route;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ROUNDS: u64 = 200;

    fn random_dungeon(rng: &mut StdRng) -> DungeonGraph {
        let n = rng.gen_range(1..=9);
        let mut graph = DungeonGraph::new(n);
        for src in 0..n {
            for dst in 0..n {
                if src != dst && rng.gen_bool(0.35) {
                    let weight = if rng.gen_bool(0.6) { 0 } else { rng.gen_range(1..10) };
                    graph.set_edge(src, dst, weight).unwrap();
                }
            }
        }
        for room in 0..n {
            if rng.gen_bool(0.3) {
                let targets: Vec<Room> = (0..n).filter(|_| rng.gen_bool(0.3)).collect();
                if !targets.is_empty() {
                    graph.place_key(room, rng.gen_range(1..10), targets).unwrap();
                }
            }
        }
        graph
    }

    fn path_cost(graph: &DungeonGraph, path: &[Room]) -> u64 {
        path.windows(2)
            .map(|w| u64::from(graph.weight(w[0], w[1]).unwrap()))
            .sum()
    }

    #[test]
    fn shortest_paths_are_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..ROUNDS {
            let graph = random_dungeon(&mut rng);
            let table = PathTable::compute(&graph);
            let n = graph.room_count();

            for i in 0..n {
                assert_eq!(table.distance(i, i), Distance::ZERO);
                for j in 0..n {
                    for k in 0..n {
                        assert!(table.distance(i, j) <= table.distance(i, k) + table.distance(k, j));
                    }

                    match (table.distance(i, j), table.reconstruct_path(i, j)) {
                        (Distance::Finite(d), Some(path)) => {
                            assert_eq!(path.first(), Some(&i));
                            assert_eq!(path.last(), Some(&j));
                            assert_eq!(path_cost(&graph, &path), d, "{:?}", path);
                        }
                        (Distance::Unreachable, None) => {}
                        (d, path) => panic!("{} -> {}: distance {} but path {:?}", i, j, d, path),
                    }
                }
            }
        }
    }

    #[test]
    fn patched_table_matches_rebuild() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..ROUNDS {
            let mut graph = random_dungeon(&mut rng);
            let mut table = PathTable::compute(&graph);
            let holders: Vec<Room> = graph.keys().map(|(room, _)| room).collect();

            for room in holders {
                if let KeyPickup::Grabbed { changed, .. } = graph.grab_key(room) {
                    table.apply_decreases(&changed, &mut NoopObserver);
                }
                let rebuilt = PathTable::compute(&graph);
                let n = graph.room_count();
                for i in 0..n {
                    for j in 0..n {
                        assert_eq!(table.distance(i, j), rebuilt.distance(i, j));
                    }
                }
            }
        }
    }

    #[test]
    fn grabbing_keys_never_raises_weights() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..ROUNDS {
            let mut graph = random_dungeon(&mut rng);
            let n = graph.room_count();
            let room = rng.gen_range(0..n);
            let before = graph.clone();
            let had_key = graph.key_at(room).is_some();

            let pickup = graph.grab_key(room);
            assert_eq!(pickup.is_miss(), !had_key);
            if pickup.is_miss() {
                assert_eq!(graph, before);
            }
            for (src, dst, weight) in before.edges() {
                assert!(graph.weight(src, dst).unwrap() <= weight);
            }
            assert!(graph.key_at(room).is_none());
        }
    }

    #[test]
    fn solved_routes_replay() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut solved = 0;
        for round in 0..ROUNDS {
            let original = random_dungeon(&mut rng);
            let n = original.room_count();
            let (start, end) = (rng.gen_range(0..n), rng.gen_range(0..n));
            let recompute = if round % 2 == 0 {
                RecomputeStrategy::Full
            } else {
                RecomputeStrategy::Incremental
            };

            let mut graph = original.clone();
            let result = Resolver::new(&mut graph)
                .with_observer(NoopObserver)
                .with_config(SolverConfig {
                    recompute,
                    ..SolverConfig::default()
                })
                .solve(start, end);

            match result {
                Ok(solution) => {
                    solved += 1;
                    assert_eq!(solution.path.first(), Some(&start));
                    assert_eq!(solution.path.last(), Some(&end));
                    let replay = replay_route(&original, start, end, &solution.path);
                    assert!(replay.is_ok(), "{:?}: {:?}", solution.path, replay);
                }
                Err(SolveError::RoomOutOfRange { .. }) => panic!("rooms were in range"),
                Err(SolveError::NoPathExists { from, to }) => {
                    // weights only go down, edges never disappear
                    let table = PathTable::compute(&original);
                    assert!(!table.distance(from, to).is_reachable(), "{} -> {}", from, to);
                }
                Err(SolveError::Unsolvable(Unsolvable::NoKeyFor { blocker })) => {
                    assert!(original.keys_unlocking(blocker).is_empty(), "room {}", blocker);
                }
                Err(SolveError::Unsolvable(_)) => {}
            }
        }
        assert!(solved > 0);
    }
}
