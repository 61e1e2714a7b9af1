use crate::graph::{DungeonGraph, Room};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route is empty")]
    Empty,
    #[error("route starts in room {found}, expected room {expected}")]
    WrongStart { expected: Room, found: Room },
    #[error("route ends in room {found}, expected room {expected}")]
    WrongEnd { expected: Room, found: Room },
    #[error("room {room} is out of range (dungeon has {rooms} rooms)")]
    RoomOutOfRange { room: Room, rooms: usize },
    #[error("step {step}: no edge from room {from} to room {to}")]
    MissingEdge { step: usize, from: Room, to: Room },
}

/// What walking a route actually cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteReplay {
    /// Sum of edge weights at the moment each edge was taken.
    pub cost: u64,
    pub keys_picked_up: Vec<Room>,
}

/// Walks `route` on a copy of `graph`, picking up every key as soon as its
/// room is entered, and checks that each step follows an existing edge.
pub fn replay_route(
    graph: &DungeonGraph,
    start: Room,
    end: Room,
    route: &[Room],
) -> Result<RouteReplay, RouteError> {
    let (&first, &last) = match (route.first(), route.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(RouteError::Empty),
    };
    if first != start {
        return Err(RouteError::WrongStart {
            expected: start,
            found: first,
        });
    }
    if last != end {
        return Err(RouteError::WrongEnd {
            expected: end,
            found: last,
        });
    }
    let rooms = graph.room_count();
    if let Some(&room) = route.iter().find(|&&room| room >= rooms) {
        return Err(RouteError::RoomOutOfRange { room, rooms });
    }

    let mut graph = graph.clone();
    let mut replay = RouteReplay::default();
    pick_up(&mut graph, first, &mut replay.keys_picked_up);
    for (step, pair) in route.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let weight = graph
            .weight(from, to)
            .ok_or(RouteError::MissingEdge { step, from, to })?;
        replay.cost = replay.cost.saturating_add(u64::from(weight));
        pick_up(&mut graph, to, &mut replay.keys_picked_up);
    }

    Ok(replay)
}

fn pick_up(graph: &mut DungeonGraph, room: Room, picked: &mut Vec<Room>) {
    if graph.key_at(room).is_some() && !graph.grab_key(room).is_miss() {
        picked.push(room);
    }
}
