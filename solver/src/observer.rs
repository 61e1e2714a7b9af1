use crate::floyd_warshall::Distance;
use crate::graph::{KeyPickup, Room};
use tracing::{debug, info, trace};

/// Hooks called at fixed points while tables are built and routes are
/// resolved. Every method defaults to doing nothing.
pub trait SolveObserver {
    fn edge_relaxed(&mut self, _from: Room, _to: Room, _via: Room, _distance: Distance) {}

    fn blocker_found(&mut self, _from: Room, _blocker: Room, _key_room: Option<Room>) {}

    fn key_grabbed(&mut self, _room: Room, _pickup: &KeyPickup) {}

    fn leg_appended(&mut self, _from: Room, _to: Room, _leg: &[Room]) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SolveObserver for NoopObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SolveObserver for TracingObserver {
    fn edge_relaxed(&mut self, from: Room, to: Room, via: Room, distance: Distance) {
        trace!(from, to, via, %distance, "distance improved");
    }

    fn blocker_found(&mut self, from: Room, blocker: Room, key_room: Option<Room>) {
        debug!(from, blocker, ?key_room, "route blocked");
    }

    fn key_grabbed(&mut self, room: Room, pickup: &KeyPickup) {
        match pickup {
            KeyPickup::Grabbed { changed, .. } => {
                info!(room, edges = changed.len(), "picked up key")
            }
            KeyPickup::Missed => debug!(room, "no key to pick up"),
        }
    }

    fn leg_appended(&mut self, from: Room, to: Room, leg: &[Room]) {
        debug!(from, to, ?leg, "moved");
    }
}

impl<O: SolveObserver + ?Sized> SolveObserver for &mut O {
    fn edge_relaxed(&mut self, from: Room, to: Room, via: Room, distance: Distance) {
        (**self).edge_relaxed(from, to, via, distance)
    }

    fn blocker_found(&mut self, from: Room, blocker: Room, key_room: Option<Room>) {
        (**self).blocker_found(from, blocker, key_room)
    }

    fn key_grabbed(&mut self, room: Room, pickup: &KeyPickup) {
        (**self).key_grabbed(room, pickup)
    }

    fn leg_appended(&mut self, from: Room, to: Room, leg: &[Room]) {
        (**self).leg_appended(from, to, leg)
    }
}
