use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub type Room = usize;
pub type Weight = u32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("invalid edge {src}->{dst}: {reason}")]
    InvalidEdge {
        src: Room,
        dst: Room,
        reason: &'static str,
    },
    #[error("room {room} is out of range (dungeon has {rooms} rooms)")]
    RoomOutOfRange { room: Room, rooms: usize },
    #[error("room {room} already holds a key")]
    DuplicateKey { room: Room },
    #[error("invalid key in room {room}: {reason}")]
    InvalidKey { room: Room, reason: &'static str },
}

/// A key lying in some room. Grabbing it lowers the weight of every edge
/// leading into one of `targets` by `reduction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Key {
    pub reduction: Weight,
    pub targets: BTreeSet<Room>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightChange {
    pub src: Room,
    pub dst: Room,
    pub before: Weight,
    pub after: Weight,
}

/// Outcome of [`DungeonGraph::grab_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPickup {
    /// The key was applied and removed. `changed` lists only the edges whose
    /// weight actually went down.
    Grabbed {
        reduction: Weight,
        changed: Vec<WeightChange>,
    },
    /// The room held no key; nothing changed.
    Missed,
}

impl KeyPickup {
    pub fn is_miss(&self) -> bool {
        matches!(self, KeyPickup::Missed)
    }
}

/// Rooms, directed weighted edges and the keys lying around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonGraph {
    // weights[src][dst]; None means there is no edge
    weights: Vec<Vec<Option<Weight>>>,
    keys: BTreeMap<Room, Key>,
    // keys already grabbed, by the room they were taken from
    used: BTreeMap<Room, Key>,
}

impl DungeonGraph {
    pub fn new(rooms: usize) -> Self {
        Self {
            weights: vec![vec![None; rooms]; rooms],
            keys: BTreeMap::new(),
            used: BTreeMap::new(),
        }
    }

    pub fn room_count(&self) -> usize {
        self.weights.len()
    }

    fn check_room(&self, room: Room) -> Result<(), GraphError> {
        if room >= self.room_count() {
            return Err(GraphError::RoomOutOfRange {
                room,
                rooms: self.room_count(),
            });
        }
        Ok(())
    }

    pub fn set_edge(&mut self, src: Room, dst: Room, weight: Weight) -> Result<(), GraphError> {
        if src >= self.room_count() || dst >= self.room_count() {
            return Err(GraphError::InvalidEdge {
                src,
                dst,
                reason: "room out of range",
            });
        }
        if src == dst {
            return Err(GraphError::InvalidEdge {
                src,
                dst,
                reason: "self loop",
            });
        }

        self.weights[src][dst] = Some(weight);
        debug!(src, dst, weight, "edge set");
        Ok(())
    }

    pub fn weight(&self, src: Room, dst: Room) -> Option<Weight> {
        self.weights.get(src).and_then(|row| row.get(dst)).copied().flatten()
    }

    pub fn has_edge(&self, src: Room, dst: Room) -> bool {
        self.weight(src, dst).is_some()
    }

    /// An edge is locked while it still costs something to go through.
    pub fn is_locked(&self, src: Room, dst: Room) -> bool {
        matches!(self.weight(src, dst), Some(w) if w > 0)
    }

    /// All edges as `(src, dst, weight)`, ordered by source then destination.
    pub fn edges(&self) -> impl Iterator<Item = (Room, Room, Weight)> + '_ {
        self.weights.iter().enumerate().flat_map(|(src, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(dst, w)| w.map(|w| (src, dst, w)))
        })
    }

    pub fn place_key(
        &mut self,
        room: Room,
        reduction: Weight,
        targets: impl IntoIterator<Item = Room>,
    ) -> Result<(), GraphError> {
        self.check_room(room)?;
        if self.keys.contains_key(&room) || self.used.contains_key(&room) {
            return Err(GraphError::DuplicateKey { room });
        }
        if reduction == 0 {
            return Err(GraphError::InvalidKey {
                room,
                reason: "reduction must be positive",
            });
        }

        let targets: BTreeSet<Room> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(GraphError::InvalidKey {
                room,
                reason: "no target rooms",
            });
        }
        for &target in &targets {
            self.check_room(target)?;
        }

        debug!(room, reduction, ?targets, "key placed");
        self.keys.insert(room, Key { reduction, targets });
        Ok(())
    }

    pub fn key_at(&self, room: Room) -> Option<&Key> {
        self.keys.get(&room)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = (Room, &Key)> + '_ {
        self.keys.iter().map(|(&room, key)| (room, key))
    }

    /// Rooms holding a key that lowers the cost of entering `room`.
    pub fn keys_unlocking(&self, room: Room) -> BTreeSet<Room> {
        self.keys
            .iter()
            .filter(|(_, key)| key.targets.contains(&room))
            .map(|(&holder, _)| holder)
            .collect()
    }

    /// Whether a key for `room` has already been grabbed. Its lock counts as
    /// opened even when the reduction left some weight on it.
    pub fn has_used_key_for(&self, room: Room) -> bool {
        self.used.values().any(|key| key.targets.contains(&room))
    }

    /// Picks up the key in `room`, if any, and applies it to every edge
    /// leading into its targets. The key is gone afterwards.
    pub fn grab_key(&mut self, room: Room) -> KeyPickup {
        let Some(key) = self.keys.remove(&room) else {
            warn!(room, "tried to take a key from a room without one");
            return KeyPickup::Missed;
        };

        let mut changed = Vec::new();
        for &dst in &key.targets {
            for src in 0..self.room_count() {
                if let Some(before) = self.weights[src][dst] {
                    let after = before.saturating_sub(key.reduction);
                    if after != before {
                        self.weights[src][dst] = Some(after);
                        changed.push(WeightChange {
                            src,
                            dst,
                            before,
                            after,
                        });
                    }
                }
            }
        }

        info!(
            room,
            reduction = key.reduction,
            targets = ?key.targets,
            changed = changed.len(),
            "key grabbed"
        );
        let reduction = key.reduction;
        self.used.insert(room, key);
        KeyPickup::Grabbed { reduction, changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> DungeonGraph {
        let mut g = DungeonGraph::new(4);
        g.set_edge(0, 1, 0).unwrap();
        g.set_edge(0, 2, 3).unwrap();
        g.set_edge(1, 3, 5).unwrap();
        g.set_edge(2, 3, 2).unwrap();
        g.set_edge(3, 0, 0).unwrap();
        g
    }

    #[test]
    fn set_edge_rejects_bad_rooms() {
        let mut g = DungeonGraph::new(3);
        assert!(matches!(
            g.set_edge(0, 3, 1),
            Err(GraphError::InvalidEdge { src: 0, dst: 3, .. })
        ));
        assert!(matches!(
            g.set_edge(1, 1, 1),
            Err(GraphError::InvalidEdge { reason: "self loop", .. })
        ));
        assert_eq!(g.weight(0, 3), None);
    }

    #[test]
    fn set_edge_overwrites() {
        let mut g = diamond();
        g.set_edge(0, 2, 9).unwrap();
        assert_eq!(g.weight(0, 2), Some(9));
        assert_eq!(g.edges().count(), 5);
    }

    #[test]
    fn locked_means_positive_weight() {
        let g = diamond();
        assert!(!g.is_locked(0, 1));
        assert!(g.is_locked(0, 2));
        assert!(!g.is_locked(1, 0));
        assert!(!g.has_edge(1, 0));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut g = diamond();
        g.place_key(1, 2, [3]).unwrap();
        assert_eq!(g.place_key(1, 4, [2]), Err(GraphError::DuplicateKey { room: 1 }));
        assert_eq!(g.key_at(1).map(|k| k.reduction), Some(2));
    }

    #[test]
    fn place_key_validates_input() {
        let mut g = diamond();
        assert!(matches!(
            g.place_key(1, 0, [3]),
            Err(GraphError::InvalidKey { room: 1, .. })
        ));
        assert!(matches!(
            g.place_key(1, 2, Vec::<Room>::new()),
            Err(GraphError::InvalidKey { room: 1, .. })
        ));
        assert_eq!(
            g.place_key(1, 2, [7]),
            Err(GraphError::RoomOutOfRange { room: 7, rooms: 4 })
        );
        assert_eq!(g.key_count(), 0);
    }

    #[test]
    fn keys_unlocking_lists_holders_in_order() {
        let mut g = diamond();
        g.place_key(2, 1, [3]).unwrap();
        g.place_key(0, 1, [1, 3]).unwrap();
        g.place_key(1, 1, [2]).unwrap();
        assert_eq!(g.keys_unlocking(3).into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(g.keys_unlocking(0).is_empty());
    }

    #[test]
    fn grab_key_reduces_incoming_edges_and_consumes_key() {
        let mut g = diamond();
        g.place_key(1, 3, [3]).unwrap();

        let pickup = g.grab_key(1);
        assert_eq!(
            pickup,
            KeyPickup::Grabbed {
                reduction: 3,
                changed: vec![
                    WeightChange { src: 1, dst: 3, before: 5, after: 2 },
                    WeightChange { src: 2, dst: 3, before: 2, after: 0 },
                ],
            }
        );
        assert_eq!(g.weight(1, 3), Some(2));
        assert_eq!(g.weight(2, 3), Some(0));
        // unrelated edges and missing edges stay as they were
        assert_eq!(g.weight(0, 2), Some(3));
        assert_eq!(g.weight(0, 3), None);
        assert!(g.key_at(1).is_none());
        assert!(g.keys_unlocking(3).is_empty());
        assert!(g.has_used_key_for(3));
        assert!(!g.has_used_key_for(2));
        // the room cannot be restocked
        assert_eq!(g.place_key(1, 1, [2]), Err(GraphError::DuplicateKey { room: 1 }));
    }

    #[test]
    fn grab_key_on_empty_room_is_a_miss() {
        let mut g = diamond();
        let before = g.clone();
        assert!(g.grab_key(2).is_miss());
        assert_eq!(g, before);

        g.place_key(2, 1, [3]).unwrap();
        assert!(!g.grab_key(2).is_miss());
        assert!(g.grab_key(2).is_miss());
    }
}
