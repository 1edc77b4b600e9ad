use confab_core::{ConnectionId, Participant};
use std::collections::HashMap;

/// Result of registering a participant in a room.
#[derive(Debug)]
pub struct JoinOutcome {
    /// Members that were already in the room, in join order, without the
    /// joiner itself.
    pub existing: Vec<Participant>,
    /// The membership this join displaced, if the identifier was already
    /// registered somewhere.
    pub displaced: Option<(Participant, String)>,
}

/// Room membership, keyed by room name, members kept in join order.
///
/// Owned exclusively by the relay event loop; every mutation happens inside
/// a single handler invocation, so there is no interior locking. Rooms come
/// into existence on first join and are dropped once their last member
/// leaves.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Vec<Participant>>,
    memberships: HashMap<ConnectionId, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `participant` in `room`.
    ///
    /// A join from an identifier that is already registered replaces the old
    /// association instead of duplicating membership; the displaced entry is
    /// returned so the caller can notify its room.
    pub fn join(&mut self, room: &str, participant: Participant) -> JoinOutcome {
        let displaced = self.leave(&participant.id);

        let members = self.rooms.entry(room.to_string()).or_default();
        let existing = members.clone();
        self.memberships
            .insert(participant.id.clone(), room.to_string());
        members.push(participant);

        JoinOutcome { existing, displaced }
    }

    /// Remove whatever membership `id` holds. Unknown identifiers are a
    /// no-op signalled by `None`, never an error.
    pub fn leave(&mut self, id: &ConnectionId) -> Option<(Participant, String)> {
        let room = self.memberships.remove(id)?;
        let members = self.rooms.get_mut(&room)?;
        let idx = members.iter().position(|p| &p.id == id)?;
        let participant = members.remove(idx);

        if members.is_empty() {
            self.rooms.remove(&room);
        }

        Some((participant, room))
    }

    pub(crate) fn room_of(&self, id: &ConnectionId) -> Option<&str> {
        self.memberships.get(id).map(String::as_str)
    }

    pub(crate) fn members_of(&self, room: &str) -> &[Participant] {
        self.rooms.get(room).map(Vec::as_slice).unwrap_or(&[])
    }
}
