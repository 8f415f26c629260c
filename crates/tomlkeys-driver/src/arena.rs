//! Shared storage for the nodes the driver is still working on.
//!
//! A node can be referenced from several places at once: the cursor stack,
//! the previous-key slot, and the sink once it has been emitted. The arena
//! owns the nodes; the stacks hold [`NodeId`]s and an owner count per node
//! decides when a slot is released.

use tomlkeys_tree::Key;
use tracing::trace;

use crate::Error;

/// Handle to a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) key: Key,
    owners: u32,
    /// The node has been handed to the sink at least once.
    pub(crate) emitted: bool,
}

#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store `key`; the caller holds its first owner.
    pub(crate) fn insert(&mut self, key: Key) -> Result<NodeId, Error> {
        let slot = Slot {
            key,
            owners: 1,
            emitted: false,
        };
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(slot);
                index
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| Error::memory("Out of memory while storing a key"))?;
                let index = u32::try_from(self.slots.len())
                    .map_err(|_| Error::memory("Too many keys held at once"))?;
                self.slots.push(Some(slot));
                index
            }
        };
        self.live += 1;
        trace!(id, "node stored");
        Ok(NodeId(id))
    }

    /// Add an owner to `id`.
    pub(crate) fn retain(&mut self, id: NodeId) {
        if let Some(slot) = self.slot_mut(id) {
            slot.owners += 1;
        }
    }

    /// Drop one owner of `id`, freeing the node when none remain.
    pub(crate) fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slot_mut(id) else {
            return;
        };
        slot.owners -= 1;
        if slot.owners == 0 {
            self.slots[id.0 as usize] = None;
            self.free.push(id.0);
            self.live -= 1;
            trace!(id = id.0, "node freed");
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Number of nodes not yet freed.
    pub(crate) fn live(&self) -> usize {
        self.live
    }
}
