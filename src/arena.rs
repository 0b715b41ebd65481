//! Sprite storage with stable handles.
//!
//! Sprites live in a dense slot vector. A [`SpriteHandle`] names a slot plus
//! the generation it was issued for, so a handle to a removed sprite never
//! resolves to whatever reuses the slot. Every insertion also gets a
//! monotonically increasing sequence number, the compositor's tie-break for
//! sprites at equal priority.

use crate::animator::{SpriteEvent, SpriteInstance};
use std::fmt;

/// Opaque reference to a sprite in a [`SpriteArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    index: u32,
    generation: u32,
}

impl fmt::Display for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sprite({}v{})", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    sequence: u64,
    sprite: SpriteInstance,
}

#[derive(Debug, Clone, Default)]
pub struct SpriteArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_sequence: u64,
    len: usize,
}

impl SpriteArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite: SpriteInstance) -> SpriteHandle {
        let entry = Entry {
            sequence: self.next_sequence,
            sprite,
        };
        self.next_sequence += 1;
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return SpriteHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        SpriteHandle {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, handle: SpriteHandle) -> Option<SpriteInstance> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(entry.sprite)
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&SpriteInstance> {
        self.entry(handle).map(|e| &e.sprite)
    }

    pub fn get_mut(&mut self, handle: SpriteHandle) -> Option<&mut SpriteInstance> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut().map(|e| &mut e.sprite)
    }

    /// Insertion sequence of a live sprite.
    pub fn sequence(&self, handle: SpriteHandle) -> Option<u64> {
        self.entry(handle).map(|e| e.sequence)
    }

    pub fn contains(&self, handle: SpriteHandle) -> bool {
        self.entry(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live sprites in slot order, with their insertion sequence.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteHandle, u64, &SpriteInstance)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|e| {
                (
                    SpriteHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    e.sequence,
                    &e.sprite,
                )
            })
        })
    }

    /// Update every sprite by `dt_ms`, collecting events by handle.
    pub fn update_all(&mut self, dt_ms: f64, events: &mut Vec<(SpriteHandle, SpriteEvent)>) {
        let mut scratch = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            entry.sprite.update(dt_ms, &mut scratch);
            let handle = SpriteHandle {
                index: index as u32,
                generation: slot.generation,
            };
            events.extend(scratch.drain(..).map(|event| (handle, event)));
        }
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    fn entry(&self, handle: SpriteHandle) -> Option<&Entry> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }
}
