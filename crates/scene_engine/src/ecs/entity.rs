//! Entity handles and the generational index allocator

use std::fmt;

/// Entity identifier
///
/// A plain, copyable key: `index` selects a slot in every component storage,
/// `generation` tells a live handle apart from stale handles to the same slot.
/// Entities own no data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// The "no entity" sentinel
    pub const NULL: Entity = Entity {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this entity
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time this handle was issued
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Whether this is [`Entity::NULL`]
    pub const fn is_null(self) -> bool {
        self.index == u32::MAX
    }

    /// Value written into integer render targets by the selection pass
    ///
    /// `-1` for the null entity, which matches the cleared background.
    pub fn pick_id(self) -> i32 {
        if self.is_null() {
            -1
        } else {
            i32::try_from(self.index).unwrap_or(-1)
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Generational index allocator
///
/// Freed indices go on a LIFO free list and come back with a bumped
/// generation. A slot whose generation would wrap is retired instead of
/// recycled so a stale handle can never alias a new entity.
#[derive(Debug, Default)]
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
    live_count: usize,
    recycled: usize,
}

impl EntityAllocator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            free: Vec::new(),
            live_count: 0,
            recycled: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        let entity = if let Some(index) = self.free.pop() {
            self.recycled += 1;
            let slot = index as usize;
            self.alive[slot] = true;
            Entity::new(index, self.generations[slot])
        } else {
            let index = u32::try_from(self.generations.len())
                .ok()
                .filter(|&i| i != u32::MAX)
                .unwrap_or_else(|| panic!("entity index space exhausted"));
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        };
        self.live_count += 1;
        entity
    }

    /// Returns false when `entity` was not alive.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index as usize;
        self.alive[slot] = false;
        self.live_count -= 1;
        if let Some(next) = self.generations[slot].checked_add(1) {
            self.generations[slot] = next;
            self.free.push(entity.index);
        } else {
            log::debug!("Retiring entity slot {} after generation wrap", entity.index);
        }
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index as usize;
        slot < self.alive.len() && self.alive[slot] && self.generations[slot] == entity.generation
    }

    /// Live entity currently occupying `index`, if any
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let slot = index as usize;
        if slot < self.alive.len() && self.alive[slot] {
            Some(Entity::new(index, self.generations[slot]))
        } else {
            None
        }
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(slot, _)| Entity::new(slot as u32, self.generations[slot]))
    }

    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    pub fn recycled(&self) -> usize {
        self.recycled
    }
}
