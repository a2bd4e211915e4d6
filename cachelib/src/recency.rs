/// A fixed-length list of slots ordered by recency, position 0 being the most recently used
///
/// Slots live in an arena and never move, a doubly linked list over the arena holds the order.
/// This keeps slot handles ([`Way`]) stable across reorders, and moving a slot to either end is
/// O(1). Positional lookups walk the list, which is fine for the associativities simulated here
#[derive(Debug, Clone)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    head: usize,
    tail: usize,
}

/// A stable handle to a slot of a [`RecencyList`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Way(usize);

#[derive(Debug, Clone)]
struct Slot<T> {
    entry: T,
    prev: usize,
    next: usize,
}

const NIL: usize = usize::MAX;

impl<T: Default> RecencyList<T> {
    /// Creates a list of `len` default entries. `len` must be at least 1
    pub fn new(len: usize) -> Self {
        debug_assert!(len > 0);
        let slots = (0..len)
            .map(|i| Slot {
                entry: T::default(),
                prev: if i == 0 { NIL } else { i - 1 },
                next: if i + 1 == len { NIL } else { i + 1 },
            })
            .collect();
        Self {
            slots,
            head: 0,
            tail: len - 1,
        }
    }
}

impl<T> RecencyList<T> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The first position
    pub fn front(&self) -> Way {
        Way(self.head)
    }

    /// The last position
    pub fn back(&self) -> Way {
        Way(self.tail)
    }

    /// The slot at a position, walking from the front
    pub fn at(&self, position: usize) -> Option<Way> {
        self.iter().nth(position).map(|(way, _)| way)
    }

    /// Iterates over the slots from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// The first slot, in recency order, whose entry matches
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Way> {
        self.iter().find(|(_, entry)| predicate(entry)).map(|(way, _)| way)
    }

    pub fn get(&self, way: Way) -> &T {
        &self.slots[way.0].entry
    }

    pub fn get_mut(&mut self, way: Way) -> &mut T {
        &mut self.slots[way.0].entry
    }

    /// Overwrites a slot, handing back the previous occupant
    pub fn replace(&mut self, way: Way, entry: T) -> T {
        std::mem::replace(&mut self.slots[way.0].entry, entry)
    }

    pub fn move_to_front(&mut self, way: Way) {
        if way.0 == self.head {
            return;
        }
        self.unlink(way.0);
        let old_head = self.head;
        self.slots[way.0].prev = NIL;
        self.slots[way.0].next = old_head;
        self.slots[old_head].prev = way.0;
        self.head = way.0;
    }

    pub fn move_to_back(&mut self, way: Way) {
        if way.0 == self.tail {
            return;
        }
        self.unlink(way.0);
        let old_tail = self.tail;
        self.slots[way.0].next = NIL;
        self.slots[way.0].prev = old_tail;
        self.slots[old_tail].next = way.0;
        self.tail = way.0;
    }

    // Detaches a slot which isn't alone in the list, its own links are left stale
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Way, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let slot = &self.list.slots[self.current];
        let item = (Way(self.current), &slot.entry);
        self.current = slot.next;
        Some(item)
    }
}
