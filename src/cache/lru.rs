//! Recency List Module
//!
//! Arena-backed doubly linked list ordering entries by recency of use.

use std::ops::Index;

use crate::cache::Entry;

// == Recency List ==
/// Doubly linked list of entries stored in an arena of slots.
///
/// Links are slot indices rather than references, so removing a node can
/// never leave a dangling link. Freed slots are recycled through `free`.
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct RecencyList<K, V> {
    /// Slot arena; `None` marks a free slot
    slots: Vec<Option<Entry<K, V>>>,
    /// Indices of free slots available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `entry` in a slot and links it at the head.
    ///
    /// Returns the slot handle, which stays valid until the entry is removed.
    pub fn push_front(&mut self, entry: Entry<K, V>) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Relocates an occupied slot to the head without touching its contents.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || self.get(idx).is_none() {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks the entry in `idx` and frees the slot.
    ///
    /// Returns None if the slot is already free.
    pub fn remove(&mut self, idx: usize) -> Option<Entry<K, V>> {
        self.get(idx)?;
        self.unlink(idx);
        let mut entry = self.slots[idx].take()?;
        entry.prev = None;
        entry.next = None;
        self.free.push(idx);
        self.len -= 1;
        Some(entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<Entry<K, V>> {
        self.remove(self.tail?)
    }

    /// Returns the entry in `idx`, if the slot is occupied.
    pub fn get(&self, idx: usize) -> Option<&Entry<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Slot handle of the most recently used entry.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Slot handle of the least recently used entry.
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry and releases all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates from most recently used to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Detaches `idx` from its neighbours, patching head/tail as needed.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.get(idx) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(p) => self.link_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.link_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let entry = self.link_mut(idx);
        entry.prev = None;
        entry.next = None;
    }

    /// Links a detached, occupied slot in front of the current head.
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let entry = self.link_mut(idx);
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(h) => self.link_mut(h).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Mutable access to an occupied slot reached through a list link.
    fn link_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        match self.slots[idx].as_mut() {
            Some(entry) => entry,
            None => unreachable!("recency list link points at free slot {idx}"),
        }
    }
}

impl<K, V> Index<usize> for RecencyList<K, V> {
    type Output = Entry<K, V>;

    /// Panics if `idx` is not an occupied slot.
    fn index(&self, idx: usize) -> &Self::Output {
        match self.get(idx) {
            Some(entry) => entry,
            None => panic!("no entry in recency list slot {idx}"),
        }
    }
}

// == Iterator ==
/// Head-to-tail iterator over a [`RecencyList`].
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
