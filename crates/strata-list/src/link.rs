//! Circular doubly-linked lists with sentinels.
//!
//! A [`LinkPool`] owns the link storage for any number of lists. Each list
//! is represented by a sentinel slot: the sentinel's `next` is the head and
//! its `prev` is the tail. An empty list's sentinel points at itself in
//! both directions, and so does a node that is not on any list.

use crate::id::{ListId, NodeId};

enum Entry<T> {
    /// Released slot, waiting on the free list.
    Vacant,
    /// A list's sentinel.
    Sentinel,
    /// A node carrying a value.
    Node(T),
}

struct Slot<T> {
    generation: u32,
    next: u32,
    prev: u32,
    entry: Entry<T>,
}

/// Link storage for a family of circular doubly-linked lists.
///
/// Nodes are inserted unlinked, then placed on a list with
/// [`prepend`](Self::prepend) or [`append`](Self::append). A node may be on
/// at most one list at a time. Sentinels and nodes share one slot table
/// and one free list, so releasing either makes its slot reusable.
pub struct LinkPool<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
}

impl<T> LinkPool<T> {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Create an empty pool with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    fn alloc_slot(&mut self, entry: Entry<T>) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.next = idx;
            slot.prev = idx;
            slot.entry = entry;
            NodeId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                next: idx,
                prev: idx,
                entry,
            });
            NodeId::new(idx, 0)
        }
    }

    fn free_slot(&mut self, idx: u32) -> Entry<T> {
        let slot = &mut self.slots[idx as usize];
        let entry = std::mem::replace(&mut slot.entry, Entry::Vacant);
        slot.generation = slot.generation.wrapping_add(1);
        // A wrapped generation would let ids from epoch 0 resolve again,
        // so the slot is retired instead of recycled.
        if slot.generation != 0 {
            self.free_list.push(idx);
        }
        entry
    }

    /// Slot index for a live id, or `None` if the id is stale.
    fn live(&self, id: NodeId) -> Option<u32> {
        let slot = self.slots.get(id.slot as usize)?;
        if slot.generation != id.generation || matches!(slot.entry, Entry::Vacant) {
            return None;
        }
        Some(id.slot)
    }

    fn node_slot(&self, node: NodeId) -> u32 {
        match self.live(node) {
            Some(idx) if matches!(self.slots[idx as usize].entry, Entry::Node(_)) => idx,
            Some(_) => panic!("{node} is a list sentinel, not a node"),
            None => panic!("stale or unknown {node}"),
        }
    }

    fn sentinel_slot(&self, list: ListId) -> u32 {
        match self.live(list.0) {
            Some(idx) if matches!(self.slots[idx as usize].entry, Entry::Sentinel) => idx,
            Some(_) => panic!("{list} does not name a sentinel"),
            None => panic!("stale or unknown {list}"),
        }
    }

    fn id_of(&self, idx: u32) -> NodeId {
        NodeId::new(idx, self.slots[idx as usize].generation)
    }

    /// Link `idx` between the adjacent slots `prev` and `next`.
    fn link_between(&mut self, idx: u32, prev: u32, next: u32) {
        debug_assert_eq!(self.slots[prev as usize].next, next);
        debug_assert_eq!(self.slots[next as usize].prev, prev);
        self.slots[idx as usize].prev = prev;
        self.slots[idx as usize].next = next;
        self.slots[prev as usize].next = idx;
        self.slots[next as usize].prev = idx;
    }

    fn unlink(&mut self, idx: u32) {
        let next = self.slots[idx as usize].next;
        let prev = self.slots[idx as usize].prev;
        assert!(
            self.slots[next as usize].prev == idx && self.slots[prev as usize].next == idx,
            "corrupted links around slot {idx}"
        );
        self.slots[prev as usize].next = next;
        self.slots[next as usize].prev = prev;
        self.slots[idx as usize].next = idx;
        self.slots[idx as usize].prev = idx;
    }

    /// Create a new, empty list.
    pub fn new_list(&mut self) -> ListId {
        ListId(self.alloc_slot(Entry::Sentinel))
    }

    /// Release an empty list's sentinel.
    ///
    /// # Panics
    ///
    /// Panics if the list still has entries.
    pub fn release_list(&mut self, list: ListId) {
        let idx = self.sentinel_slot(list);
        assert!(
            self.slots[idx as usize].next == idx,
            "releasing non-empty {list}"
        );
        self.free_slot(idx);
    }

    /// Insert a value as a new, unlinked node.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.alloc_slot(Entry::Node(value))
    }

    /// Release an unlinked node and return its value.
    ///
    /// Returns `None` if the id is stale (double-release is safe).
    ///
    /// # Panics
    ///
    /// Panics if the node is still on a list.
    pub fn release(&mut self, node: NodeId) -> Option<T> {
        let idx = self.live(node)?;
        assert!(
            matches!(self.slots[idx as usize].entry, Entry::Node(_)),
            "{node} is a list sentinel, use release_list"
        );
        assert!(
            self.slots[idx as usize].next == idx,
            "releasing {node} while it is still linked"
        );
        match self.free_slot(idx) {
            Entry::Node(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self, list: ListId) -> bool {
        let idx = self.sentinel_slot(list);
        self.slots[idx as usize].next == idx
    }

    /// Number of entries on the list. Walks the list.
    pub fn len(&self, list: ListId) -> usize {
        self.iter(list).count()
    }

    /// Whether the node is currently on a list.
    pub fn is_linked(&self, node: NodeId) -> bool {
        match self.live(node) {
            Some(idx) => self.slots[idx as usize].next != idx,
            None => false,
        }
    }

    /// Add an unlinked node at the head of the list.
    ///
    /// # Panics
    ///
    /// Panics if the node is already on a list.
    pub fn prepend(&mut self, list: ListId, node: NodeId) {
        let s = self.sentinel_slot(list);
        let n = self.node_slot(node);
        assert!(self.slots[n as usize].next == n, "{node} is already linked");
        let head = self.slots[s as usize].next;
        self.link_between(n, s, head);
    }

    /// Add an unlinked node at the tail of the list.
    ///
    /// # Panics
    ///
    /// Panics if the node is already on a list.
    pub fn append(&mut self, list: ListId, node: NodeId) {
        let s = self.sentinel_slot(list);
        let n = self.node_slot(node);
        assert!(self.slots[n as usize].next == n, "{node} is already linked");
        let tail = self.slots[s as usize].prev;
        self.link_between(n, tail, s);
    }

    /// Remove a node from whatever list it is on. No-op if unlinked.
    pub fn remove(&mut self, node: NodeId) {
        let n = self.node_slot(node);
        self.unlink(n);
    }

    /// Remove and return the first node, or `None` if the list is empty.
    pub fn remove_head(&mut self, list: ListId) -> Option<NodeId> {
        let s = self.sentinel_slot(list);
        let head = self.slots[s as usize].next;
        if head == s {
            return None;
        }
        self.unlink(head);
        Some(self.id_of(head))
    }

    /// Remove and return the last node, or `None` if the list is empty.
    pub fn remove_tail(&mut self, list: ListId) -> Option<NodeId> {
        let s = self.sentinel_slot(list);
        let tail = self.slots[s as usize].prev;
        if tail == s {
            return None;
        }
        self.unlink(tail);
        Some(self.id_of(tail))
    }

    /// Move every entry of `source` to the end of `target`, in order.
    ///
    /// `source` is left empty. Constant time: only the boundary links are
    /// rewritten.
    pub fn concatenate(&mut self, source: ListId, target: ListId) {
        let s = self.sentinel_slot(source);
        let t = self.sentinel_slot(target);
        assert!(s != t, "cannot concatenate {source} onto itself");
        let first = self.slots[s as usize].next;
        if first == s {
            return;
        }
        let last = self.slots[s as usize].prev;
        let t_last = self.slots[t as usize].prev;

        self.slots[t_last as usize].next = first;
        self.slots[first as usize].prev = t_last;
        self.slots[last as usize].next = t;
        self.slots[t as usize].prev = last;

        self.slots[s as usize].next = s;
        self.slots[s as usize].prev = s;
    }

    /// Move every entry of `source` into the empty list `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not empty.
    pub fn transfer(&mut self, source: ListId, target: ListId) {
        assert!(self.is_empty(target), "transfer target {target} is not empty");
        self.concatenate(source, target);
    }

    /// Shared access to a node's value.
    pub fn get(&self, node: NodeId) -> Option<&T> {
        let idx = self.live(node)?;
        match &self.slots[idx as usize].entry {
            Entry::Node(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access to a node's value.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        let idx = self.live(node)?;
        match &mut self.slots[idx as usize].entry {
            Entry::Node(value) => Some(value),
            _ => None,
        }
    }

    /// Iterate head to tail.
    pub fn iter(&self, list: ListId) -> Iter<'_, T> {
        let sentinel = self.sentinel_slot(list);
        Iter {
            pool: self,
            sentinel,
            cursor: self.slots[sentinel as usize].next,
            forward: true,
        }
    }

    /// Iterate tail to head.
    pub fn iter_rev(&self, list: ListId) -> Iter<'_, T> {
        let sentinel = self.sentinel_slot(list);
        Iter {
            pool: self,
            sentinel,
            cursor: self.slots[sentinel as usize].prev,
            forward: false,
        }
    }

    /// Walk the list and assert that every link is reciprocated.
    ///
    /// # Panics
    ///
    /// Panics on the first slot whose neighbours do not point back at it.
    pub fn check_links(&self, list: ListId) {
        let s = self.sentinel_slot(list);
        let mut idx = s;
        let mut steps = 0usize;
        loop {
            let slot = &self.slots[idx as usize];
            assert_eq!(
                self.slots[slot.next as usize].prev, idx,
                "next.prev mismatch at slot {idx}"
            );
            assert_eq!(
                self.slots[slot.prev as usize].next, idx,
                "prev.next mismatch at slot {idx}"
            );
            idx = slot.next;
            steps += 1;
            assert!(steps <= self.slots.len(), "cycle does not return to {list}");
            if idx == s {
                break;
            }
        }
    }
}

impl<T> Default for LinkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a list's nodes, yielding `(NodeId, &T)`.
pub struct Iter<'a, T> {
    pool: &'a LinkPool<T>,
    sentinel: u32,
    cursor: u32,
    forward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != self.sentinel {
            let idx = self.cursor;
            let slot = &self.pool.slots[idx as usize];
            self.cursor = if self.forward { slot.next } else { slot.prev };
            if let Entry::Node(value) = &slot.entry {
                return Some((NodeId::new(idx, slot.generation), value));
            }
        }
        None
    }
}
