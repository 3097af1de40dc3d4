//! Singly-linked stacks.
//!
//! An [`SListHead`] is just an optional head id; the links live in an
//! [`SLinkPool`]. Because the tail cannot be found in constant time, the
//! only mutations are push and pop at the head.

use crate::id::NodeId;

struct SSlot<T> {
    generation: u32,
    next: Option<u32>,
    linked: bool,
    value: Option<T>,
}

/// Head of a singly-linked stack stored in an [`SLinkPool`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SListHead {
    head: Option<NodeId>,
}

impl SListHead {
    /// An empty stack.
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Whether the stack has no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The first node, if any.
    pub fn first(&self) -> Option<NodeId> {
        self.head
    }
}

/// Link storage for singly-linked stacks.
pub struct SLinkPool<T> {
    slots: Vec<SSlot<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> SLinkPool<T> {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    fn live_slot(&self, id: NodeId) -> Option<usize> {
        let slot = self.slots.get(id.slot as usize)?;
        if slot.generation != id.generation || slot.value.is_none() {
            return None;
        }
        Some(id.slot as usize)
    }

    fn expect_live(&self, id: NodeId) -> usize {
        match self.live_slot(id) {
            Some(idx) => idx,
            None => panic!("stale or unknown {id}"),
        }
    }

    fn id_of(&self, idx: u32) -> NodeId {
        NodeId::new(idx, self.slots[idx as usize].generation)
    }

    /// Insert a value as a new, unlinked node.
    pub fn insert(&mut self, value: T) -> NodeId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.next = None;
            slot.linked = false;
            slot.value = Some(value);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(SSlot {
                generation: 0,
                next: None,
                linked: false,
                value: Some(value),
            });
            NodeId::new(idx, 0)
        }
    }

    /// Release an unlinked node and return its value.
    ///
    /// Returns `None` if the id is stale.
    ///
    /// # Panics
    ///
    /// Panics if the node is still on a stack.
    pub fn release(&mut self, node: NodeId) -> Option<T> {
        let idx = self.live_slot(node)?;
        let slot = &mut self.slots[idx];
        assert!(!slot.linked, "releasing {node} while it is still linked");
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(idx as u32);
        }
        self.live -= 1;
        value
    }

    /// Push an unlinked node onto the head of the stack.
    ///
    /// # Panics
    ///
    /// Panics if the node is already on a stack.
    pub fn push(&mut self, list: &mut SListHead, node: NodeId) {
        let idx = self.expect_live(node);
        let next = list.head.map(|h| h.slot);
        let slot = &mut self.slots[idx];
        assert!(!slot.linked, "{node} is already linked");
        slot.next = next;
        slot.linked = true;
        list.head = Some(node);
    }

    /// Pop the head node, or `None` if the stack is empty.
    pub fn pop(&mut self, list: &mut SListHead) -> Option<NodeId> {
        let head = list.head?;
        let idx = self.expect_live(head);
        let slot = &mut self.slots[idx];
        let next = slot.next.take();
        slot.linked = false;
        list.head = next.map(|n| self.id_of(n));
        Some(head)
    }

    /// The head node without removing it.
    pub fn peek(&self, list: &SListHead) -> Option<NodeId> {
        list.head
    }

    /// The node after `node` on its stack.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let idx = self.live_slot(node)?;
        self.slots[idx].next.map(|n| self.id_of(n))
    }

    /// Shared access to a node's value.
    pub fn get(&self, node: NodeId) -> Option<&T> {
        let idx = self.live_slot(node)?;
        self.slots[idx].value.as_ref()
    }

    /// Mutable access to a node's value.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        let idx = self.live_slot(node)?;
        self.slots[idx].value.as_mut()
    }

    /// Iterate from head to tail.
    pub fn iter<'a>(&'a self, list: &SListHead) -> SIter<'a, T> {
        SIter {
            pool: self,
            cursor: list.head.map(|h| h.slot),
        }
    }

    /// Number of live nodes in the pool, linked or not.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the pool holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for SLinkPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a stack's nodes, yielding `(NodeId, &T)` head first.
pub struct SIter<'a, T> {
    pool: &'a SLinkPool<T>,
    cursor: Option<u32>,
}

impl<'a, T> Iterator for SIter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let slot = &self.pool.slots[idx as usize];
        self.cursor = slot.next;
        slot.value
            .as_ref()
            .map(|v| (NodeId::new(idx, slot.generation), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_head_is_empty() {
        let head = SListHead::new();
        assert!(head.is_empty());
        assert_eq!(head.first(), None);
    }

    #[test]
    fn push_pop_is_lifo() {
        let mut pool = SLinkPool::new();
        let mut head = SListHead::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        let c = pool.insert(3);
        pool.push(&mut head, a);
        pool.push(&mut head, b);
        pool.push(&mut head, c);

        let order: Vec<i32> = pool.iter(&head).map(|(_, v)| *v).collect();
        assert_eq!(order, vec![3, 2, 1]);

        assert_eq!(pool.pop(&mut head), Some(c));
        assert_eq!(pool.pop(&mut head), Some(b));
        assert_eq!(pool.pop(&mut head), Some(a));
        assert_eq!(pool.pop(&mut head), None);
        assert!(head.is_empty());
    }

    #[test]
    fn next_follows_chain() {
        let mut pool = SLinkPool::new();
        let mut head = SListHead::new();
        let a = pool.insert('a');
        let b = pool.insert('b');
        pool.push(&mut head, a);
        pool.push(&mut head, b);
        assert_eq!(pool.peek(&head), Some(b));
        assert_eq!(pool.next(b), Some(a));
        assert_eq!(pool.next(a), None);
    }

    #[test]
    fn release_after_pop() {
        let mut pool = SLinkPool::new();
        let mut head = SListHead::new();
        let a = pool.insert(String::from("seg"));
        pool.push(&mut head, a);
        let popped = pool.pop(&mut head).unwrap();
        assert_eq!(pool.release(popped).as_deref(), Some("seg"));
        assert_eq!(pool.get(a), None);
        assert!(pool.is_empty());
    }

    #[test]
    #[should_panic(expected = "still linked")]
    fn release_linked_panics() {
        let mut pool = SLinkPool::new();
        let mut head = SListHead::new();
        let a = pool.insert(0u8);
        pool.push(&mut head, a);
        pool.release(a);
    }

    #[test]
    #[should_panic(expected = "already linked")]
    fn double_push_panics() {
        let mut pool = SLinkPool::new();
        let mut head = SListHead::new();
        let a = pool.insert(0u8);
        pool.push(&mut head, a);
        pool.push(&mut head, a);
    }

    #[test]
    fn two_stacks_share_one_pool() {
        let mut pool = SLinkPool::new();
        let mut left = SListHead::new();
        let mut right = SListHead::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        pool.push(&mut left, a);
        pool.push(&mut right, b);
        assert_eq!(pool.iter(&left).count(), 1);
        assert_eq!(pool.iter(&right).count(), 1);
        assert_eq!(pool.len(), 2);
        // Move a node from one stack to the other.
        let moved = pool.pop(&mut left).unwrap();
        pool.push(&mut right, moved);
        let order: Vec<i32> = pool.iter(&right).map(|(_, v)| *v).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn get_mut_updates_value() {
        let mut pool = SLinkPool::new();
        let a = pool.insert(10);
        *pool.get_mut(a).unwrap() += 5;
        assert_eq!(pool.get(a), Some(&15));
    }
}
