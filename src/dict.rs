// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-status dictionary: a sorted circular doubly-linked list of active
// regions, ordered bottom to top at the current sweep position. Keys are
// u32 region indices; INVALID marks the head sentinel.
//
// The ordering predicate depends on the sweep's current event, so the sweep
// walks the list itself and uses link_before/link_after for placement; the
// closure-based insert/search entry points cover the simple cases and the
// tests. Node slots are not reclaimed on delete, the dictionary only lives
// for one sweep.

use crate::mesh::INVALID;

/// Index into Dict::nodes
pub type NodeIdx = u32;

#[derive(Clone, Debug)]
pub struct DictNode {
    /// Active-region index, or INVALID for the sentinel.
    pub key: u32,
    pub next: NodeIdx,
    pub prev: NodeIdx,
}

/// Index of the head sentinel node.
pub const DICT_HEAD: NodeIdx = 0;

pub struct Dict {
    pub nodes: Vec<DictNode>,
}

impl Dict {
    pub fn new() -> Self {
        Dict {
            nodes: vec![DictNode {
                key: INVALID,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            }],
        }
    }

    /// Link a new node holding `key` directly before `node`, without any
    /// ordering walk.
    pub fn link_before(&mut self, node: NodeIdx, key: u32) -> NodeIdx {
        let prev = self.nodes[node as usize].prev;
        self.link_after(prev, key)
    }

    /// Link a new node holding `key` directly after `node`.
    pub fn link_after(&mut self, node: NodeIdx, key: u32) -> NodeIdx {
        let new_idx = self.nodes.len() as NodeIdx;
        let next = self.nodes[node as usize].next;
        self.nodes.push(DictNode {
            key,
            next,
            prev: node,
        });
        self.nodes[node as usize].next = new_idx;
        self.nodes[next as usize].prev = new_idx;
        new_idx
    }

    /// Insert in sorted position, walking backward from the tail.
    pub fn insert<F>(&mut self, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Insert before `node`, walking backward to the first node whose key
    /// orders at or below `key`.
    pub fn insert_before<F>(&mut self, mut node: NodeIdx, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        loop {
            node = self.nodes[node as usize].prev;
            let node_key = self.nodes[node as usize].key;
            if node_key == INVALID || leq(node_key, key) {
                break;
            }
        }
        self.link_after(node, key)
    }

    /// Unlink a node.
    pub fn delete(&mut self, node: NodeIdx) {
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize].next = INVALID;
        self.nodes[node as usize].prev = INVALID;
        self.nodes[node as usize].key = INVALID;
    }

    /// First node whose key orders at or above `key`; the sentinel if none.
    pub fn search<F>(&self, key: u32, leq: &F) -> NodeIdx
    where
        F: Fn(u32, u32) -> bool,
    {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node as usize].next;
            let node_key = self.nodes[node as usize].key;
            if node_key == INVALID || leq(key, node_key) {
                return node;
            }
        }
    }

    #[inline]
    pub fn key(&self, node: NodeIdx) -> u32 {
        self.nodes[node as usize].key
    }

    #[inline]
    pub fn min(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].next
    }

    #[inline]
    pub fn max(&self) -> NodeIdx {
        self.nodes[DICT_HEAD as usize].prev
    }

    #[inline]
    pub fn succ(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].next
    }

    #[inline]
    pub fn pred(&self, node: NodeIdx) -> NodeIdx {
        self.nodes[node as usize].prev
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leq(a: u32, b: u32) -> bool {
        a <= b
    }

    #[test]
    fn empty_dict() {
        let d = Dict::new();
        assert_eq!(d.min(), DICT_HEAD);
        assert_eq!(d.max(), DICT_HEAD);
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut d = Dict::new();
        d.insert(3, &leq);
        d.insert(1, &leq);
        d.insert(2, &leq);

        let n1 = d.min();
        assert_eq!(d.key(n1), 1);
        let n2 = d.succ(n1);
        assert_eq!(d.key(n2), 2);
        let n3 = d.succ(n2);
        assert_eq!(d.key(n3), 3);
        assert_eq!(d.succ(n3), DICT_HEAD);
    }

    #[test]
    fn link_before_skips_the_ordering_walk() {
        let mut d = Dict::new();
        let n3 = d.insert(3, &leq);
        let n = d.link_before(n3, 7);
        assert_eq!(d.succ(n), n3);
        assert_eq!(d.pred(n3), n);
        assert_eq!(d.key(d.min()), 7);
    }

    #[test]
    fn delete_node() {
        let mut d = Dict::new();
        d.insert(1, &leq);
        let n2 = d.insert(2, &leq);
        d.insert(3, &leq);

        d.delete(n2);

        let n1 = d.min();
        assert_eq!(d.key(n1), 1);
        let n3 = d.succ(n1);
        assert_eq!(d.key(n3), 3);
        assert_eq!(d.succ(n3), DICT_HEAD);
    }

    #[test]
    fn search_finds_first_geq() {
        let mut d = Dict::new();
        d.insert(1, &leq);
        d.insert(3, &leq);
        d.insert(5, &leq);

        assert_eq!(d.key(d.search(2, &leq)), 3);
        assert_eq!(d.key(d.search(3, &leq)), 3);
        assert_eq!(d.search(6, &leq), DICT_HEAD);
    }
}
