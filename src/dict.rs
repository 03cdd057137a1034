// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sorted doubly linked list with a caller-supplied ordering.
//
// The sweep keeps its active regions here. Their order depends on the current
// sweep event, so the comparator is passed to each operation instead of being
// stored. Node 0 is the header; it has no key and closes the circular list.

/// Index into the node arena.
pub type NodeIdx = u32;

pub const DICT_HEAD: NodeIdx = 0;

#[derive(Clone, Debug)]
struct DictNode<K> {
    key: Option<K>,
    next: NodeIdx,
    prev: NodeIdx,
}

pub struct Dict<K: Copy> {
    nodes: Vec<DictNode<K>>,
    free: Vec<NodeIdx>,
}

impl<K: Copy> Dict<K> {
    pub fn new() -> Self {
        Dict {
            nodes: vec![DictNode {
                key: None,
                next: DICT_HEAD,
                prev: DICT_HEAD,
            }],
            free: Vec::new(),
        }
    }

    /// Inserts at the tail, then walks back to the sorted position.
    pub fn insert<F>(&mut self, key: K, leq: F) -> NodeIdx
    where
        F: Fn(K, K) -> bool,
    {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Inserts `key` before `node`, first walking backwards past every node that
    /// does not sort before or equal to `key`.
    pub fn insert_before<F>(&mut self, mut node: NodeIdx, key: K, leq: F) -> NodeIdx
    where
        F: Fn(K, K) -> bool,
    {
        loop {
            node = self.nodes[node as usize].prev;
            match self.nodes[node as usize].key {
                None => break,
                Some(k) if leq(k, key) => break,
                Some(_) => {}
            }
        }

        let next = self.nodes[node as usize].next;
        let new_node = DictNode {
            key: Some(key),
            next,
            prev: node,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = new_node;
                idx
            }
            None => {
                self.nodes.push(new_node);
                (self.nodes.len() - 1) as NodeIdx
            }
        };
        self.nodes[node as usize].next = idx;
        self.nodes[next as usize].prev = idx;
        idx
    }

    pub fn delete(&mut self, node: NodeIdx) {
        debug_assert!(node != DICT_HEAD);
        let DictNode { next, prev, .. } = self.nodes[node as usize];
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize].key = None;
        self.free.push(node);
    }

    /// First node whose key is greater than or equal to `key`; the header if none.
    pub fn search<F>(&self, key: K, leq: F) -> NodeIdx
    where
        F: Fn(K, K) -> bool,
    {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node as usize].next;
            match self.nodes[node as usize].key {
                None => return node,
                Some(k) if leq(key, k) => return node,
                Some(_) => {}
            }
        }
    }

    #[inline]
    pub fn key(&self, node: NodeIdx) -> Option<K> {
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

    /// Keys in order, from min to max.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        let mut node = self.min();
        std::iter::from_fn(move || {
            let key = self.nodes[node as usize].key?;
            node = self.nodes[node as usize].next;
            Some(key)
        })
    }
}

impl<K: Copy> Default for Dict<K> {
    fn default() -> Self {
        Self::new()
    }
}
