// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Binary min-heap with stable handles.
//
// Every inserted key gets a handle that stays valid until the key leaves the
// queue, so keys can be removed from the middle of the heap in O(log n).
// `nodes` maps heap positions to handles, `handles` maps handles back to their
// key and heap position. Freed handles are chained through their `node` field
// and recycled. Position 0 and handle 0 are unused.
//
// Keys inserted before `init` are heapified in one pass; keys inserted after
// it are floated into place immediately.

/// Stable reference to a key in a [`PriorityQ`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PqHandle(u32);

#[derive(Clone, Copy, Debug)]
struct HandleElem<K> {
    key: Option<K>,
    node: u32,
}

pub struct PriorityQ<K: Copy> {
    nodes: Vec<u32>,
    handles: Vec<HandleElem<K>>,
    size: usize,
    max: usize,
    free_list: u32,
    initialized: bool,
    /// Returns true iff the first key sorts before or equal to the second.
    leq: fn(&K, &K) -> bool,
}

impl<K: Copy> PriorityQ<K> {
    pub fn new(capacity: usize, leq: fn(&K, &K) -> bool) -> Self {
        let max = capacity.max(1);
        PriorityQ {
            nodes: vec![0; max + 1],
            handles: vec![HandleElem { key: None, node: 0 }; max + 1],
            size: 0,
            max,
            free_list: 0,
            initialized: false,
            leq,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    fn key_of(&self, h: u32) -> &K {
        match &self.handles[h as usize].key {
            Some(k) => k,
            None => unreachable!("handle {} is in the heap but has no key", h),
        }
    }

    #[inline]
    fn key_at(&self, pos: usize) -> &K {
        self.key_of(self.nodes[pos])
    }

    #[inline]
    fn place(&mut self, pos: usize, handle: u32) {
        self.nodes[pos] = handle;
        self.handles[handle as usize].node = pos as u32;
    }

    fn float_down(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child < self.size && (self.leq)(self.key_at(child + 1), self.key_at(child)) {
                child += 1;
            }
            if child > self.size || (self.leq)(self.key_of(h_curr), self.key_at(child)) {
                self.place(curr, h_curr);
                return;
            }
            let h_child = self.nodes[child];
            self.place(curr, h_child);
            curr = child;
        }
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 || (self.leq)(self.key_at(parent), self.key_of(h_curr)) {
                self.place(curr, h_curr);
                return;
            }
            let h_parent = self.nodes[parent];
            self.place(curr, h_parent);
            curr = parent;
        }
    }

    /// Establishes heap order over everything inserted so far. Later inserts
    /// keep the order incrementally.
    pub fn init(&mut self) {
        for i in (1..=self.size).rev() {
            self.float_down(i);
        }
        self.initialized = true;
    }

    pub fn insert(&mut self, key: K) -> PqHandle {
        self.size += 1;
        let curr = self.size;
        if curr * 2 > self.max {
            self.max <<= 1;
            self.nodes.resize(self.max + 1, 0);
            self.handles.resize(self.max + 1, HandleElem { key: None, node: 0 });
        }

        let handle = if self.free_list == 0 {
            curr as u32
        } else {
            let h = self.free_list;
            self.free_list = self.handles[h as usize].node;
            h
        };
        self.handles[handle as usize].key = Some(key);
        self.place(curr, handle);

        if self.initialized {
            self.float_up(curr);
        }
        PqHandle(handle)
    }

    /// Smallest key, without removing it.
    pub fn peek_min(&self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        Some(*self.key_at(1))
    }

    pub fn extract_min(&mut self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        let h_min = self.nodes[1];
        let min = self.handles[h_min as usize].key.take();

        let last = self.nodes[self.size];
        self.place(1, last);
        self.release(h_min);
        self.size -= 1;
        if self.size > 0 {
            self.float_down(1);
        }
        min
    }

    /// Removes the key behind `handle`. Handles that are no longer live are ignored.
    pub fn delete(&mut self, handle: PqHandle) {
        let h = handle.0;
        if h == 0 || h as usize >= self.handles.len() || self.handles[h as usize].key.is_none() {
            return;
        }
        let curr = self.handles[h as usize].node as usize;
        let last = self.nodes[self.size];
        self.place(curr, last);
        self.size -= 1;

        if curr <= self.size {
            if curr <= 1 || (self.leq)(self.key_at(curr >> 1), self.key_at(curr)) {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }
        self.release(h);
    }

    fn release(&mut self, h: u32) {
        self.handles[h as usize].key = None;
        self.handles[h as usize].node = self.free_list;
        self.free_list = h;
    }
}
