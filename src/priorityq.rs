// License: SGI Free Software License B (MIT-compatible)
//
// Two-phase priority queue for sweep events:
//   Phase 1 (pre-init): inserts accumulate in an array, sorted once by init().
//   Phase 2 (post-init): inserts go into a min-heap.
// extract_min merges the two sources. Deletion by handle is supported in
// both phases.
//
// Keys are small Copy values (the sweep uses a coordinate pair plus vertex
// index), so they are stored by value. Handles: negative handles index the
// sort array as -(slot + 1); positive handles belong to the heap. Zero is
// never issued.

pub const INVALID_HANDLE: i32 = 0x0fff_ffff;

/// Ordering predicate: returns true iff a <= b.
pub type Leq<K> = fn(&K, &K) -> bool;

#[inline]
fn leq_opt<K>(leq: Leq<K>, a: &Option<K>, b: &Option<K>) -> bool {
    // None orders above everything; it only appears on the empty-heap
    // sentinel and on deleted slots.
    match (a, b) {
        (Some(a), Some(b)) => leq(a, b),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Handle-addressable binary min-heap, 1-based.
struct Heap<K> {
    /// nodes[1..=size] hold handle indices; nodes[0] unused.
    nodes: Vec<i32>,
    /// handles[h] = (key, node position). A None key marks a free handle.
    handles: Vec<(Option<K>, i32)>,
    size: usize,
    max: usize,
    free_list: i32,
    initialized: bool,
    leq: Leq<K>,
}

impl<K: Copy> Heap<K> {
    fn new(size: usize, leq: Leq<K>) -> Self {
        let mut nodes = vec![0i32; size + 2];
        let mut handles: Vec<(Option<K>, i32)> = Vec::new();
        handles.resize_with(size + 2, || (None, 0));
        // nodes[1] points at a None key so minimum() of an empty heap is None
        nodes[1] = 1;
        handles[1] = (None, 1);
        Heap {
            nodes,
            handles,
            size: 0,
            max: size,
            free_list: 0,
            initialized: false,
            leq,
        }
    }

    #[inline]
    fn key_of(&self, handle: i32) -> &Option<K> {
        &self.handles[handle as usize].0
    }

    fn float_down(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child < self.size
                && leq_opt(
                    self.leq,
                    self.key_of(self.nodes[child + 1]),
                    self.key_of(self.nodes[child]),
                )
            {
                child += 1;
            }
            let h_child = self.nodes[child];
            if child > self.size || leq_opt(self.leq, self.key_of(h_curr), self.key_of(h_child)) {
                self.nodes[curr] = h_curr;
                self.handles[h_curr as usize].1 = curr as i32;
                break;
            }
            self.nodes[curr] = h_child;
            self.handles[h_child as usize].1 = curr as i32;
            curr = child;
        }
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            let h_parent = self.nodes[parent];
            if parent == 0 || leq_opt(self.leq, self.key_of(h_parent), self.key_of(h_curr)) {
                self.nodes[curr] = h_curr;
                self.handles[h_curr as usize].1 = curr as i32;
                break;
            }
            self.nodes[curr] = h_parent;
            self.handles[h_parent as usize].1 = curr as i32;
            curr = parent;
        }
    }

    fn init(&mut self) {
        for i in (1..=self.size).rev() {
            self.float_down(i);
        }
        self.initialized = true;
    }

    fn insert(&mut self, key: K) -> i32 {
        self.size += 1;
        let curr = self.size;

        if curr * 2 > self.max {
            self.max <<= 1;
            self.nodes.resize(self.max + 2, 0);
            self.handles.resize_with(self.max + 2, || (None, 0));
        }

        let free_handle = if self.free_list == 0 {
            curr as i32
        } else {
            let f = self.free_list;
            self.free_list = self.handles[f as usize].1;
            f
        };

        self.nodes[curr] = free_handle;
        self.handles[free_handle as usize] = (Some(key), curr as i32);

        if self.initialized {
            self.float_up(curr);
        }
        free_handle
    }

    fn extract_min(&mut self) -> Option<K> {
        let h_min = self.nodes[1];
        let min_key = self.handles[h_min as usize].0;

        if self.size > 0 {
            self.nodes[1] = self.nodes[self.size];
            self.handles[self.nodes[1] as usize].1 = 1;

            self.handles[h_min as usize].0 = None;
            self.handles[h_min as usize].1 = self.free_list;
            self.free_list = h_min;

            self.size -= 1;
            if self.size > 0 {
                self.float_down(1);
            }
        }
        min_key
    }

    fn delete(&mut self, h_curr: i32) {
        debug_assert!(self.handles[h_curr as usize].0.is_some());
        let curr = self.handles[h_curr as usize].1 as usize;

        self.nodes[curr] = self.nodes[self.size];
        self.handles[self.nodes[curr] as usize].1 = curr as i32;

        self.size -= 1;
        if curr <= self.size {
            let parent_fixed = curr <= 1
                || leq_opt(
                    self.leq,
                    self.key_of(self.nodes[curr >> 1]),
                    self.key_of(self.nodes[curr]),
                );
            if parent_fixed {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }

        self.handles[h_curr as usize].0 = None;
        self.handles[h_curr as usize].1 = self.free_list;
        self.free_list = h_curr;
    }

    #[inline]
    fn minimum(&self) -> Option<K> {
        self.handles[self.nodes[1] as usize].0
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// The combined sort-array + heap queue.
pub struct PriorityQ<K> {
    heap: Heap<K>,
    /// Pre-init key storage. None marks a deleted slot.
    keys: Vec<Option<K>>,
    /// Indirect indices into keys, sorted descending so extraction pops
    /// from the end.
    order: Vec<usize>,
    size: usize,
    max: usize,
    initialized: bool,
    leq: Leq<K>,
}

impl<K: Copy> PriorityQ<K> {
    pub fn new(size: usize, leq: Leq<K>) -> Self {
        PriorityQ {
            heap: Heap::new(size, leq),
            keys: Vec::with_capacity(size),
            order: Vec::new(),
            size: 0,
            max: size,
            initialized: false,
            leq,
        }
    }

    /// Sort the phase-1 inserts. Must run after all bulk inserts and before
    /// the first extract_min/minimum.
    pub fn init(&mut self) {
        self.order = (0..self.size).collect();

        let keys = &self.keys;
        let leq = self.leq;
        self.order.sort_unstable_by(|&a, &b| {
            let ab = leq_opt(leq, &keys[a], &keys[b]);
            let ba = leq_opt(leq, &keys[b], &keys[a]);
            if ab && ba {
                std::cmp::Ordering::Equal
            } else if ab {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Less
            }
        });

        self.max = self.size;
        self.initialized = true;
        self.heap.init();
    }

    /// Insert a key, returning a handle usable with delete().
    pub fn insert(&mut self, key: K) -> i32 {
        if self.initialized {
            return self.heap.insert(key);
        }

        let curr = self.size;
        self.size += 1;
        if self.size > self.max {
            self.max <<= 1;
        }

        if curr >= self.keys.len() {
            self.keys.push(Some(key));
        } else {
            self.keys[curr] = Some(key);
        }

        -(curr as i32 + 1)
    }

    pub fn extract_min(&mut self) -> Option<K> {
        if self.size == 0 {
            return self.heap.extract_min();
        }

        let sort_min = self.keys[self.order[self.size - 1]];
        if !self.heap.is_empty() && leq_opt(self.leq, &self.heap.minimum(), &sort_min) {
            return self.heap.extract_min();
        }

        // Pop from the sort array, skipping deleted slots.
        loop {
            self.size -= 1;
            if self.size == 0 || self.keys[self.order[self.size - 1]].is_some() {
                break;
            }
        }
        sort_min
    }

    pub fn minimum(&self) -> Option<K> {
        if self.size == 0 {
            return self.heap.minimum();
        }

        let sort_min = self.keys[self.order[self.size - 1]];
        if !self.heap.is_empty() && leq_opt(self.leq, &self.heap.minimum(), &sort_min) {
            return self.heap.minimum();
        }
        sort_min
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.heap.is_empty()
    }

    pub fn delete(&mut self, handle: i32) {
        if handle >= 0 {
            self.heap.delete(handle);
            return;
        }

        let curr = (-(handle + 1)) as usize;
        debug_assert!(curr < self.keys.len() && self.keys[curr].is_some());
        self.keys[curr] = None;

        while self.size > 0 && self.keys[self.order[self.size - 1]].is_none() {
            self.size -= 1;
        }
    }
}
