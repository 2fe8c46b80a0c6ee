//! Hash-to-index map backing the interning operations.
//!
//! The map never stores entries, only `(hash, pool index)` pairs in an
//! open-addressed table, so one allocation indexes the whole pool. It
//! also never resolves collisions itself: a lookup walks every stored
//! index whose hash equals the query, and the caller decides equality
//! against the actual entries.

/// Position of a filled slot, used to resume a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(usize);

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    hash: u32,
    /// One-based pool index; 0 marks the slot empty.
    index: u16,
}

/// Open-addressed map from structural hash to one-based pool indices.
#[derive(Debug, Default)]
pub struct EntryMap {
    slots: Box<[Slot]>,
    len: usize,
}

const INITIAL_SLOTS: usize = 16;

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(entries: usize) -> Self {
        let mut slots = INITIAL_SLOTS;
        // Size so the load stays under three quarters from the start.
        while slots * 3 < entries * 4 {
            slots *= 2;
        }
        Self {
            slots: vec![Slot::default(); slots].into_boxed_slice(),
            len: 0,
        }
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// First stored index whose hash equals `hash`, if any.
    pub fn first_token(&self, hash: u32) -> Option<Token> {
        if self.slots.is_empty() {
            return None;
        }
        self.scan(hash, (hash as usize) & self.mask())
    }

    /// Next stored index with the same hash, continuing after `token`.
    pub fn next_token(&self, hash: u32, token: Token) -> Option<Token> {
        self.scan(hash, (token.0 + 1) & self.mask())
    }

    fn scan(&self, hash: u32, mut position: usize) -> Option<Token> {
        // Load never reaches 1, so the probe always hits an empty slot.
        loop {
            let slot = self.slots[position];
            if slot.index == 0 {
                return None;
            }
            if slot.hash == hash {
                return Some(Token(position));
            }
            position = (position + 1) & self.mask();
        }
    }

    /// The pool index stored at `token`.
    pub fn index_at(&self, token: Token) -> u16 {
        self.slots[token.0].index
    }

    /// Records `index` under `hash`. The caller must have checked that no
    /// equal entry is already present.
    pub fn insert(&mut self, hash: u32, index: u16) {
        debug_assert!(index != 0, "pool indices are one-based");
        if (self.len + 1) * 4 > self.slots.len() * 3 {
            self.grow();
        }
        let mask = self.mask();
        let mut position = (hash as usize) & mask;
        while self.slots[position].index != 0 {
            position = (position + 1) & mask;
        }
        self.slots[position] = Slot { hash, index };
        self.len += 1;
    }

    fn grow(&mut self) {
        let new_len = if self.slots.is_empty() {
            INITIAL_SLOTS
        } else {
            self.slots.len() * 2
        };
        let old = std::mem::replace(
            &mut self.slots,
            vec![Slot::default(); new_len].into_boxed_slice(),
        );
        let mask = self.mask();
        for slot in old.iter().filter(|s| s.index != 0) {
            let mut position = (slot.hash as usize) & mask;
            while self.slots[position].index != 0 {
                position = (position + 1) & mask;
            }
            self.slots[position] = *slot;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
