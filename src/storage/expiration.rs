//! Indexed Expiration Heap
//!
//! This module implements the priority structure that tracks when keys
//! expire. It is a binary min-heap over expiration deadlines with an
//! auxiliary key-to-slot map, so the earliest deadline is readable in O(1)
//! and any key's entry can be located, overwritten, or removed in O(log n).
//!
//! ## Design
//!
//! The heap lives in a flat `Vec`, children of slot `i` at `2i + 1` and
//! `2i + 2`. The `positions` map mirrors the array: for every tracked key,
//! `positions[key]` is the slot currently holding that key's entry. Every
//! swap the heap performs keeps the map in step.
//!
//! A key appears at most once. Inserting a deadline for a key that already
//! has one overwrites it in place and re-sinks or re-floats the entry,
//! rather than creating a duplicate.
//!
//! Entries with equal deadlines are ordered arbitrarily relative to each
//! other.

use std::collections::HashMap;
use std::time::Instant;

/// One tracked (key, deadline) pair.
#[derive(Debug, Clone)]
struct ExpirationEntry {
    key: String,
    deadline: Instant,
}

/// A key-indexed min-heap of expiration deadlines.
///
/// The index never touches the value mapping; it only answers which key
/// expires next. The sweep drains it with [`pop_due`](Self::pop_due) and
/// the store keeps it in step with [`insert`](Self::insert) and
/// [`remove`](Self::remove).
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    entries: Vec<ExpirationEntry>,
    positions: HashMap<String, usize>,
}

impl ExpirationIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `key` has a pending deadline.
    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Returns `key`'s pending deadline, if any. O(1).
    pub fn deadline(&self, key: &str) -> Option<Instant> {
        self.positions.get(key).map(|&idx| self.entries[idx].deadline)
    }

    /// Inserts or replaces the deadline for `key`. O(log n).
    ///
    /// If the key is already tracked its deadline is overwritten in place;
    /// the entry then floats up or sinks down as the new deadline requires.
    pub fn insert(&mut self, key: &str, deadline: Instant) {
        if let Some(&idx) = self.positions.get(key) {
            self.reschedule(idx, deadline);
            return;
        }

        let idx = self.entries.len();
        self.entries.push(ExpirationEntry {
            key: key.to_string(),
            deadline,
        });
        self.positions.insert(key.to_string(), idx);
        self.sift_up(idx);
    }

    /// Returns the earliest (key, deadline) pair without removing it. O(1).
    pub fn peek(&self) -> Option<(&str, Instant)> {
        self.entries.first().map(|e| (e.key.as_str(), e.deadline))
    }

    /// Removes and returns the earliest (key, deadline) pair. O(log n).
    pub fn pop(&mut self) -> Option<(String, Instant)> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.remove_at(0))
        }
    }

    /// Removes and returns the earliest key, but only if its deadline has
    /// elapsed at `now`. This is the sweep's drain primitive: call it in a
    /// loop until it returns `None`.
    pub fn pop_due(&mut self, now: Instant) -> Option<String> {
        if self.entries.first().is_some_and(|e| e.deadline <= now) {
            let (key, _) = self.remove_at(0);
            Some(key)
        } else {
            None
        }
    }

    /// Removes `key`'s entry, wherever it sits in the heap. O(log n).
    ///
    /// Returns `true` if an entry existed. Used when a key is deleted or
    /// overwritten before its deadline fires.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.positions.get(key).copied() {
            Some(idx) => {
                self.remove_at(idx);
                true
            }
            None => false,
        }
    }

    /// Discards every entry and the position map.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Overwrites the deadline at `idx` and restores heap order around it.
    fn reschedule(&mut self, idx: usize, deadline: Instant) {
        let old = self.entries[idx].deadline;
        self.entries[idx].deadline = deadline;
        if deadline > old {
            self.sift_down(idx);
        } else {
            self.sift_up(idx);
        }
    }

    /// Removes the entry at `idx` by swapping the tail into its slot, then
    /// re-sinks or re-floats the displaced entry.
    fn remove_at(&mut self, idx: usize) -> (String, Instant) {
        let entry = self.entries.swap_remove(idx);
        self.positions.remove(&entry.key);

        // The former tail now occupies `idx` (unless we removed the tail
        // itself); reseat it and restore order around it.
        if idx < self.entries.len() {
            self.positions.insert(self.entries[idx].key.clone(), idx);
            if idx > 0 && self.entries[idx].deadline < self.entries[(idx - 1) / 2].deadline {
                self.sift_up(idx);
            } else {
                self.sift_down(idx);
            }
        }

        (entry.key, entry.deadline)
    }

    /// Floats the entry at `idx` toward the root while its deadline is
    /// earlier than its parent's.
    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx].deadline >= self.entries[parent].deadline {
                break;
            }
            self.swap_entries(idx, parent);
            idx = parent;
        }
    }

    /// Sinks the entry at `idx` toward the leaves, swapping with its
    /// earlier-deadline child while that child is earlier than the entry.
    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            if left >= self.entries.len() {
                break;
            }
            let right = left + 1;
            let child = if right < self.entries.len()
                && self.entries[right].deadline < self.entries[left].deadline
            {
                right
            } else {
                left
            };
            if self.entries[child].deadline >= self.entries[idx].deadline {
                break;
            }
            self.swap_entries(idx, child);
            idx = child;
        }
    }

    /// Swaps two slots and reseats both keys in the position map.
    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.positions.insert(self.entries[a].key.clone(), a);
        self.positions.insert(self.entries[b].key.clone(), b);
    }
}
