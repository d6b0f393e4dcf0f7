use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of uniform choices for the canned reply sets.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn next_index(&self, len: usize) -> usize;
}

/// Picks one entry of `options` through `random`.
pub fn choose<'a>(random: &dyn RandomSource, options: &[&'a str]) -> &'a str {
    match options.len() {
        0 => "",
        len => options[random.next_index(len) % len],
    }
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Cycles through a fixed list of indices. Used to make replies predictable.
#[derive(Debug)]
pub struct SequenceRandom {
    indices: Vec<usize>,
    position: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            position: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let position = self.position.fetch_add(1, Ordering::Relaxed);
        self.indices[position % self.indices.len()] % len
    }
}
