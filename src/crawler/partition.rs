//! Partition keys
//!
//! The catalog is partitioned by the initial letter of department names.
//! Each partition is walked by exactly one session.

use std::fmt;

/// One letter of the catalog's alphabetical index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    letter: char,
}

impl PartitionKey {
    /// Builds a key from an ASCII letter, case-insensitively
    pub fn new(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        letter
            .is_ascii_uppercase()
            .then_some(Self { letter })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Every partition, A through Z
    pub fn alphabet() -> Vec<Self> {
        ('A'..='Z').map(|letter| Self { letter }).collect()
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)
    }
}
