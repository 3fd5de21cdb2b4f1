//! Ordered attribute bag.
//!
//! Keys are unique and keep the position of their first insertion, so a key
//! cursor and a value cursor walking the bag always agree on pairing.

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Inserted {
    /// Position of the key in iteration order.
    pub position: usize,
    /// True if an existing value was replaced.
    pub overwritten: bool,
}

/// Insertion-ordered string map with a modification counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct AttributeBag {
    entries: Vec<(String, String)>,
    modifications: u64,
}

impl AttributeBag {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn modifications(&self) -> u64 {
        self.modifications
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.position_of(key).map(|i| self.entries[i].1.as_str())
    }

    pub fn key_at(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|(k, _)| k.as_str())
    }

    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite. Overwriting keeps the existing position.
    pub fn insert(&mut self, key: String, value: String) -> Inserted {
        self.modifications = self.modifications.wrapping_add(1);

        if let Some(position) = self.position_of(&key) {
            self.entries[position].1 = value;
            return Inserted {
                position,
                overwritten: true,
            };
        }

        self.entries.push((key, value));
        Inserted {
            position: self.entries.len() - 1,
            overwritten: false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// The modification counter is bookkeeping for cursors, not content.
impl PartialEq for AttributeBag {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for AttributeBag {}
