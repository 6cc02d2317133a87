//! Per-player token set: which slots a player currently claims.

use smallvec::SmallVec;

/// Slot indices held by a token set, in claim order.
pub type Slots = SmallVec<[usize; 4]>;

/// Fixed-capacity array of claimed slots with empty markers.
///
/// Positions are reused: releasing a slot frees its position for the
/// next claim, so the array never grows past the set arity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSet {
    positions: SmallVec<[Option<usize>; 4]>,
}

impl TokenSet {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            positions: SmallVec::from_elem(None, capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.positions.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn contains(&self, slot: usize) -> bool {
        self.positions.contains(&Some(slot))
    }

    /// Claim `slot` in the first free position. Returns `false` when full.
    pub fn insert(&mut self, slot: usize) -> bool {
        match self.positions.iter_mut().find(|p| p.is_none()) {
            Some(free) => {
                *free = Some(slot);
                true
            }
            None => false,
        }
    }

    /// Release `slot`. Returns `false` if it was not held.
    pub fn remove(&mut self, slot: usize) -> bool {
        match self.positions.iter_mut().find(|p| **p == Some(slot)) {
            Some(held) => {
                *held = None;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.positions.iter_mut().for_each(|p| *p = None);
    }

    #[must_use]
    pub fn slots(&self) -> Slots {
        self.positions.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_until_full() {
        let mut tokens = TokenSet::new(3);
        assert!(tokens.is_empty());
        assert!(tokens.insert(4));
        assert!(tokens.insert(7));
        assert!(tokens.insert(1));
        assert!(tokens.is_full());
        assert!(!tokens.insert(9));
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.slots().as_slice(), &[4, 7, 1]);
    }

    #[test]
    fn test_remove_reuses_position() {
        let mut tokens = TokenSet::new(3);
        tokens.insert(4);
        tokens.insert(7);
        assert!(tokens.remove(4));
        assert!(!tokens.remove(4));
        tokens.insert(2);
        assert_eq!(tokens.slots().as_slice(), &[2, 7]);
    }

    #[test]
    fn test_clear() {
        let mut tokens = TokenSet::new(2);
        tokens.insert(0);
        tokens.clear();
        assert!(tokens.is_empty());
        assert_eq!(tokens.capacity(), 2);
    }
}
