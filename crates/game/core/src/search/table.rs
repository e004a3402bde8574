use super::WIN;
use crate::action::Action;

/// Scores beyond this magnitude are wins or losses a known number of plies away.
const MATE_BOUND: i32 = WIN - 1_000;

/// Rebases a root-relative mate score onto the node at `ply`.
fn to_table(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_BOUND {
        score + ply
    } else if score < -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`to_table`] for a node looked up at `ply`.
fn from_table(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_BOUND {
        score - ply
    } else if score < -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

/// How a stored score relates to the true value of the position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-low: the true score is at most the stored one.
    Alpha,
    /// Fail-high: the true score is at least the stored one.
    Beta,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableEntry {
    pub hash: u64,
    pub best: Option<Action>,
    /// Mate scores count plies from this node, not from the root.
    pub score: i32,
    pub bound: Bound,
    pub depth: u32,
}

/// Fixed-size, always-indexed transposition table keyed by the state hash.
///
/// Slots are chosen by the low bits of the hash. A slot is overwritten when
/// it is empty or holds a result searched no deeper than the new one.
#[derive(Clone, Debug)]
pub struct TranspositionTable {
    slots: Vec<Option<TableEntry>>,
    mask: u64,
}

impl TranspositionTable {
    /// Creates a table with at least `size` slots, rounded up to a power of two.
    pub fn new(size: usize) -> Self {
        let size = size.max(1).next_power_of_two();
        Self {
            slots: vec![None; size],
            mask: size as u64 - 1,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    pub fn entry(&self, hash: u64) -> Option<&TableEntry> {
        self.slots[self.index(hash)]
            .as_ref()
            .filter(|entry| entry.hash == hash)
    }

    /// Best move recorded for the position, used to search it first.
    pub fn best_move(&self, hash: u64) -> Option<Action> {
        self.entry(hash).and_then(|entry| entry.best)
    }

    /// Score usable at the current window, if the stored search was deep enough.
    ///
    /// `ply` is the distance of the current node from the root.
    pub fn lookup(&self, hash: u64, alpha: i32, beta: i32, depth: u32, ply: usize) -> Option<i32> {
        let entry = self.entry(hash)?;
        if entry.depth < depth {
            return None;
        }
        let score = from_table(entry.score, ply);
        match entry.bound {
            Bound::Exact => Some(score),
            Bound::Alpha if score <= alpha => Some(alpha),
            Bound::Beta if score >= beta => Some(beta),
            _ => None,
        }
    }

    /// Stores `entry`, whose score is root-relative as searched at `ply`.
    pub fn store(&mut self, mut entry: TableEntry, ply: usize) {
        entry.score = to_table(entry.score, ply);
        let index = self.index(entry.hash);
        let slot = &mut self.slots[index];
        if slot.is_none_or(|existing| existing.depth <= entry.depth) {
            *slot = Some(entry);
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hash: u64, score: i32, bound: Bound, depth: u32) -> TableEntry {
        TableEntry {
            hash,
            best: Some(Action::end_turn()),
            score,
            bound,
            depth,
        }
    }

    #[test]
    fn size_rounds_up_to_power_of_two() {
        assert_eq!(TranspositionTable::new(1000).len(), 1024);
        assert_eq!(TranspositionTable::new(0).len(), 1);
    }

    #[test]
    fn bounds_only_answer_inside_their_side_of_the_window() {
        let mut table = TranspositionTable::new(16);
        table.store(entry(3, 50, Bound::Alpha, 2), 0);
        assert_eq!(table.lookup(3, 60, 100, 2, 0), Some(60));
        assert_eq!(table.lookup(3, 10, 100, 2, 0), None);

        table.store(entry(3, 50, Bound::Beta, 2), 0);
        assert_eq!(table.lookup(3, 0, 40, 2, 0), Some(40));
        assert_eq!(table.lookup(3, 0, 80, 2, 0), None);

        table.store(entry(3, 50, Bound::Exact, 2), 0);
        assert_eq!(table.lookup(3, 0, 80, 2, 0), Some(50));
        assert_eq!(table.lookup(3, 0, 80, 3, 0), None);
    }

    #[test]
    fn shallower_results_do_not_replace_deeper_ones() {
        let mut table = TranspositionTable::new(16);
        table.store(entry(5, 10, Bound::Exact, 4), 0);
        table.store(entry(5, 99, Bound::Exact, 1), 0);
        assert_eq!(table.entry(5).map(|entry| entry.score), Some(10));

        // colliding hash in the same slot
        assert!(table.entry(5 + 16).is_none());
        assert_eq!(table.best_move(5), Some(Action::end_turn()));
    }

    #[test]
    fn mate_scores_keep_their_distance_across_plies() {
        let mut table = TranspositionTable::new(16);
        // found 5 plies from the root, the win is 2 plies below this node
        table.store(entry(7, WIN - 7, Bound::Exact, 2), 5);
        assert_eq!(table.entry(7).map(|entry| entry.score), Some(WIN - 2));
        // reached again 3 plies from the root
        assert_eq!(table.lookup(7, -WIN, WIN, 2, 3), Some(WIN - 5));

        table.store(entry(8, -(WIN - 6), Bound::Exact, 2), 4);
        assert_eq!(table.lookup(8, -WIN, WIN, 2, 1), Some(-(WIN - 3)));

        table.store(entry(9, 120, Bound::Exact, 2), 4);
        assert_eq!(table.lookup(9, -WIN, WIN, 2, 1), Some(120));
    }
}
