use super::SearchState;

use std::cmp::Ordering;

// Frontier entry. Several entries may exist for one state; only the cheapest
// is live, the rest are skipped when popped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FrontierNode {
    pub(crate) state: SearchState,
    pub(crate) cost: usize,
}

// Reversed so that `BinaryHeap` pops the lowest cost first.
impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
