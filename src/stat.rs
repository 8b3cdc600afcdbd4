use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub(crate) costs: Option<usize>,
    pub(crate) time_us: u128,
    pub(crate) expanded_states: usize,
    pub(crate) stale_pops: usize,
    pub(crate) improvements: usize,
    pub(crate) tie_merges: usize,
    pub(crate) cheat_starts: usize,
}

impl Stats {
    pub(crate) fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expanded states: {:?} Stale pops: {:?} Improvements: {:?} Tie merges: {:?} Cheat starts: {:?}",
            self.costs,
            self.time_us,
            self.expanded_states,
            self.stale_pops,
            self.improvements,
            self.tie_merges,
            self.cheat_starts
        );
    }
}
