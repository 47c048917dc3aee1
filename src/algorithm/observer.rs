//! Progress side channel for long-running stages

/// Receives completion counts from the parallel stages
///
/// Hooks are called from worker threads in completion order, so `completed`
/// values may arrive out of sequence. Every hook defaults to doing nothing.
pub trait MatchObserver: Sync {
    /// A candidate image finished loading and indexing, or was skipped
    fn candidate_indexed(&self, _completed: usize, _total: usize) {}

    /// A source tile found its best match
    fn tile_matched(&self, _completed: usize, _total: usize) {}
}

/// Silent observer
impl MatchObserver for () {}
