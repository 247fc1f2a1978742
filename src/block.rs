//! Day-partition clock: decides which block output is written under
//!
//! Both trigger sources (message arrival, window tick) call
//! [`BlockClock::check_and_advance`]; the compare-and-mutate step runs under
//! one mutex so a date transition increments the block index exactly once.

use {
    crate::persistence::{self, PartitionState},
    chrono::{Local, NaiveDate},
    std::{
        path::{Path, PathBuf},
        sync::Mutex,
    },
};

/// Result of a partition check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub advanced: bool,
    pub block_index: u64,
    pub last_block_date: NaiveDate,
}

/// Tracks the current day-scoped block and persists transitions
///
/// Exactly one instance exists per process; the block index never decreases.
pub struct BlockClock {
    state: Mutex<PartitionState>,
    state_file: PathBuf,
}

impl BlockClock {
    /// Restore the clock from the state file, defaulting to block 1 / today
    /// when no previous state exists or the file is malformed.
    pub fn load(state_file: impl AsRef<Path>) -> Self {
        let state_file = state_file.as_ref().to_path_buf();
        let state = persistence::load_state(&state_file)
            .unwrap_or_else(|| PartitionState::initial(Local::now().date_naive()));

        Self {
            state: Mutex::new(state),
            state_file,
        }
    }

    /// Check whether the calendar date has changed and advance the block
    ///
    /// On a date change the block index is incremented and the new state is
    /// persisted before returning. A save failure is logged; the in-memory
    /// state stays authoritative for the rest of the run.
    pub fn check_and_advance(&self) -> AdvanceOutcome {
        self.check_and_advance_at(Local::now().date_naive())
    }

    fn check_and_advance_at(&self, today: NaiveDate) -> AdvanceOutcome {
        let mut state = self.state.lock().unwrap();

        // A backwards clock move is treated as "unchanged": the block index
        // must never decrease.
        if today <= state.last_block_date {
            return AdvanceOutcome {
                advanced: false,
                block_index: state.block_index,
                last_block_date: state.last_block_date,
            };
        }

        state.block_index += 1;
        state.last_block_date = today;

        if let Err(e) = persistence::save_state(&state, &self.state_file) {
            log::error!(
                "Failed to persist state to {}: {}",
                self.state_file.display(),
                e
            );
        }

        log::info!("New day detected, block index advanced to {}", state.block_index);

        AdvanceOutcome {
            advanced: true,
            block_index: state.block_index,
            last_block_date: state.last_block_date,
        }
    }

    /// Current block index without advancing
    pub fn current_block(&self) -> u64 {
        self.state.lock().unwrap().block_index
    }

    #[cfg(test)]
    pub fn advance_for_test(&self, today: NaiveDate) -> AdvanceOutcome {
        self.check_and_advance_at(today)
    }
}
