use {
    chrono::NaiveDate,
    serde::{Deserialize, Serialize},
    std::{fs, io, path::Path},
};

/// Block partition state persisted across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionState {
    pub block_index: u64,
    pub last_block_date: NaiveDate,
}

impl PartitionState {
    /// Default state for a fresh install: block 1, started today
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            block_index: 1,
            last_block_date: today,
        }
    }
}

/// Load partition state from a JSON file
///
/// A missing file or unparseable content is a recoverable condition: the
/// caller falls back to `PartitionState::initial`.
pub fn load_state(path: impl AsRef<Path>) -> Option<PartitionState> {
    let path = path.as_ref();

    if !path.exists() {
        log::info!("No existing state file found: {}", path.display());
        return None;
    }

    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to read state file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<PartitionState>(&json) {
        Ok(state) => {
            log::info!(
                "State loaded: block {}, date {}",
                state.block_index,
                state.last_block_date
            );
            Some(state)
        }
        Err(e) => {
            log::warn!("Malformed state file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save partition state to a JSON file
///
/// Writes the whole document to a sibling temp file and renames it into
/// place, so a crash mid-write cannot corrupt a previously-valid file.
pub fn save_state(state: &PartitionState, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(state)?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)?;
    fs::rename(&tmp_path, path)?;

    log::debug!(
        "Saved state to {}: block {}, date {}",
        path.display(),
        state.block_index,
        state.last_block_date
    );
    Ok(())
}
