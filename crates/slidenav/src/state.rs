//! Resume state, stored per deck under the user's data directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::deck::PreviousState;

const APP_DIR: &str = "slidenav";
const STATE_DIR: &str = "state";

/// `<data_dir>/slidenav/state/<deck-stem>.yaml`
pub fn path_for(deck: &Path) -> Result<PathBuf> {
    let stem = deck
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("Deck path has no file name: {}", deck.display()))?;
    dirs::data_dir()
        .map(|d| d.join(APP_DIR).join(STATE_DIR).join(format!("{stem}.yaml")))
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

pub fn load(deck: &Path) -> Result<Option<PreviousState>> {
    load_from(&path_for(deck)?)
}

pub fn load_from(path: &Path) -> Result<Option<PreviousState>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let state = serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid resume state in {}", path.display()))?;
            Ok(Some(state))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

pub fn save(deck: &Path, state: &PreviousState) -> Result<PathBuf> {
    let path = path_for(deck)?;
    save_to(&path, state)?;
    Ok(path)
}

pub fn save_to(path: &Path, state: &PreviousState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(state)?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved resume state");
    Ok(())
}

/// Drop a stored state that no longer fits the deck, e.g. after slides were removed.
pub fn fit(state: PreviousState, slide_count: usize) -> Option<PreviousState> {
    match state.progress {
        Some(progress) if progress >= slide_count => {
            tracing::warn!(progress, slide_count, "discarding stale resume state");
            None
        }
        _ => Some(state),
    }
}
