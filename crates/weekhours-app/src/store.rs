//! JSON file holding the editor state between invocations.

use std::fs;
use std::path::Path;

use anyhow::Context;
use weekhours_core::{EditorState, WeeklySchedule};

/// Loads state, starting from a closed week if the file does not exist.
pub fn load_state(path: &Path) -> anyhow::Result<EditorState> {
    if !path.exists() {
        tracing::info!("No schedule at {:?}, starting with a closed week", path);
        return Ok(EditorState::new(WeeklySchedule::closed()));
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule {}", path.display()))?;
    EditorState::from_json(&raw).with_context(|| format!("invalid schedule {}", path.display()))
}

/// Writes state, creating parent directories as needed.
pub fn save_state(path: &Path, state: &EditorState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, state.to_json()?)
        .with_context(|| format!("failed to write schedule {}", path.display()))?;
    tracing::debug!("Saved schedule to {:?}", path);
    Ok(())
}
