//! Persistence wiring for the destroyed-bush records.
//!
//! The save file is the externally observable contract: a single JSON
//! object with a `DestroyedBushes` array (see the serde names on
//! [`ModSaveData`] and [`DestroyedBush`](crate::shared::DestroyedBush)).
//! Reads and writes go through an explicit path so tests and embedders
//! never touch the real file.

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const DATA_FILE_NAME: &str = "destroyed-bushes.json";

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by the host-facing glue (or the autosave below) to persist the
/// current record collection.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveRequestEvent;

/// Sent after a save attempt completes.
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Where the mod's data file lives. Defaults to a `data/` directory next
/// to the executable.
#[derive(Resource, Debug, Clone)]
pub struct SaveDataPath(pub PathBuf);

impl Default for SaveDataPath {
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self(exe_dir.join("data").join(DATA_FILE_NAME))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILE I/O
// ═══════════════════════════════════════════════════════════════════════

/// Reads the record collection from disk. A missing file is a fresh
/// start (empty data); a file that exists but does not parse is an error,
/// so a corrupt save fails the load instead of fabricating partial
/// records.
pub fn read_mod_data(path: &Path) -> Result<ModSaveData, String> {
    if !path.exists() {
        return Ok(ModSaveData::default());
    }
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))
}

/// Writes the record collection to disk, creating the parent directory if
/// needed. Writes to a temp file first, then renames for atomicity.
pub fn write_mod_data(path: &Path, data: &ModSaveData) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Could not create {}: {}", parent.display(), e))?;
        }
    }

    let json =
        serde_json::to_string_pretty(data).map_err(|e| format!("Serialization failed: {}", e))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveDataPath>()
            .add_event::<SaveRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_systems(Startup, load_mod_data)
            .add_systems(Update, (autosave_on_day_started, handle_save_request));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Startup system: loads persisted records into the [`ModSaveData`]
/// resource. On a corrupt file the in-memory data stays empty and the
/// file on disk is left as-is for manual recovery.
pub fn load_mod_data(path: Res<SaveDataPath>, mut data: ResMut<ModSaveData>) {
    match read_mod_data(&path.0) {
        Ok(loaded) => {
            if !loaded.is_empty() {
                info!(
                    "[Save] Loaded {} destroyed bush record(s) from {}",
                    loaded.len(),
                    path.0.display()
                );
            }
            *data = loaded;
        }
        Err(e) => {
            error!(
                "[Save] Could not load {}: {}. Starting with no records; the file was not modified.",
                path.0.display(),
                e
            );
        }
    }
}

/// Relays each new in-game day into a save request, mirroring the host's
/// save-on-day-change cadence. Runs after the respawn system so the day's
/// removals are persisted.
pub fn autosave_on_day_started(
    mut day_events: EventReader<DayStartedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
) {
    for event in day_events.read() {
        info!("[Save] Autosaving for {}", event.date);
        save_writer.send(SaveRequestEvent);
    }
}

pub fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_writer: EventWriter<SaveCompleteEvent>,
    path: Res<SaveDataPath>,
    data: Res<ModSaveData>,
) {
    // Collapse multiple requests in one frame into a single write.
    if save_events.is_empty() {
        return;
    }
    save_events.clear();

    match write_mod_data(&path.0, &data) {
        Ok(()) => {
            info!(
                "[Save] Wrote {} record(s) to {}",
                data.len(),
                path.0.display()
            );
            complete_writer.send(SaveCompleteEvent {
                success: true,
                error_message: None,
            });
        }
        Err(e) => {
            warn!("[Save] Save FAILED: {}", e);
            complete_writer.send(SaveCompleteEvent {
                success: false,
                error_message: Some(e),
            });
        }
    }
}
