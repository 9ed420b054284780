//! Destroyable Bushes — persistence core for a bush-destruction game mod.
//!
//! Lets players chop down decorative bushes and regrows them later. This
//! crate owns the record of what was destroyed and when: the
//! [`shared::DestroyedBush`] snapshot, its owning
//! [`shared::ModSaveData`] collection, the regrow scheduling, and the
//! save/config files. Spawning and despawning the live game objects is
//! the host-facing layer's job; it talks to this crate through the events
//! in [`shared`].

pub mod bushes;
pub mod config;
pub mod save;
pub mod shared;

use bevy::prelude::*;

/// Aggregates the whole mod core: config loading, destroyed-bush
/// bookkeeping, and save-data persistence.
pub struct DestroyableBushesPlugin;

impl Plugin for DestroyableBushesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((config::ConfigPlugin, bushes::BushesPlugin, save::SavePlugin));
    }
}
