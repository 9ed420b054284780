//! Destroyed-bush bookkeeping.
//!
//! Two systems bridge the host's events and the persisted record
//! collection: one records a bush when the player chops it down, one
//! drains records whose regrow delay has elapsed and announces them for
//! the host-facing layer to respawn. Neither touches live game objects.

use bevy::prelude::*;

use crate::config::ModConfig;
use crate::shared::*;

pub struct BushesPlugin;

impl Plugin for BushesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModSaveData>()
            .init_resource::<CurrentDate>()
            .add_event::<BushDestroyedEvent>()
            .add_event::<DayStartedEvent>()
            .add_event::<BushRespawnEvent>()
            .add_systems(
                Update,
                (record_destroyed_bushes, respawn_due_bushes),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DESTRUCTION
// ═══════════════════════════════════════════════════════════════════════

/// Snapshots each destroyed bush into the save data, stamped with the
/// current in-game date. Destruction at locations the config does not
/// allow is ignored; an empty location name is rejected because the
/// record could never be resolved on respawn.
pub fn record_destroyed_bushes(
    mut destroyed_events: EventReader<BushDestroyedEvent>,
    mut data: ResMut<ModSaveData>,
    config: Res<ModConfig>,
    current_date: Res<CurrentDate>,
) {
    for event in destroyed_events.read() {
        if event.location_name.is_empty() {
            warn!("[Bushes] Ignoring destroyed bush with empty location name");
            continue;
        }
        if !config.bushes_destroyable_at(&event.location_name) {
            continue;
        }

        let bush = DestroyedBush::new(
            event.location_name.clone(),
            event.tile,
            event.size,
            current_date.0,
        )
        .with_town_bush(event.town_bush)
        .with_tilesheet_offset(event.tilesheet_offset);

        info!(
            "[Bushes] Recorded destroyed bush at {} {} (size {}) on {}",
            bush.location_name, bush.tile, bush.size, current_date.0
        );
        data.add_record(bush);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESPAWN
// ═══════════════════════════════════════════════════════════════════════

/// On each new day, removes every record whose regrow delay has elapsed
/// and emits a [`BushRespawnEvent`] for it. With no configured delay,
/// destroyed bushes stay destroyed.
pub fn respawn_due_bushes(
    mut day_events: EventReader<DayStartedEvent>,
    mut respawn_writer: EventWriter<BushRespawnEvent>,
    mut data: ResMut<ModSaveData>,
    mut current_date: ResMut<CurrentDate>,
    config: Res<ModConfig>,
) {
    for event in day_events.read() {
        current_date.0 = event.date;

        let Some(delay_days) = config.regrow_delay_days() else {
            continue;
        };

        let today = event.date.total_days();
        let (due, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut data.destroyed_bushes)
            .into_iter()
            .partition(|bush| regrow_due(bush, today, delay_days));
        data.destroyed_bushes = kept;

        for bush in due {
            info!(
                "[Bushes] Respawning bush at {} {} (destroyed {} day(s) ago or more)",
                bush.location_name, bush.tile, delay_days
            );
            respawn_writer.send(BushRespawnEvent { bush });
        }
    }
}

/// Whether a record's regrow delay has elapsed as of `today` (a date
/// ordinal). Records whose stored date no longer recomposes are kept and
/// reported rather than respawned on bad data.
fn regrow_due(bush: &DestroyedBush, today: u32, delay_days: u32) -> bool {
    match bush.date_destroyed() {
        Ok(destroyed) => destroyed.total_days().saturating_add(delay_days) <= today,
        Err(e) => {
            warn!(
                "[Bushes] Record at {} {} has an invalid destruction date ({}); keeping it",
                bush.location_name, bush.tile, e
            );
            false
        }
    }
}
