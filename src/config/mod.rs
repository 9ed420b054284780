//! User-facing mod settings.
//!
//! Read from a `config.json` next to the executable. A missing file gets
//! the defaults written out for the player to edit; a malformed file warns
//! and falls back to defaults rather than refusing to start.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::{DAYS_PER_SEASON, DAYS_PER_YEAR};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Settings controlling which bushes may be destroyed and when destroyed
/// bushes regrow. Field names match the published config schema.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModConfig {
    /// When true, every location's bushes are destroyable and the
    /// location list below is ignored.
    #[serde(rename = "AllBushesAreDestroyable")]
    pub all_bushes_are_destroyable: bool,
    /// Location names whose bushes may be destroyed. Matched
    /// case-insensitively.
    #[serde(rename = "DestroyableBushLocations")]
    pub destroyable_bush_locations: Vec<String>,
    /// How long destroyed bushes take to regrow, e.g. `"3 days"`,
    /// `"1 season"`, `"2 years"`. `null` means they never regrow.
    #[serde(rename = "WhenBushesRegrow")]
    pub when_bushes_regrow: Option<String>,
}

impl Default for ModConfig {
    fn default() -> Self {
        Self {
            all_bushes_are_destroyable: false,
            destroyable_bush_locations: vec!["Farm".to_string()],
            when_bushes_regrow: Some("3 days".to_string()),
        }
    }
}

impl ModConfig {
    /// Whether bushes at the named location may be destroyed.
    pub fn bushes_destroyable_at(&self, location_name: &str) -> bool {
        self.all_bushes_are_destroyable
            || self
                .destroyable_bush_locations
                .iter()
                .any(|l| l.eq_ignore_ascii_case(location_name))
    }

    /// The configured regrow delay in in-game days. `None` means bushes
    /// never regrow, either by configuration or because the setting could
    /// not be parsed (reported by the config loader at startup).
    pub fn regrow_delay_days(&self) -> Option<u32> {
        let raw = self.when_bushes_regrow.as_deref()?;
        parse_regrow_delay(raw).ok()
    }
}

/// Parses a regrow-delay setting of the form `<amount> <unit>` into a
/// number of in-game days. Units: day(s), season(s), year(s).
pub fn parse_regrow_delay(raw: &str) -> Result<u32, String> {
    let mut parts = raw.split_whitespace();

    let amount: u32 = parts
        .next()
        .ok_or_else(|| "empty regrow delay".to_string())?
        .parse()
        .map_err(|_| format!("invalid regrow amount in {:?}", raw))?;

    let days_per_unit = match parts.next().unwrap_or("days").to_ascii_lowercase().as_str() {
        "day" | "days" => 1,
        "season" | "seasons" => DAYS_PER_SEASON as u32,
        "year" | "years" => DAYS_PER_YEAR,
        other => return Err(format!("unrecognized regrow unit {:?}", other)),
    };

    if parts.next().is_some() {
        return Err(format!("trailing text in regrow delay {:?}", raw));
    }

    amount
        .checked_mul(days_per_unit)
        .ok_or_else(|| format!("regrow delay {:?} overflows", raw))
}

// ═══════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════

/// Where the config file lives. Only used by the startup system; tests
/// and embedders call [`read_config`] with an explicit path.
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub PathBuf);

impl Default for ConfigPath {
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self(exe_dir.join(CONFIG_FILE_NAME))
    }
}

/// Reads the config file. A missing file is `Ok(None)` so the caller can
/// distinguish "write out defaults" from a genuine parse failure.
pub fn read_config(path: &Path) -> Result<Option<ModConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let config: ModConfig =
        serde_json::from_str(&json).map_err(|e| format!("Invalid config: {}", e))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ModConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Serialization failed: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Write failed for {}: {}", path.display(), e))
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigPath>()
            .init_resource::<ModConfig>()
            .add_systems(Startup, load_config);
    }
}

/// Startup system: loads config.json, writes the defaults if the file is
/// missing, and warns (keeping defaults) if it is malformed.
pub fn load_config(path: Res<ConfigPath>, mut config: ResMut<ModConfig>) {
    match read_config(&path.0) {
        Ok(Some(loaded)) => {
            // Surface a bad regrow setting once at startup; a silent None
            // here would read as "never regrow" with no explanation.
            if let Some(raw) = loaded.when_bushes_regrow.as_deref() {
                if let Err(e) = parse_regrow_delay(raw) {
                    warn!("[Config] WhenBushesRegrow ignored ({}); bushes will not regrow", e);
                }
            }
            info!(
                "[Config] Loaded {} ({} destroyable location(s))",
                path.0.display(),
                loaded.destroyable_bush_locations.len()
            );
            *config = loaded;
        }
        Ok(None) => {
            if let Err(e) = write_config(&path.0, &config) {
                warn!("[Config] Could not write default config: {}", e);
            } else {
                info!("[Config] Wrote default config to {}", path.0.display());
            }
        }
        Err(e) => {
            warn!("[Config] {}; using defaults", e);
            *config = ModConfig::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regrow_delay_units() {
        assert_eq!(parse_regrow_delay("3 days").unwrap(), 3);
        assert_eq!(parse_regrow_delay("1 day").unwrap(), 1);
        assert_eq!(parse_regrow_delay("1 season").unwrap(), 28);
        assert_eq!(parse_regrow_delay("2 Seasons").unwrap(), 56);
        assert_eq!(parse_regrow_delay("2 years").unwrap(), 224);
        // Bare number defaults to days.
        assert_eq!(parse_regrow_delay("5").unwrap(), 5);
    }

    #[test]
    fn test_parse_regrow_delay_rejects_malformed() {
        assert!(parse_regrow_delay("").is_err());
        assert!(parse_regrow_delay("three days").is_err());
        assert!(parse_regrow_delay("3 fortnights").is_err());
        assert!(parse_regrow_delay("3 days extra").is_err());
        assert!(parse_regrow_delay("-3 days").is_err());
    }

    #[test]
    fn test_destroyable_location_matching() {
        let config = ModConfig::default();
        assert!(config.bushes_destroyable_at("Farm"));
        assert!(config.bushes_destroyable_at("farm"));
        assert!(!config.bushes_destroyable_at("Town"));

        let mut open = config.clone();
        open.all_bushes_are_destroyable = true;
        assert!(open.bushes_destroyable_at("Town"));
        assert!(open.bushes_destroyable_at("anywhere at all"));
    }

    #[test]
    fn test_regrow_delay_days_accessor() {
        let mut config = ModConfig::default();
        assert_eq!(config.regrow_delay_days(), Some(3));

        config.when_bushes_regrow = None;
        assert_eq!(config.regrow_delay_days(), None);

        config.when_bushes_regrow = Some("1 year".to_string());
        assert_eq!(config.regrow_delay_days(), Some(112));

        // Unparseable settings act as "never regrow".
        config.when_bushes_regrow = Some("sometime".to_string());
        assert_eq!(config.regrow_delay_days(), None);
    }

    #[test]
    fn test_config_serde_field_names_and_defaults() {
        let value = serde_json::to_value(ModConfig::default()).unwrap();
        let expected = serde_json::json!({
            "AllBushesAreDestroyable": false,
            "DestroyableBushLocations": ["Farm"],
            "WhenBushesRegrow": "3 days"
        });
        assert_eq!(value, expected);

        // Missing fields fall back to defaults (forward compatibility).
        let partial: ModConfig =
            serde_json::from_str(r#"{"AllBushesAreDestroyable": true}"#).unwrap();
        assert!(partial.all_bushes_are_destroyable);
        assert_eq!(partial.destroyable_bush_locations, vec!["Farm".to_string()]);
        assert_eq!(partial.when_bushes_regrow.as_deref(), Some("3 days"));
    }

    #[test]
    fn test_read_config_missing_and_malformed() {
        let dir = std::env::temp_dir().join("destroyable-bushes-config-test");
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("nope.json");
        assert_eq!(read_config(&missing).unwrap(), None);

        let malformed = dir.join("bad.json");
        fs::write(&malformed, "{ not json").unwrap();
        assert!(read_config(&malformed).is_err());

        let good = dir.join("good.json");
        write_config(&good, &ModConfig::default()).unwrap();
        assert_eq!(read_config(&good).unwrap(), Some(ModConfig::default()));

        fs::remove_dir_all(&dir).ok();
    }
}
