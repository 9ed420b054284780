//! Shared types for the destroyable-bushes mod core.
//!
//! This is the type contract. The domain modules (bushes, config, save)
//! import from here and never from each other directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

pub const DAYS_PER_SEASON: u8 = 28;
pub const DAYS_PER_YEAR: u32 = 112;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Fall => 2,
            Season::Winter => 3,
        }
    }

    /// The host game's lowercase season name, as stored in save data.
    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unrecognized season {:?}", other)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An in-game calendar date: day-of-month, season, year.
///
/// The host's calendar has exactly 28 days per season and 4 seasons per
/// year, starting at day 1 of spring, year 1. Construction validates the
/// components; out-of-range values are an error, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameDate {
    day: u8,
    season: Season,
    year: u32,
}

impl GameDate {
    pub fn new(day: u8, season: Season, year: u32) -> Result<Self, String> {
        if day == 0 || day > DAYS_PER_SEASON {
            return Err(format!(
                "invalid day {}: must be 1-{}",
                day, DAYS_PER_SEASON
            ));
        }
        if year == 0 {
            return Err("invalid year 0: years start at 1".to_string());
        }
        Ok(Self { day, season, year })
    }

    pub fn day(self) -> u8 {
        self.day
    }

    pub fn season(self) -> Season {
        self.season
    }

    pub fn year(self) -> u32 {
        self.year
    }

    /// Days elapsed since day 1 of spring, year 1. Used for date ordering
    /// and regrow-delay arithmetic.
    pub fn total_days(self) -> u32 {
        (self.year - 1) * DAYS_PER_YEAR
            + self.season.index() as u32 * DAYS_PER_SEASON as u32
            + (self.day as u32 - 1)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, year {}", self.season, self.day, self.year)
    }
}

/// Mirror of the host's in-game clock. Updated by the day-change glue;
/// read wherever a record needs a destruction date stamped on it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentDate(pub GameDate);

impl Default for CurrentDate {
    fn default() -> Self {
        Self(GameDate {
            day: 1,
            season: Season::Spring,
            year: 1,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TILES
// ═══════════════════════════════════════════════════════════════════════

/// An anchor tile position on a map.
///
/// Coordinates are integer-valued but stored as floats to match the host's
/// tile coordinate type, and serialize under the legacy `X`/`Y` names so
/// existing save data round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
}

impl Tile {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The tile `dx` columns to the right of this one.
    pub fn shifted(self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

impl From<Vec2> for Tile {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Tile> for Vec2 {
    fn from(t: Tile) -> Self {
        Vec2::new(t.x, t.y)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BUSH SIZE CLASSES
// ═══════════════════════════════════════════════════════════════════════

// The host game's size constants, mirrored verbatim. These are opaque ids
// owned by the host; save data stores the raw integer.
pub const SMALL_BUSH: i32 = 0;
pub const MEDIUM_BUSH: i32 = 1;
pub const LARGE_BUSH: i32 = 2;
pub const WALNUT_BUSH: i32 = 4;

/// The recognized bush footprint classes.
///
/// Medium and walnut bushes currently share the two-tile footprint but are
/// kept as separate variants; they differ in sprites and item production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BushSize {
    Small,
    Medium,
    Large,
    Walnut,
}

impl BushSize {
    /// Maps a raw host constant to a size class. Returns `None` for values
    /// this mod does not recognize.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            SMALL_BUSH => Some(BushSize::Small),
            MEDIUM_BUSH => Some(BushSize::Medium),
            LARGE_BUSH => Some(BushSize::Large),
            WALNUT_BUSH => Some(BushSize::Walnut),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            BushSize::Small => SMALL_BUSH,
            BushSize::Medium => MEDIUM_BUSH,
            BushSize::Large => LARGE_BUSH,
            BushSize::Walnut => WALNUT_BUSH,
        }
    }

    /// Width of the collision footprint in tiles.
    pub fn footprint_width(self) -> u32 {
        match self {
            BushSize::Small => 1,
            BushSize::Medium | BushSize::Walnut => 2,
            BushSize::Large => 3,
        }
    }

    /// Whether this class can carry a harvestable item (berries, walnuts).
    /// Town medium bushes are the exception; see
    /// [`DestroyedBush::respawn_tilesheet_offset`].
    pub fn produces_items(self) -> bool {
        matches!(self, BushSize::Medium | BushSize::Walnut)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DESTROYED BUSH RECORDS
// ═══════════════════════════════════════════════════════════════════════

/// Everything needed to respawn one destroyed bush: a snapshot taken at
/// destruction time, with no ties back to the live game object.
///
/// The serde names pin the legacy save schema. The destruction date is
/// stored as three primitive fields for serialization stability and
/// exposed as a composite [`GameDate`] at the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestroyedBush {
    #[serde(rename = "LocationName")]
    pub location_name: String,
    /// The bush's own anchor tile, never a player- or tool-relative one.
    #[serde(rename = "Tile")]
    pub tile: Tile,
    /// Raw host size constant; see [`BushSize::from_raw`].
    #[serde(rename = "Size")]
    pub size: i32,
    #[serde(rename = "TownBush", default)]
    pub town_bush: bool,
    /// `None` means the live object's tilesheet offset is left untouched
    /// on respawn.
    #[serde(rename = "TilesheetOffset", default)]
    pub tilesheet_offset: Option<i32>,
    day: u8,
    season: Season,
    year: u32,
}

impl DestroyedBush {
    /// Builds a record for a bush destroyed on the given date. The optional
    /// flags default off; set them with [`Self::with_town_bush`] and
    /// [`Self::with_tilesheet_offset`].
    pub fn new(
        location_name: impl Into<String>,
        tile: Tile,
        size: i32,
        destroyed_on: GameDate,
    ) -> Self {
        Self {
            location_name: location_name.into(),
            tile,
            size,
            town_bush: false,
            tilesheet_offset: None,
            day: destroyed_on.day(),
            season: destroyed_on.season(),
            year: destroyed_on.year(),
        }
    }

    pub fn with_town_bush(mut self, town_bush: bool) -> Self {
        self.town_bush = town_bush;
        self
    }

    pub fn with_tilesheet_offset(mut self, offset: Option<i32>) -> Self {
        self.tilesheet_offset = offset;
        self
    }

    /// Recomposes the stored day/season/year fields into a date. Fails if
    /// the stored components are out of range (possible with hand-edited
    /// save data); the error is propagated, not clamped.
    pub fn date_destroyed(&self) -> Result<GameDate, String> {
        GameDate::new(self.day, self.season, self.year)
    }

    /// Decomposes `date` into the three stored fields, overwriting them.
    pub fn set_date_destroyed(&mut self, date: GameDate) {
        self.day = date.day();
        self.season = date.season();
        self.year = date.year();
    }

    /// This bush's size class, or `None` if the raw constant is
    /// unrecognized.
    pub fn size_class(&self) -> Option<BushSize> {
        BushSize::from_raw(self.size)
    }

    /// Each tile that would be obstructed by this bush's collision box,
    /// left to right from the anchor tile.
    ///
    /// Lazy and restartable; nothing is collected up front, so per-frame
    /// callers iterating many records pay only for what they consume.
    /// An unrecognized size class falls back to the single-tile footprint.
    pub fn collision_tiles(&self) -> impl Iterator<Item = Tile> {
        let width = self
            .size_class()
            .map(BushSize::footprint_width)
            .unwrap_or(1);
        let anchor = self.tile;
        (0..width).map(move |dx| anchor.shifted(dx as f32))
    }

    /// The tilesheet offset to apply when respawning this bush, if any.
    ///
    /// Offsets are withheld for bushes capable of producing items so a
    /// respawned bush is never forced into a fruiting state. Town medium
    /// bushes grow no berries, so their offset passes through.
    pub fn respawn_tilesheet_offset(&self) -> Option<i32> {
        match self.size_class() {
            Some(BushSize::Medium) if self.town_bush => self.tilesheet_offset,
            Some(size) if size.produces_items() => None,
            _ => self.tilesheet_offset,
        }
    }
}

/// The unit of persisted mod state: every destroyed bush that has not yet
/// been respawned.
///
/// Insertion order carries no meaning (records are keyed by location name
/// plus tile) but is preserved for stable serialization.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModSaveData {
    #[serde(rename = "DestroyedBushes", default)]
    pub destroyed_bushes: Vec<DestroyedBush>,
}

impl ModSaveData {
    pub fn add_record(&mut self, bush: DestroyedBush) {
        self.destroyed_bushes.push(bush);
    }

    /// Removes and returns the first record matching the given location
    /// name and tile, if any. Callers are responsible for never creating
    /// duplicate records for the same bush.
    pub fn remove_record(&mut self, location_name: &str, tile: Tile) -> Option<DestroyedBush> {
        let index = self
            .destroyed_bushes
            .iter()
            .position(|b| b.location_name == location_name && b.tile == tile)?;
        Some(self.destroyed_bushes.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestroyedBush> {
        self.destroyed_bushes.iter()
    }

    pub fn len(&self) -> usize {
        self.destroyed_bushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed_bushes.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by the host-facing glue when a bush has been chopped down.
#[derive(Event, Debug, Clone)]
pub struct BushDestroyedEvent {
    pub location_name: String,
    /// The destroyed bush's own anchor tile.
    pub tile: Tile,
    /// Raw host size constant.
    pub size: i32,
    pub town_bush: bool,
    pub tilesheet_offset: Option<i32>,
}

/// Sent by the host-facing glue at the start of each in-game day.
#[derive(Event, Debug, Clone, Copy)]
pub struct DayStartedEvent {
    pub date: GameDate,
}

/// Sent when a destroyed bush's regrow delay has elapsed. The host-facing
/// layer recreates the live object from the carried record.
#[derive(Event, Debug, Clone)]
pub struct BushRespawnEvent {
    pub bush: DestroyedBush,
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
