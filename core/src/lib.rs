#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Commander sandbox.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`UnitView`], and respond exclusively with new command
//! batches.
//!
//! Static configuration lives here as well: the [`Roster`] of commander
//! archetypes, the movement [`Tuning`] and the spawn [`Layout`]. All three are
//! plain values injected at start-up so independent sessions never share
//! state.

use std::{collections::HashSet, fmt, str::FromStr};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the sandbox boots.
pub const WELCOME_BANNER: &str = "Commanders ready. Left-click selects, right-click moves.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Spawns one unit per roster archetype, in declaration order.
    SpawnRoster {
        /// Placement rule evaluated with each unit's spawn index.
        layout: Layout,
    },
    /// Selects the unit with the provided identifier, clearing every other flag.
    Select {
        /// Identifier of the unit to select.
        unit: UnitId,
    },
    /// Clears the selection flag on every unit.
    DeselectAll,
    /// Assigns a new destination to the currently selected unit.
    CommandTarget {
        /// Ground-plane destination the unit should travel toward.
        destination: Vec2,
    },
    /// Advances the simulation by one discrete step.
    Tick,
    /// Moves a unit to a new position computed by the movement integrator.
    MoveUnit {
        /// Identifier of the unit being moved.
        unit: UnitId,
        /// Position the unit occupies after the step.
        position: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a unit was created from a roster archetype.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Archetype the unit was created from.
        archetype: ArchetypeId,
        /// Position assigned by the spawn layout.
        position: Vec2,
    },
    /// Announces that the selected unit changed.
    SelectionChanged {
        /// Unit that was selected before the change, if any.
        previous: Option<UnitId>,
        /// Unit that is selected after the change, if any.
        current: Option<UnitId>,
    },
    /// Confirms that a unit received a new destination.
    TargetAssigned {
        /// Identifier of the commanded unit.
        unit: UnitId,
        /// Destination assigned to the unit.
        target: Vec2,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just started, counting from one.
        tick: u64,
    },
    /// Confirms that a unit changed position.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Position before the step.
        from: Vec2,
        /// Position after the step.
        to: Vec2,
    },
}

/// Unique identifier assigned to a spawned unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique key naming a roster archetype, e.g. `MURAT`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(String);

impl ArchetypeId {
    /// Creates a new archetype identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display colour assigned to an archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl UnitColor {
    /// Creates a new unit color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a CSS-style `#rrggbb` string.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(value.to_owned()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::InvalidLength(value.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::InvalidDigit(value.to_owned()))
        };

        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl FromStr for UnitColor {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

impl fmt::Display for UnitColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Reasons a colour string could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The value does not start with `#`.
    #[error("colour `{0}` must start with `#`")]
    MissingHash(String),
    /// The value does not contain exactly six hexadecimal digits.
    #[error("colour `{0}` must contain exactly six hexadecimal digits")]
    InvalidLength(String),
    /// The value contains a non-hexadecimal digit.
    #[error("colour `{0}` contains a non-hexadecimal digit")]
    InvalidDigit(String),
}

/// Immutable template describing one kind of commander.
#[derive(Clone, Debug, PartialEq)]
pub struct Archetype {
    id: ArchetypeId,
    display_name: String,
    color: UnitColor,
    speed_multiplier: f32,
    description: String,
}

impl Archetype {
    /// Creates a new archetype. Values are validated when assembled into a [`Roster`].
    #[must_use]
    pub fn new(
        id: ArchetypeId,
        display_name: impl Into<String>,
        color: UnitColor,
        speed_multiplier: f32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            color,
            speed_multiplier,
            description: description.into(),
        }
    }

    /// Unique key of the archetype.
    #[must_use]
    pub fn id(&self) -> &ArchetypeId {
        &self.id
    }

    /// Human-readable name shown in labels and panels.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Colour used to draw units of this archetype.
    #[must_use]
    pub const fn color(&self) -> UnitColor {
        self.color
    }

    /// Factor applied to the tuning's base speed.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Descriptive text shown in the selection panel.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered, validated collection of archetypes.
///
/// Declaration order doubles as spawn order.
#[derive(Clone, Debug, PartialEq)]
pub struct Roster {
    archetypes: Vec<Archetype>,
}

impl Roster {
    /// Assembles a roster, rejecting empty sets, duplicate ids and unusable speeds.
    pub fn new(archetypes: Vec<Archetype>) -> Result<Self, RosterError> {
        if archetypes.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut seen = HashSet::with_capacity(archetypes.len());
        for archetype in &archetypes {
            if !seen.insert(archetype.id()) {
                return Err(RosterError::DuplicateArchetype {
                    id: archetype.id().clone(),
                });
            }

            let multiplier = archetype.speed_multiplier();
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(RosterError::InvalidSpeedMultiplier {
                    id: archetype.id().clone(),
                    multiplier,
                });
            }
        }

        Ok(Self { archetypes })
    }

    /// The six built-in commanders.
    #[must_use]
    pub fn commanders() -> Self {
        let commander = |id: &str, name: &str, color: UnitColor, speed: f32, skill: &str| {
            Archetype::new(ArchetypeId::new(id), name, color, speed, skill)
        };

        Self {
            archetypes: vec![
                commander(
                    "MURAT",
                    "Murat",
                    UnitColor::from_rgb(0xef, 0x44, 0x44),
                    1.0,
                    "Piyade Ustası",
                ),
                commander(
                    "CANSU",
                    "Cansu",
                    UnitColor::from_rgb(0xec, 0x48, 0x99),
                    1.8,
                    "Hızlı Akıncı",
                ),
                commander(
                    "GOKDENIZ",
                    "Gökdeniz",
                    UnitColor::from_rgb(0x3b, 0x82, 0xf6),
                    0.8,
                    "Kuşatma Uzmanı",
                ),
                commander(
                    "SERIFE",
                    "Şerife",
                    UnitColor::from_rgb(0x10, 0xb9, 0x81),
                    1.2,
                    "Bilge Savunucu",
                ),
                commander(
                    "CAN",
                    "Can",
                    UnitColor::from_rgb(0xf5, 0x9e, 0x0b),
                    1.4,
                    "Altın Lider",
                ),
                commander(
                    "SAHILIN",
                    "Sahilin",
                    UnitColor::from_rgb(0x8b, 0x5c, 0xf6),
                    1.6,
                    "Mistik Gözcü",
                ),
            ],
        }
    }

    /// Archetypes in declaration order.
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Looks up an archetype by id.
    #[must_use]
    pub fn get(&self, id: &ArchetypeId) -> Option<&Archetype> {
        self.archetypes.iter().find(|archetype| archetype.id() == id)
    }

    /// Number of archetypes in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Always `false` for a constructed roster; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

/// Reasons a roster could not be assembled.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RosterError {
    /// The roster must contain at least one archetype.
    #[error("roster contains no archetypes")]
    Empty,
    /// Two archetypes share an id.
    #[error("archetype `{id}` is declared more than once")]
    DuplicateArchetype {
        /// Id that appeared twice.
        id: ArchetypeId,
    },
    /// A speed multiplier is zero, negative or not finite.
    #[error("archetype `{id}` has unusable speed multiplier {multiplier}")]
    InvalidSpeedMultiplier {
        /// Archetype carrying the invalid value.
        id: ArchetypeId,
        /// Offending multiplier.
        multiplier: f32,
    },
}

/// Movement constants shared by every unit in a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    base_speed: f32,
    arrival_threshold: f32,
}

impl Tuning {
    /// Values used by the flat canvas sandbox, measured in pixels per tick.
    pub const CANVAS: Self = Self {
        base_speed: 3.0,
        arrival_threshold: 2.0,
    };

    /// Creates a validated tuning. Both values must be finite and positive.
    pub fn new(base_speed: f32, arrival_threshold: f32) -> Result<Self, TuningError> {
        if !base_speed.is_finite() || base_speed <= 0.0 {
            return Err(TuningError::InvalidBaseSpeed { value: base_speed });
        }
        if !arrival_threshold.is_finite() || arrival_threshold <= 0.0 {
            return Err(TuningError::InvalidArrivalThreshold {
                value: arrival_threshold,
            });
        }

        Ok(Self {
            base_speed,
            arrival_threshold,
        })
    }

    /// Distance travelled per tick by a unit with a multiplier of one.
    #[must_use]
    pub const fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Distance at or below which a unit counts as arrived.
    #[must_use]
    pub const fn arrival_threshold(&self) -> f32 {
        self.arrival_threshold
    }

    /// Per-tick step length for units of the provided archetype.
    #[must_use]
    pub fn speed_for(&self, archetype: &Archetype) -> f32 {
        self.base_speed * archetype.speed_multiplier()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::CANVAS
    }
}

/// Reasons a tuning could not be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum TuningError {
    /// Base speed must be finite and positive.
    #[error("base speed must be finite and positive (received {value})")]
    InvalidBaseSpeed {
        /// Rejected value.
        value: f32,
    },
    /// Arrival threshold must be finite and positive.
    #[error("arrival threshold must be finite and positive (received {value})")]
    InvalidArrivalThreshold {
        /// Rejected value.
        value: f32,
    },
}

/// Deterministic placement rule mapping a spawn index to a ground position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Units are evenly spaced along a line.
    Line {
        /// Position of the first unit.
        origin: Vec2,
        /// Offset between consecutive units.
        spacing: Vec2,
    },
    /// Units fill rows of `columns` entries, left to right then top to bottom.
    Grid {
        /// Position of the first unit.
        origin: Vec2,
        /// Offset between neighbouring columns (x) and rows (y).
        spacing: Vec2,
        /// Number of units per row. Zero is treated as one.
        columns: u32,
    },
}

impl Layout {
    /// Row of units used by the flat canvas sandbox.
    pub const CANVAS: Self = Self::Line {
        origin: Vec2::new(150.0, 300.0),
        spacing: Vec2::new(100.0, 0.0),
    };

    /// Position assigned to the unit spawned at `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> Vec2 {
        match *self {
            Self::Line { origin, spacing } => origin + spacing * index as f32,
            Self::Grid {
                origin,
                spacing,
                columns,
            } => {
                let columns = columns.max(1) as usize;
                let column = (index % columns) as f32;
                let row = (index / columns) as f32;
                origin + Vec2::new(spacing.x * column, spacing.y * row)
            }
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::CANVAS
    }
}

/// Pointer buttons that carry meaning for the sandbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left mouse button; selects.
    Primary,
    /// Usually the right mouse button; issues move orders.
    Secondary,
}

/// Outcome of resolving a pointer position against the rendered scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickResult {
    /// The pointer landed on a unit.
    Unit {
        /// Unit under the pointer.
        unit: UnitId,
    },
    /// The pointer landed on the ground plane.
    Ground {
        /// World-space point under the pointer.
        point: Vec2,
    },
    /// The pointer is off the playable surface.
    None,
}

impl PickResult {
    /// Collapses a set of intersections into the nearest one.
    ///
    /// Hits with a negative or non-finite distance are ignored; ties keep the
    /// hit reported first.
    #[must_use]
    pub fn nearest<I>(hits: I) -> Self
    where
        I: IntoIterator<Item = PickHit>,
    {
        let mut best: Option<PickHit> = None;
        for hit in hits {
            if !hit.distance.is_finite() || hit.distance < 0.0 {
                continue;
            }
            match best {
                Some(current) if current.distance <= hit.distance => {}
                _ => best = Some(hit),
            }
        }
        best.map_or(Self::None, |hit| hit.pick)
    }
}

/// Single intersection reported by a picking service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    distance: f32,
    pick: PickResult,
}

impl PickHit {
    /// Intersection with a unit at the provided distance from the viewer.
    #[must_use]
    pub const fn unit(unit: UnitId, distance: f32) -> Self {
        Self {
            distance,
            pick: PickResult::Unit { unit },
        }
    }

    /// Intersection with the ground plane at the provided distance from the viewer.
    #[must_use]
    pub const fn ground(point: Vec2, distance: f32) -> Self {
        Self {
            distance,
            pick: PickResult::Ground { point },
        }
    }

    /// Distance between the viewer and the intersection.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Pick described by the intersection.
    #[must_use]
    pub const fn pick(&self) -> PickResult {
        self.pick
    }
}

/// One discrete pointer-button press paired with its resolved pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Button that was pressed.
    pub button: PointerButton,
    /// What the pointer landed on.
    pub pick: PickResult,
}

impl PointerInput {
    /// Creates a new pointer input descriptor.
    #[must_use]
    pub const fn new(button: PointerButton, pick: PickResult) -> Self {
        Self { button, pick }
    }
}

/// Immutable representation of a single unit used for queries and rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Archetype the unit was spawned from.
    pub archetype: ArchetypeId,
    /// Display name inherited from the archetype.
    pub display_name: String,
    /// Colour inherited from the archetype.
    pub color: UnitColor,
    /// Current ground-plane position.
    pub position: Vec2,
    /// Commanded destination.
    pub target: Vec2,
    /// Distance travelled per tick while approaching the target.
    pub base_speed: f32,
    /// Whether the unit is the current selection.
    pub selected: bool,
}

impl UnitSnapshot {
    /// Straight-line distance between the unit and its target.
    #[must_use]
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Read-only snapshot describing every unit in spawn order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the unit with the provided identifier.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == unit)
    }

    /// Snapshot of the selected unit, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.selected)
    }

    /// Number of units captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Details about the selected unit that a UI panel presents.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionDetails {
    /// Selected unit.
    pub unit: UnitId,
    /// Display name of the unit's archetype.
    pub display_name: String,
    /// Colour of the unit's archetype.
    pub color: UnitColor,
    /// Descriptive text of the unit's archetype.
    pub description: String,
    /// Speed multiplier of the unit's archetype.
    pub speed_multiplier: f32,
}

/// Commands that are illegal in the world's current lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum InvalidStateError {
    /// The roster was already spawned for this session.
    #[error("the unit roster has already been spawned")]
    AlreadySpawned,
    /// The command requires spawned units.
    #[error("the unit roster has not been spawned yet")]
    NotSpawned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_layout_spaces_units_evenly() {
        let layout = Layout::Line {
            origin: Vec2::new(-10.0, 0.0),
            spacing: Vec2::new(4.0, 0.0),
        };

        assert_eq!(layout.position(0), Vec2::new(-10.0, 0.0));
        assert_eq!(layout.position(3), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn grid_layout_wraps_rows() {
        let layout = Layout::Grid {
            origin: Vec2::ZERO,
            spacing: Vec2::new(10.0, 20.0),
            columns: 3,
        };

        assert_eq!(layout.position(2), Vec2::new(20.0, 0.0));
        assert_eq!(layout.position(4), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn grid_layout_treats_zero_columns_as_single_column() {
        let layout = Layout::Grid {
            origin: Vec2::ZERO,
            spacing: Vec2::new(10.0, 20.0),
            columns: 0,
        };

        assert_eq!(layout.position(2), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn canvas_layout_matches_sandbox_row() {
        assert_eq!(Layout::CANVAS.position(0), Vec2::new(150.0, 300.0));
        assert_eq!(Layout::CANVAS.position(5), Vec2::new(650.0, 300.0));
    }

    #[test]
    fn color_parses_css_hex() {
        let color = UnitColor::from_hex("#3b82f6").expect("valid colour");
        assert_eq!(color, UnitColor::from_rgb(0x3b, 0x82, 0xf6));
        assert_eq!(color.to_string(), "#3b82f6");
    }

    #[test]
    fn color_rejects_malformed_values() {
        assert!(matches!(
            UnitColor::from_hex("3b82f6"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            UnitColor::from_hex("#3b82f"),
            Err(ColorParseError::InvalidLength(_))
        ));
        assert!(matches!(
            UnitColor::from_hex("#3b82fg"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            UnitColor::from_hex("#ğ82f6"),
            Err(ColorParseError::InvalidLength(_))
        ));
    }

    #[test]
    fn commanders_roster_preserves_declaration_order() {
        let roster = Roster::commanders();
        let ids: Vec<_> = roster
            .archetypes()
            .iter()
            .map(|archetype| archetype.id().as_str())
            .collect();

        assert_eq!(
            ids,
            ["MURAT", "CANSU", "GOKDENIZ", "SERIFE", "CAN", "SAHILIN"]
        );
        assert_eq!(
            Roster::new(roster.archetypes().to_vec()).as_ref(),
            Ok(&roster)
        );
    }

    #[test]
    fn roster_rejects_duplicate_ids() {
        let archetype = Archetype::new(
            ArchetypeId::new("ALPHA"),
            "Alpha",
            UnitColor::from_rgb(1, 2, 3),
            1.0,
            "",
        );

        let error = Roster::new(vec![archetype.clone(), archetype]).expect_err("duplicate");
        assert_eq!(
            error,
            RosterError::DuplicateArchetype {
                id: ArchetypeId::new("ALPHA")
            }
        );
    }

    #[test]
    fn roster_rejects_empty_and_non_positive_speeds() {
        assert_eq!(Roster::new(Vec::new()), Err(RosterError::Empty));

        let stalled = Archetype::new(
            ArchetypeId::new("STALLED"),
            "Stalled",
            UnitColor::from_rgb(0, 0, 0),
            0.0,
            "",
        );
        assert!(matches!(
            Roster::new(vec![stalled]),
            Err(RosterError::InvalidSpeedMultiplier { .. })
        ));
    }

    #[test]
    fn tuning_requires_positive_threshold_and_speed() {
        assert!(Tuning::new(0.2, 0.1).is_ok());
        assert_eq!(
            Tuning::new(0.2, 0.0),
            Err(TuningError::InvalidArrivalThreshold { value: 0.0 })
        );
        assert!(matches!(
            Tuning::new(f32::NAN, 0.1),
            Err(TuningError::InvalidBaseSpeed { .. })
        ));
    }

    #[test]
    fn tuning_scales_speed_by_archetype_multiplier() {
        let roster = Roster::commanders();
        let cansu = roster
            .get(&ArchetypeId::new("CANSU"))
            .expect("cansu present");

        assert!((Tuning::CANVAS.speed_for(cansu) - 5.4).abs() < 1e-5);
    }

    #[test]
    fn nearest_pick_prefers_closest_intersection() {
        let hits = [
            PickHit::ground(Vec2::new(4.0, 2.0), 12.0),
            PickHit::unit(UnitId::new(3), 7.5),
        ];

        assert_eq!(
            PickResult::nearest(hits),
            PickResult::Unit {
                unit: UnitId::new(3)
            }
        );
    }

    #[test]
    fn nearest_pick_keeps_first_hit_on_ties_and_skips_invalid_distances() {
        let hits = [
            PickHit::unit(UnitId::new(9), f32::NAN),
            PickHit::unit(UnitId::new(1), 5.0),
            PickHit::unit(UnitId::new(2), 5.0),
            PickHit::ground(Vec2::ZERO, -1.0),
        ];

        assert_eq!(
            PickResult::nearest(hits),
            PickResult::Unit {
                unit: UnitId::new(1)
            }
        );
        assert_eq!(PickResult::nearest(Vec::<PickHit>::new()), PickResult::None);
    }

    #[test]
    fn unit_view_sorts_snapshots_by_id() {
        let snapshot = |id: u32, selected: bool| UnitSnapshot {
            id: UnitId::new(id),
            archetype: ArchetypeId::new(format!("A{id}")),
            display_name: format!("Unit {id}"),
            color: UnitColor::from_rgb(0, 0, 0),
            position: Vec2::ZERO,
            target: Vec2::new(3.0, 4.0),
            base_speed: 1.0,
            selected,
        };

        let view = UnitView::from_snapshots(vec![snapshot(2, false), snapshot(0, true)]);
        let ids: Vec<_> = view.iter().map(|unit| unit.id.get()).collect();

        assert_eq!(ids, [0, 2]);
        assert_eq!(view.selected().map(|unit| unit.id), Some(UnitId::new(0)));
        let distance = view
            .iter()
            .next()
            .map_or(0.0, UnitSnapshot::distance_to_target);
        assert!((distance - 5.0).abs() < 1e-6);
    }
}
