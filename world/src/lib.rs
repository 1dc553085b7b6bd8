#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative unit store for the Commander sandbox.
//!
//! The world owns every spawned unit. It is mutated exclusively through
//! [`apply`], which executes one [`Command`] and appends the resulting
//! [`Event`] values, and it is observed through the read-only [`query`]
//! module. Selection is kept exclusive: after every command at most one unit
//! carries the selected flag.

use commander_core::{
    Archetype, Command, Event, InvalidStateError, Roster, Tuning, UnitId, WELCOME_BANNER,
};
use glam::Vec2;
use log::debug;

/// Represents the authoritative sandbox state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    roster: Roster,
    tuning: Tuning,
    units: Vec<Unit>,
    spawned: bool,
    tick_index: u64,
}

impl World {
    /// Creates an empty world bound to the provided roster and tuning.
    ///
    /// No units exist until [`Command::SpawnRoster`] is applied.
    #[must_use]
    pub fn new(roster: Roster, tuning: Tuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            roster,
            tuning,
            units: Vec::new(),
            spawned: false,
            tick_index: 0,
        }
    }

    fn ensure_spawned(&self) -> Result<(), InvalidStateError> {
        if self.spawned {
            Ok(())
        } else {
            Err(InvalidStateError::NotSpawned)
        }
    }

    fn selected_id(&self) -> Option<UnitId> {
        self.units.iter().find(|unit| unit.selected).map(|unit| unit.id)
    }

    fn unit_mut(&mut self, unit_id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == unit_id)
    }

    fn archetype_of(&self, unit: &Unit) -> Option<&Archetype> {
        self.roster.archetypes().get(unit.archetype_index)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Roster::commanders(), Tuning::default())
    }
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    archetype_index: usize,
    position: Vec2,
    target: Vec2,
    base_speed: f32,
    selected: bool,
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Selecting an unknown unit, commanding without a selection and moving an
/// unknown unit are silent no-ops. Spawning twice, or selecting, commanding
/// and moving before the roster was spawned, is rejected.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), InvalidStateError> {
    match command {
        Command::SpawnRoster { layout } => {
            spawn_with(world, |index| layout.position(index), out_events)?;
        }
        Command::Select { unit } => {
            world.ensure_spawned()?;
            if world.units.iter().all(|candidate| candidate.id != unit) {
                return Ok(());
            }

            let previous = world.selected_id();
            for candidate in &mut world.units {
                candidate.selected = candidate.id == unit;
            }

            if previous != Some(unit) {
                debug!("selected unit {}", unit.get());
                out_events.push(Event::SelectionChanged {
                    previous,
                    current: Some(unit),
                });
            }
        }
        Command::DeselectAll => {
            world.ensure_spawned()?;
            let previous = world.selected_id();
            for unit in &mut world.units {
                unit.selected = false;
            }

            if previous.is_some() {
                debug!("selection cleared");
                out_events.push(Event::SelectionChanged {
                    previous,
                    current: None,
                });
            }
        }
        Command::CommandTarget { destination } => {
            world.ensure_spawned()?;
            if let Some(unit) = world.units.iter_mut().find(|unit| unit.selected) {
                unit.target = destination;
                debug!(
                    "unit {} ordered to ({:.1}, {:.1})",
                    unit.id.get(),
                    destination.x,
                    destination.y
                );
                out_events.push(Event::TargetAssigned {
                    unit: unit.id,
                    target: destination,
                });
            }
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::MoveUnit { unit, position } => {
            world.ensure_spawned()?;
            if let Some(moving) = world.unit_mut(unit) {
                let from = moving.position;
                if from != position {
                    moving.position = position;
                    out_events.push(Event::UnitMoved {
                        unit,
                        from,
                        to: position,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Spawns one unit per roster archetype, placing unit `i` at `layout(i)`.
///
/// This is the closure form of [`Command::SpawnRoster`] for callers whose
/// placement rule is not expressible as a [`commander_core::Layout`]. The
/// roster may only be spawned once per world.
pub fn spawn_with<F>(
    world: &mut World,
    mut layout: F,
    out_events: &mut Vec<Event>,
) -> Result<(), InvalidStateError>
where
    F: FnMut(usize) -> Vec2,
{
    if world.spawned {
        return Err(InvalidStateError::AlreadySpawned);
    }

    let tuning = world.tuning;
    let mut units = Vec::with_capacity(world.roster.len());
    for (index, archetype) in world.roster.archetypes().iter().enumerate() {
        let Ok(raw_id) = u32::try_from(index) else {
            break;
        };
        let position = layout(index);
        let unit = Unit {
            id: UnitId::new(raw_id),
            archetype_index: index,
            position,
            target: position,
            base_speed: tuning.speed_for(archetype),
            selected: false,
        };
        debug!(
            "spawned {} as unit {} at ({:.1}, {:.1})",
            archetype.id(),
            raw_id,
            position.x,
            position.y
        );
        out_events.push(Event::UnitSpawned {
            unit: unit.id,
            archetype: archetype.id().clone(),
            position,
        });
        units.push(unit);
    }

    world.units = units;
    world.spawned = true;
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use commander_core::{Roster, SelectionDetails, Tuning, UnitId, UnitSnapshot, UnitView};

    use super::{Unit, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the roster the world was created with.
    #[must_use]
    pub fn roster(world: &World) -> &Roster {
        &world.roster
    }

    /// Provides the movement tuning shared by every unit.
    #[must_use]
    pub fn tuning(world: &World) -> Tuning {
        world.tuning
    }

    /// Reports whether the roster has been spawned.
    #[must_use]
    pub fn is_spawned(world: &World) -> bool {
        world.spawned
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every unit in spawn order.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(
            world
                .units
                .iter()
                .filter_map(|unit| snapshot(world, unit))
                .collect(),
        )
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(world: &World, unit_id: UnitId) -> Option<UnitSnapshot> {
        world
            .units
            .iter()
            .find(|unit| unit.id == unit_id)
            .and_then(|unit| snapshot(world, unit))
    }

    /// Snapshot of the selected unit, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<UnitSnapshot> {
        world
            .units
            .iter()
            .find(|unit| unit.selected)
            .and_then(|unit| snapshot(world, unit))
    }

    /// Archetype details of the selected unit for UI panels.
    #[must_use]
    pub fn selection_details(world: &World) -> Option<SelectionDetails> {
        let unit = world.units.iter().find(|unit| unit.selected)?;
        let archetype = world.archetype_of(unit)?;
        Some(SelectionDetails {
            unit: unit.id,
            display_name: archetype.display_name().to_owned(),
            color: archetype.color(),
            description: archetype.description().to_owned(),
            speed_multiplier: archetype.speed_multiplier(),
        })
    }

    fn snapshot(world: &World, unit: &Unit) -> Option<UnitSnapshot> {
        let archetype = world.archetype_of(unit)?;
        Some(UnitSnapshot {
            id: unit.id,
            archetype: archetype.id().clone(),
            display_name: archetype.display_name().to_owned(),
            color: archetype.color(),
            position: unit.position,
            target: unit.target,
            base_speed: unit.base_speed,
            selected: unit.selected,
        })
    }
}
