//! Frame-driven host loop wiring the world to its systems.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use commander_core::{
    ArchetypeId, Command, Event, Layout, PickResult, PointerInput, Roster, Tuning,
};
use commander_rendering::{
    pick_flat, Color, GroundPresentation, Scene, SelectionPanel, UnitPresentation,
    UNIT_PICK_RADIUS,
};
use commander_system_bootstrap::Bootstrap;
use commander_system_input_resolver::InputResolver;
use commander_system_movement::Movement;
use commander_world::{self as world, query, World};
use glam::Vec2;
use log::{debug, info};

/// Owns the world and the pure systems, advancing them one tick at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    bootstrap: Bootstrap,
    input_resolver: InputResolver,
    movement: Movement,
    pending_input: VecDeque<PointerInput>,
}

impl Simulation {
    /// Creates a simulation and spawns the roster with `layout`.
    pub(crate) fn new(roster: Roster, tuning: Tuning, layout: Layout) -> Result<Self> {
        let mut simulation = Self {
            world: World::new(roster, tuning),
            bootstrap: Bootstrap::new(layout),
            input_resolver: InputResolver::new(),
            movement: Movement::new(tuning),
            pending_input: VecDeque::new(),
        };

        let mut commands = Vec::new();
        simulation.bootstrap.handle(&simulation.world, &mut commands);
        let mut events = Vec::new();
        simulation
            .apply_commands(commands, &mut events)
            .context("failed to spawn the roster")?;
        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::UnitSpawned { .. }))
            .count();
        info!("spawned {spawned} units");

        Ok(simulation)
    }

    /// Banner greeting the player.
    pub(crate) fn welcome_banner(&self) -> &str {
        self.bootstrap.welcome_banner(&self.world)
    }

    /// Read access to the authoritative world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Queues pointer input for the next tick boundary.
    pub(crate) fn queue_input(&mut self, input: PointerInput) {
        self.pending_input.push_back(input);
    }

    /// Resolves a world-space point against the current unit discs.
    pub(crate) fn pick_at(&self, point: Vec2) -> PickResult {
        let units = query::unit_view(&self.world);
        pick_flat(
            point,
            units.iter().map(|unit| (unit.id, unit.position)),
            UNIT_PICK_RADIUS,
        )
    }

    /// Current position of the first unit spawned from `archetype`.
    pub(crate) fn position_of(&self, archetype: &ArchetypeId) -> Option<Vec2> {
        self.bootstrap
            .units(&self.world)
            .iter()
            .find(|unit| &unit.archetype == archetype)
            .map(|unit| unit.position)
    }

    /// Applies queued input in arrival order, then advances every unit by one tick.
    pub(crate) fn step(&mut self) -> Result<()> {
        let mut events = Vec::new();
        while let Some(input) = self.pending_input.pop_front() {
            let unit_view = query::unit_view(&self.world);
            let mut commands = Vec::new();
            self.input_resolver
                .handle(Some(input), &unit_view, &mut commands);
            self.apply_commands(commands, &mut events)?;
        }

        let mut tick_events = Vec::new();
        self.apply_commands(vec![Command::Tick], &mut tick_events)?;
        let unit_view = query::unit_view(&self.world);
        let mut commands = Vec::new();
        self.movement.handle(&tick_events, &unit_view, &mut commands);
        self.apply_commands(commands, &mut events)?;

        Ok(())
    }

    /// Builds the initial scene for the rendering backend.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let ground = GroundPresentation::new(
            GroundPresentation::DEFAULT_SPACING,
            Color::new(1.0, 1.0, 1.0, 0.05),
        )
        .context("failed to describe the ground grid")?;
        let mut scene = Scene::new(ground, Vec::new(), None);
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Refreshes the units and selection panel of an existing scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.units.clear();
        scene.units.extend(
            query::unit_view(&self.world)
                .iter()
                .map(UnitPresentation::from_snapshot),
        );
        scene.selection = query::selection_details(&self.world).map(SelectionPanel::from);
    }

    fn apply_commands(
        &mut self,
        commands: Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> Result<()> {
        let first_new = out_events.len();
        for command in commands {
            world::apply(&mut self.world, command, out_events)?;
        }
        for event in &out_events[first_new..] {
            match event {
                Event::SelectionChanged { current, .. } => {
                    debug!("selection changed to {current:?}");
                }
                Event::TargetAssigned { unit, target } => {
                    debug!("unit {} ordered to {target}", unit.get());
                }
                _ => {}
            }
        }
        Ok(())
    }
}
