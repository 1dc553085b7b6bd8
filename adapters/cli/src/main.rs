#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the commander sandbox.

mod config;
mod logging;
mod simulation;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use commander_core::{ArchetypeId, PointerButton, PointerInput, UnitSnapshot};
use commander_rendering::{Color, Presentation, RenderingBackend};
use commander_rendering_macroquad::MacroquadBackend;
use commander_world::query;
use glam::Vec2;
use log::{error, info, warn};

use crate::{config::Overrides, simulation::Simulation};

/// RTS commander sandbox: select a commander and order it around.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// TOML file with optional [tuning], [layout] and [[archetypes]] sections.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base distance travelled per tick before archetype multipliers.
    #[arg(long, value_name = "UNITS")]
    speed: Option<f32>,
    /// Distance at which a unit counts as arrived.
    #[arg(long, value_name = "UNITS")]
    arrival_threshold: Option<f32>,
    /// Controls whether presentation waits for the display refresh.
    #[arg(long, value_enum, default_value_t = VsyncMode::On)]
    vsync: VsyncMode,
    /// Run the given number of ticks without a window and print the final state.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Archetype whose unit is clicked before the headless run.
    #[arg(long, value_name = "ARCHETYPE", requires = "headless")]
    select: Option<String>,
    /// Ground point right-clicked before the headless run.
    #[arg(long, value_name = "X,Y", value_parser = parse_point, requires = "headless")]
    move_to: Option<Vec2>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Vertical synchronisation preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    /// Synchronise with the display refresh rate.
    On,
    /// Render as fast as possible.
    Off,
}

/// Entry point for the commander sandbox command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    let overrides = Overrides {
        base_speed: args.speed,
        arrival_threshold: args.arrival_threshold,
    };
    let settings = config::load(args.config.as_deref(), overrides)?;
    info!(
        "{} archetypes, base speed {}, arrival threshold {}",
        settings.roster.len(),
        settings.tuning.base_speed(),
        settings.tuning.arrival_threshold()
    );

    let simulation = Simulation::new(settings.roster, settings.tuning, settings.layout)?;
    println!("{}", simulation.welcome_banner());

    match args.headless {
        Some(ticks) => run_headless(simulation, ticks, args.select, args.move_to),
        None => run_windowed(simulation, args.vsync),
    }
}

fn run_headless(
    mut simulation: Simulation,
    ticks: u64,
    select: Option<String>,
    move_to: Option<Vec2>,
) -> Result<()> {
    if let Some(archetype) = select {
        let archetype = ArchetypeId::new(archetype);
        let Some(position) = simulation.position_of(&archetype) else {
            bail!("no unit spawned from archetype {archetype}");
        };
        let pick = simulation.pick_at(position);
        simulation.queue_input(PointerInput::new(PointerButton::Primary, pick));
    }
    if let Some(point) = move_to {
        let pick = simulation.pick_at(point);
        simulation.queue_input(PointerInput::new(PointerButton::Secondary, pick));
    }

    for _ in 0..ticks {
        simulation.step()?;
    }

    let world = simulation.world();
    if query::selected_unit(world).is_none() && move_to.is_some() {
        warn!("move order ignored because no unit is selected");
    }
    println!("tick {}", query::tick_index(world));
    for unit in query::unit_view(world).iter() {
        println!("{}", describe_unit(unit));
    }

    Ok(())
}

fn run_windowed(mut simulation: Simulation, vsync: VsyncMode) -> Result<()> {
    let scene = simulation.scene()?;
    let presentation = Presentation::new(
        simulation.welcome_banner().to_owned(),
        Color::from_rgb_u8(10, 10, 10),
        scene,
    );

    MacroquadBackend::new()
        .with_vsync(vsync == VsyncMode::On)
        .run(presentation, move |frame_input, scene| {
            for pointer in frame_input.pointers {
                simulation.queue_input(pointer);
            }
            if let Err(error) = simulation.step() {
                error!("simulation step failed: {error:#}");
            }
            simulation.populate_scene(scene);
        })
}

fn describe_unit(unit: &UnitSnapshot) -> String {
    let marker = if unit.selected { " selected" } else { "" };
    format!(
        "{} {} at ({:.2}, {:.2}) target ({:.2}, {:.2}){marker}",
        unit.id.get(),
        unit.archetype,
        unit.position.x,
        unit.position.y,
        unit.target.x,
        unit.target.y,
    )
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but received `{value}`"))?;
    let parse = |component: &str| {
        component
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("`{component}` is not a finite number"))
    };

    Ok(Vec2::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commander_core::{UnitColor, UnitId};

    #[test]
    fn arguments_are_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_point_accepts_two_numbers() {
        assert_eq!(parse_point("10, -2.5"), Ok(Vec2::new(10.0, -2.5)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }

    #[test]
    fn headless_flags_require_headless_mode() {
        assert!(CliArgs::try_parse_from(["commander", "--select", "CANSU"]).is_err());

        let args = CliArgs::try_parse_from([
            "commander",
            "--headless",
            "10",
            "--select",
            "CANSU",
            "--move-to",
            "400,120",
            "--vsync",
            "off",
        ])
        .expect("valid arguments");
        assert_eq!(args.headless, Some(10));
        assert_eq!(args.move_to, Some(Vec2::new(400.0, 120.0)));
        assert_eq!(args.vsync, VsyncMode::Off);
    }

    #[test]
    fn describe_unit_marks_selection() {
        let unit = UnitSnapshot {
            id: UnitId::new(1),
            archetype: ArchetypeId::new("CANSU"),
            display_name: "Cansu".to_owned(),
            color: UnitColor::from_rgb(236, 72, 153),
            position: Vec2::new(250.0, 300.0),
            target: Vec2::new(400.0, 120.0),
            base_speed: 5.4,
            selected: true,
        };

        assert_eq!(
            describe_unit(&unit),
            "1 CANSU at (250.00, 300.00) target (400.00, 120.00) selected"
        );
    }
}
